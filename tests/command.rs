//! Host-level tests for command parsing.
#![cfg(feature = "host")]

use arm_kit::{Command, Error};
use embassy_time::Duration;

fn parse(line: &str) -> Command {
    Command::parse(line).unwrap_or_else(|err| panic!("{line:?} failed: {err}"))
}

#[test]
fn move_commands() {
    assert_eq!(
        parse("1 45"),
        Command::Move {
            joint_id: 1,
            angle_deg: 45.0,
            duration: None
        }
    );
    assert_eq!(
        parse("  4   -30.5  "),
        Command::Move {
            joint_id: 4,
            angle_deg: -30.5,
            duration: None
        }
    );
    assert_eq!(
        parse("7 10 800"),
        Command::Move {
            joint_id: 7,
            angle_deg: 10.0,
            duration: Some(Duration::from_millis(800))
        }
    );
    // Out-of-range ids parse; the controller rejects them.
    assert_eq!(
        parse("-3 10"),
        Command::Move {
            joint_id: -3,
            angle_deg: 10.0,
            duration: None
        }
    );
}

#[test]
fn move_duration_is_clamped_in_milliseconds() {
    let duration_of = |line: &str| match parse(line) {
        Command::Move { duration, .. } => duration,
        other => panic!("{line:?} parsed as {other:?}"),
    };
    assert_eq!(duration_of("1 45 20"), Some(Duration::from_millis(100)));
    assert_eq!(duration_of("1 45 99999"), Some(Duration::from_millis(10_000)));
    assert_eq!(
        duration_of("1 45 18446744073709552"),
        Some(Duration::from_millis(10_000))
    );
    assert_eq!(
        duration_of("1 45 18446744073709551615"),
        Some(Duration::from_millis(10_000))
    );
}

#[test]
fn setting_commands() {
    assert_eq!(parse("speed 60"), Command::Speed(60.0));
    assert_eq!(parse("dur 800"), Command::Duration(800));
    assert_eq!(parse("dur 50"), Command::Duration(50));
    assert_eq!(parse("blend on"), Command::Blend(true));
    assert_eq!(parse("blend off"), Command::Blend(false));
    assert_eq!(parse("blendalpha 0.4"), Command::BlendAlpha(0.4));
    assert_eq!(parse("stream on"), Command::Stream(true));
}

#[test]
fn query_and_action_commands() {
    assert_eq!(parse("read 3"), Command::Read(3));
    assert_eq!(parse("readall"), Command::ReadAll);
    assert_eq!(parse("center"), Command::Center);
    assert_eq!(parse("stop"), Command::Stop);
    assert_eq!(parse("stats"), Command::Stats);
}

#[test]
fn legacy_aliases() {
    assert_eq!(parse("cpg on"), Command::Blend(true));
    assert_eq!(parse("cpgalpha 0.1"), Command::BlendAlpha(0.1));
    assert_eq!(parse("realtime off"), Command::Stream(false));
}

#[test]
fn try_from_matches_parse() {
    assert_eq!(Command::try_from("readall").ok(), Some(Command::ReadAll));
}

#[test]
fn empty_lines() {
    assert!(matches!(Command::parse(""), Err(Error::EmptyCommand)));
    assert!(matches!(Command::parse("   \t "), Err(Error::EmptyCommand)));
}

#[test]
fn unknown_verbs() {
    assert!(matches!(Command::parse("jump"), Err(Error::UnknownCommand)));
    // Verbs are case-sensitive.
    assert!(matches!(Command::parse("SPEED 30"), Err(Error::UnknownCommand)));
    assert!(matches!(Command::parse("reada"), Err(Error::UnknownCommand)));
}

#[test]
fn missing_arguments() {
    assert!(matches!(
        Command::parse("speed"),
        Err(Error::MissingArgument("speed"))
    ));
    assert!(matches!(
        Command::parse("1"),
        Err(Error::MissingArgument("angle"))
    ));
    assert!(matches!(
        Command::parse("read"),
        Err(Error::MissingArgument("joint id"))
    ));
    assert!(matches!(
        Command::parse("blend"),
        Err(Error::MissingArgument("blend"))
    ));
}

#[test]
fn invalid_arguments() {
    assert!(matches!(
        Command::parse("speed fast"),
        Err(Error::InvalidArgument("speed"))
    ));
    assert!(matches!(
        Command::parse("dur -5"),
        Err(Error::InvalidArgument("duration"))
    ));
    assert!(matches!(
        Command::parse("blend yes"),
        Err(Error::InvalidArgument("blend"))
    ));
    assert!(matches!(
        Command::parse("1 nan"),
        Err(Error::InvalidArgument("angle"))
    ));
    assert!(matches!(
        Command::parse("1 inf"),
        Err(Error::InvalidArgument("angle"))
    ));
}

#[test]
fn trailing_arguments() {
    assert!(matches!(
        Command::parse("readall now"),
        Err(Error::TrailingArgument)
    ));
    assert!(matches!(
        Command::parse("1 45 800 9"),
        Err(Error::TrailingArgument)
    ));
}
