//! The serial command vocabulary.
//!
//! Lines are case-sensitive and whitespace-tokenized. The first token selects the verb;
//! a leading number is a joint id and starts a motion.
//!
//! | line | command |
//! |---|---|
//! | `<id> <angle> [ms]` | [`Command::Move`] |
//! | `speed <deg/s>` | [`Command::Speed`] |
//! | `dur <ms>` | [`Command::Duration`] |
//! | `blend on\|off` (`cpg`) | [`Command::Blend`] |
//! | `blendalpha <v>` (`cpgalpha`) | [`Command::BlendAlpha`] |
//! | `read <id>` | [`Command::Read`] |
//! | `readall` | [`Command::ReadAll`] |
//! | `stream on\|off` (`realtime`) | [`Command::Stream`] |
//! | `center` | [`Command::Center`] |
//! | `stop` | [`Command::Stop`] |
//! | `stats` | [`Command::Stats`] |

use core::str::{FromStr, SplitWhitespace};

use embassy_time::Duration;

use crate::shared_constants::{MAX_MOTION_DURATION, MIN_MOTION_DURATION};
use crate::{Error, Result};

/// One parsed command line.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Move a joint; `duration` overrides the speed-derived window when given and is
    /// already clamped to `100..=10000` ms.
    Move {
        joint_id: i32,
        angle_deg: f32,
        duration: Option<Duration>,
    },
    Speed(f32),
    Duration(u64),
    Blend(bool),
    BlendAlpha(f32),
    Read(i32),
    ReadAll,
    Stream(bool),
    Center,
    Stop,
    Stats,
}

// Longest keyword first so a shorter verb never shadows a longer one sharing its prefix.
const VERBS: [&str; 13] = [
    "blendalpha",
    "cpgalpha",
    "realtime",
    "readall",
    "center",
    "stream",
    "blend",
    "speed",
    "stats",
    "read",
    "stop",
    "cpg",
    "dur",
];

impl Command {
    /// Parse one command line (terminator already removed).
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCommand`], [`Error::UnknownCommand`],
    /// [`Error::MissingArgument`], [`Error::InvalidArgument`] or
    /// [`Error::TrailingArgument`] for malformed input.
    pub fn parse(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        let first = tokens.next().ok_or(Error::EmptyCommand)?;

        let Some(verb) = VERBS.iter().copied().find(|verb| *verb == first) else {
            return parse_move(first, tokens);
        };

        let command = match verb {
            "speed" => Self::Speed(number(tokens.next(), "speed")?),
            "dur" => Self::Duration(number(tokens.next(), "duration")?),
            "blend" | "cpg" => Self::Blend(on_off(tokens.next(), "blend")?),
            "blendalpha" | "cpgalpha" => Self::BlendAlpha(number(tokens.next(), "blend alpha")?),
            "read" => Self::Read(number(tokens.next(), "joint id")?),
            "readall" => Self::ReadAll,
            "stream" | "realtime" => Self::Stream(on_off(tokens.next(), "stream")?),
            "center" => Self::Center,
            "stop" => Self::Stop,
            "stats" => Self::Stats,
            _ => return Err(Error::UnknownCommand),
        };
        finish(tokens, command)
    }
}

impl TryFrom<&str> for Command {
    type Error = Error;

    fn try_from(line: &str) -> Result<Self> {
        Self::parse(line)
    }
}

fn parse_move(first: &str, mut tokens: SplitWhitespace<'_>) -> Result<Command> {
    let joint_id: i32 = first.parse().map_err(|_| Error::UnknownCommand)?;
    let angle_deg: f32 = number(tokens.next(), "angle")?;
    if !angle_deg.is_finite() {
        return Err(Error::InvalidArgument("angle"));
    }
    let duration = match tokens.next() {
        Some(token) => Some(move_duration(number(Some(token), "duration")?)),
        None => None,
    };
    finish(
        tokens,
        Command::Move {
            joint_id,
            angle_deg,
            duration,
        },
    )
}

// Clamped in whole milliseconds; a huge value would overflow the tick conversion.
fn move_duration(millis: u64) -> Duration {
    Duration::from_millis(millis.clamp(
        MIN_MOTION_DURATION.as_millis(),
        MAX_MOTION_DURATION.as_millis(),
    ))
}

fn number<T: FromStr>(token: Option<&str>, name: &'static str) -> Result<T> {
    token
        .ok_or(Error::MissingArgument(name))?
        .parse()
        .map_err(|_| Error::InvalidArgument(name))
}

fn on_off(token: Option<&str>, name: &'static str) -> Result<bool> {
    match token.ok_or(Error::MissingArgument(name))? {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(Error::InvalidArgument(name)),
    }
}

fn finish(mut tokens: SplitWhitespace<'_>, command: Command) -> Result<Command> {
    if tokens.next().is_some() {
        return Err(Error::TrailingArgument);
    }
    Ok(command)
}
