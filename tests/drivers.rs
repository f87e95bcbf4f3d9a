//! Host-level tests for actuator drivers, the line reader and feedback formatting.
#![cfg(feature = "host")]

mod common;

use core::convert::Infallible;

use arm_kit::bus_servo::{POSITION_WRITE_LEN, encode_position_write};
use arm_kit::feedback::{AngleList, FeedbackKind, JointAngle, StreamSchedule, whole_degrees};
use arm_kit::line_reader::{InboundLine, LineReader};
use arm_kit::pwm_servo::{PwmServo, native_to_pulse_us};
use arm_kit::{Actuator, Error};
use common::{RecordingWriter, Write, at};
use embassy_time::Duration;
use embedded_hal::pwm::{ErrorKind, ErrorType, SetDutyCycle};

#[test]
fn position_write_frame_layout() {
    let frame = encode_position_write(3, 2048, 3400, 50);
    assert_eq!(frame.len(), POSITION_WRITE_LEN);
    assert_eq!(
        frame,
        [
            0xFF, 0xFF, // header
            0x03, // id
            0x0A, // length
            0x03, // write
            0x29, // acceleration register
            0x32, // acceleration
            0x00, 0x08, // position 2048
            0x00, 0x00, // time
            0x48, 0x0D, // speed 3400
            0x37, // checksum
        ]
    );
}

#[test]
fn position_write_checksum_covers_id_through_parameters() {
    let frame = encode_position_write(7, 4095, 3400, 50);
    let sum = frame[2..13].iter().fold(0u8, |sum, byte| sum.wrapping_add(*byte));
    assert_eq!(frame[13], !sum);
    assert_eq!(&frame[7..9], &[0xFF_u8, 0x0F]);
}

#[test]
fn pwm_pulse_spans_500_to_2500_us() {
    assert_eq!(native_to_pulse_us(0), 500);
    assert_eq!(native_to_pulse_us(90), 1500);
    assert_eq!(native_to_pulse_us(135), 2000);
    assert_eq!(native_to_pulse_us(180), 2500);
    assert_eq!(native_to_pulse_us(400), 2500);
}

/// One 20 ms frame at 1 µs per tick, like a configured RP PWM slice.
#[derive(Default)]
struct FakePwm {
    duty: u16,
}

impl ErrorType for FakePwm {
    type Error = Infallible;
}

impl SetDutyCycle for FakePwm {
    fn max_duty_cycle(&self) -> u16 {
        20_000
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty;
        Ok(())
    }
}

#[derive(Debug)]
struct Broken;

impl embedded_hal::pwm::Error for Broken {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

struct BrokenPwm;

impl ErrorType for BrokenPwm {
    type Error = Broken;
}

impl SetDutyCycle for BrokenPwm {
    fn max_duty_cycle(&self) -> u16 {
        20_000
    }

    fn set_duty_cycle(&mut self, _duty: u16) -> Result<(), Self::Error> {
        Err(Broken)
    }
}

#[test]
fn pwm_servo_sets_duty_in_microseconds() {
    let mut pwm = FakePwm::default();
    let mut servo = PwmServo::new(&mut pwm, 1);
    assert_eq!(servo.channel(), 1);
    servo.set_native(90).expect("infallible");
    servo.set_native(180).expect("infallible");
    assert_eq!(pwm.duty, 2500);

    let mut servo = PwmServo::new(BrokenPwm, 1);
    assert!(matches!(servo.set_native(90), Err(Error::PwmWrite(1))));
}

#[test]
fn actuator_dispatches_by_class() {
    let mut writer = RecordingWriter::default();
    Actuator::Pwm { channel: 1 }
        .write_native(45, &mut writer)
        .expect("recorded");
    Actuator::Bus { address: 6 }
        .write_native(1000, &mut writer)
        .expect("recorded");
    assert!(Actuator::Bus { address: 6 }.is_bus());
    assert!(!Actuator::Pwm { channel: 1 }.is_bus());
    assert_eq!(
        writer.writes,
        vec![
            Write::Pwm {
                channel: 1,
                native: 45
            },
            Write::Bus {
                address: 6,
                native: 1000,
                speed: 3400,
                accel: 50
            },
        ]
    );
}

fn feed(reader: &mut LineReader, bytes: &[u8]) -> Vec<InboundLine> {
    bytes.iter().filter_map(|byte| reader.push(*byte)).collect()
}

#[test]
fn line_reader_splits_on_newline_and_drops_carriage_return() {
    let mut reader = LineReader::new();
    let lines = feed(&mut reader, b"1 45\r\nreadall\n\n");
    let texts: Vec<&str> = lines.iter().map(|line| line.text.as_str()).collect();
    assert_eq!(texts, ["1 45", "readall", ""]);
    assert!(lines.iter().all(|line| !line.truncated));
}

#[test]
fn line_reader_holds_partial_line_across_reads() {
    let mut reader = LineReader::new();
    assert!(feed(&mut reader, b"spe").is_empty());
    let lines = feed(&mut reader, b"ed 60\n");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].text.as_str(), "speed 60");
}

#[test]
fn line_reader_cuts_long_lines_and_discards_the_rest() {
    let mut reader = LineReader::new();
    let mut bytes = vec![b'x'; 70];
    bytes.extend_from_slice(b"\nstats\n");
    let lines = feed(&mut reader, &bytes);

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].text.len(), 64);
    assert!(lines[0].truncated);
    assert_eq!(lines[1].text.as_str(), "stats");
    assert!(!lines[1].truncated);
}

#[test]
fn line_reader_accepts_exactly_full_line() {
    let mut reader = LineReader::new();
    let mut bytes = vec![b'y'; 64];
    bytes.push(b'\n');
    let lines = feed(&mut reader, &bytes);
    assert_eq!(lines.len(), 1);
    assert!(!lines[0].truncated);
}

#[test]
fn feedback_lines_use_whole_degrees() {
    assert_eq!(whole_degrees(22.5), 23);
    assert_eq!(whole_degrees(-22.5), -23);
    assert_eq!(whole_degrees(-0.2), 0);

    let snapshot = AngleList {
        kind: FeedbackKind::Snapshot,
        angles_deg: [0.0, 44.6, -150.0],
    };
    assert_eq!(snapshot.to_string(), "fb 0,45,-150");
    let stream = AngleList {
        kind: FeedbackKind::Stream,
        angles_deg: [1.0],
    };
    assert_eq!(stream.to_string(), "rt 1");
    let joint = JointAngle {
        joint_id: 3,
        angle_deg: -12.4,
    };
    assert_eq!(joint.to_string(), "fb 3 -12");
}

#[test]
fn stream_schedule_fires_at_its_period() {
    let mut schedule = StreamSchedule::new(Duration::from_millis(20));
    assert!(!schedule.poll(at(0)));

    schedule.set_enabled(true);
    assert!(schedule.poll(at(3)));
    assert!(!schedule.poll(at(8)));
    assert!(!schedule.poll(at(22)));
    assert!(schedule.poll(at(23)));
    assert!(schedule.poll(at(50)));

    schedule.set_enabled(false);
    assert!(!schedule.poll(at(100)));
    assert_eq!(schedule.period(), Duration::from_millis(20));
}
