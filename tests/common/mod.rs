//! Shared helpers for host tests.
#![allow(dead_code, reason = "each test binary uses a different subset")]

use arm_kit::{ActuatorWriter, Error, Result};
use embassy_time::Instant;

/// One call the engine made on the writer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Write {
    Pwm {
        channel: u8,
        native: u16,
    },
    Bus {
        address: u8,
        native: u16,
        speed: u16,
        accel: u8,
    },
}

/// Records successful writes; `fail` makes every write error out instead.
#[derive(Debug, Default)]
pub struct RecordingWriter {
    pub writes: Vec<Write>,
    pub fail: bool,
}

impl RecordingWriter {
    pub fn take(&mut self) -> Vec<Write> {
        std::mem::take(&mut self.writes)
    }
}

impl ActuatorWriter for RecordingWriter {
    fn set_duty_for_channel(&mut self, channel: u8, native: u16) -> Result<()> {
        if self.fail {
            return Err(Error::PwmWrite(channel));
        }
        self.writes.push(Write::Pwm { channel, native });
        Ok(())
    }

    fn send_framed_write(&mut self, address: u8, native: u16, speed: u16, accel: u8) -> Result<()> {
        if self.fail {
            return Err(Error::BusWrite(address));
        }
        self.writes.push(Write::Bus {
            address,
            native,
            speed,
            accel,
        });
        Ok(())
    }
}

pub fn at(millis: u64) -> Instant {
    Instant::from_millis(millis)
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-5,
        "expected {expected}, got {actual}"
    );
}
