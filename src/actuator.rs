//! The two actuator classes and the single "write native position" capability they share.

use crate::shared_constants::{BUS_SERVO_ACCEL, BUS_SERVO_SPEED};
use crate::Result;

/// Which physical actuator drives a joint, and how it is addressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Actuator {
    /// Hobby servo on a PWM output; `channel` indexes the PWM outputs.
    Pwm { channel: u8 },
    /// Serial-bus servo sharing the half-duplex link; `address` is its bus ID.
    Bus { address: u8 },
}

/// Low-level write primitives, one per actuator class.
///
/// The trajectory engine only ever reaches the hardware through this trait. Target
/// builds implement it on the RP peripherals (see `arm_hardware`); tests record calls.
pub trait ActuatorWriter {
    /// Update the duty cycle of a PWM output so the servo goes to `native` (0..=180).
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::PwmWrite`] if the channel does not exist or rejects the duty.
    fn set_duty_for_channel(&mut self, channel: u8, native: u16) -> Result<()>;

    /// Send one framed position write to a bus servo.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::BusWrite`] if the frame could not be sent in bounded time.
    fn send_framed_write(&mut self, address: u8, native: u16, speed: u16, accel: u8)
    -> Result<()>;
}

impl Actuator {
    /// Command the actuator to `native`, in its own unit system.
    ///
    /// # Errors
    ///
    /// Propagates the writer's failure; the caller decides whether to retry.
    pub fn write_native<W: ActuatorWriter + ?Sized>(self, native: u16, writer: &mut W) -> Result<()> {
        match self {
            Self::Pwm { channel } => writer.set_duty_for_channel(channel, native),
            Self::Bus { address } => {
                writer.send_framed_write(address, native, BUS_SERVO_SPEED, BUS_SERVO_ACCEL)
            }
        }
    }

    #[must_use]
    pub const fn is_bus(self) -> bool {
        matches!(self, Self::Bus { .. })
    }
}
