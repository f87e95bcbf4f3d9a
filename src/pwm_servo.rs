//! Hobby-servo PWM output.
//!
//! - 50 Hz frame (20 ms)
//! - Native position 0..=180 maps linearly onto a 500..=2500 µs pulse
//! - Clock-independent: the slice divider is computed from `clk_sys` so 1 tick ≈ 1 µs

use embedded_hal::pwm::SetDutyCycle;

use crate::{Error, Result};

pub const SERVO_PERIOD_US: u16 = 20_000; // 20 ms
pub const MIN_PULSE_US: u16 = 500;
pub const MAX_PULSE_US: u16 = 2500;
pub const MAX_PWM_NATIVE: u16 = 180;

/// Pulse width for a native position; values past 180 are clamped.
#[must_use]
pub const fn native_to_pulse_us(native: u16) -> u16 {
    let native = if native > MAX_PWM_NATIVE {
        MAX_PWM_NATIVE
    } else {
        native
    };
    #[expect(
        clippy::arithmetic_side_effects,
        clippy::integer_division_remainder_used,
        reason = "native <= 180 keeps the product far below u32::MAX"
    )]
    let span = native as u32 * (MAX_PULSE_US - MIN_PULSE_US) as u32 / MAX_PWM_NATIVE as u32;
    #[expect(
        clippy::cast_possible_truncation,
        reason = "span <= 2000 by construction"
    )]
    let span = span as u16;
    MIN_PULSE_US.saturating_add(span)
}

/// One servo on one PWM output.
///
/// Works over any [`SetDutyCycle`] output whose full scale is one 20 ms frame, such as an
/// `embassy_rp::pwm::PwmOutput` from a slice configured with [`servo_pwm_config`].
pub struct PwmServo<P> {
    output: P,
    channel: u8,
}

impl<P: SetDutyCycle> PwmServo<P> {
    /// `channel` is the index joints use to address this output.
    #[must_use]
    pub const fn new(output: P, channel: u8) -> Self {
        Self { output, channel }
    }

    #[must_use]
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// Only the duty changes; the slice keeps its divider and period.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PwmWrite`] if the output rejects the duty cycle.
    pub fn set_native(&mut self, native: u16) -> Result<()> {
        let pulse_us = native_to_pulse_us(native);
        self.output
            .set_duty_cycle_fraction(pulse_us, SERVO_PERIOD_US)
            .map_err(|_| Error::PwmWrite(self.channel))
    }
}

/// Slice configuration for two servos (channels A and B) at 1 µs resolution.
#[cfg(any(feature = "pico1", feature = "pico2"))]
#[must_use]
pub fn servo_pwm_config() -> embassy_rp::pwm::Config {
    let clk = u64::from(embassy_rp::clocks::clk_sys_freq()); // Hz
    // Aim for tick ≈ 1 µs: divider = clk_sys / 1_000_000
    let div_int = u8::try_from(clk / 1_000_000).unwrap_or(u8::MAX).max(1);
    let top = SERVO_PERIOD_US.saturating_sub(1); // 19999 -> 20_000 ticks/frame

    let mut config = embassy_rp::pwm::Config::default();
    config.top = top;
    config.phase_correct = false; // edge-aligned => exact 1 µs steps
    config.divider = div_int.into();
    config.compare_a = native_to_pulse_us(MAX_PWM_NATIVE / 2);
    config.compare_b = native_to_pulse_us(MAX_PWM_NATIVE / 2);
    config.enable = true;

    crate::logging::info!("servo pwm clk={}Hz div={} top={}", clk, div_int, top);
    config
}
