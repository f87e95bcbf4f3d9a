//! Process-wide motion parameters, changed only by the command interpreter.

use embassy_time::Duration;

use crate::easing::Easing;
use crate::shared_constants::{
    DEFAULT_BLEND_ALPHA, DEFAULT_FALLBACK_DURATION, DEFAULT_SPEED_DEG_PER_SEC,
    MAX_MOTION_DURATION, MAX_SPEED_DEG_PER_SEC, MIN_MOTION_DURATION, MIN_SPEED_DEG_PER_SEC,
};
use crate::{Error, Result};

/// Speed, fallback duration and blending settings applied to every new motion.
///
/// Owned by the controller and lent to the trajectory engine per call; a change never
/// reaches a motion that has already started.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionParams {
    speed_deg_per_sec: f32,
    fallback_duration: Duration,
    blend_enabled: bool,
    blend_alpha: f32,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            speed_deg_per_sec: DEFAULT_SPEED_DEG_PER_SEC,
            fallback_duration: DEFAULT_FALLBACK_DURATION,
            blend_enabled: false,
            blend_alpha: DEFAULT_BLEND_ALPHA,
        }
    }
}

impl MotionParams {
    #[must_use]
    pub const fn speed_deg_per_sec(&self) -> f32 {
        self.speed_deg_per_sec
    }

    #[must_use]
    pub const fn fallback_duration(&self) -> Duration {
        self.fallback_duration
    }

    #[must_use]
    pub const fn blend_enabled(&self) -> bool {
        self.blend_enabled
    }

    #[must_use]
    pub const fn blend_alpha(&self) -> f32 {
        self.blend_alpha
    }

    /// The easing a motion started now would use.
    #[must_use]
    pub const fn easing(&self) -> Easing {
        if self.blend_enabled {
            Easing::Blended {
                alpha: self.blend_alpha,
            }
        } else {
            Easing::Quintic
        }
    }

    /// Set the speed, silently clamped to `1..=180` deg/s. Returns the value stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for NaN or infinite input.
    pub fn set_speed(&mut self, speed_deg_per_sec: f32) -> Result<f32> {
        if !speed_deg_per_sec.is_finite() {
            return Err(Error::InvalidArgument("speed"));
        }
        self.speed_deg_per_sec =
            speed_deg_per_sec.clamp(MIN_SPEED_DEG_PER_SEC, MAX_SPEED_DEG_PER_SEC);
        Ok(self.speed_deg_per_sec)
    }

    /// Set the dwell used for zero-length moves. Out-of-range values are rejected, not
    /// clamped, and leave the current value in place. Returns the value stored.
    ///
    /// The range is checked on the raw milliseconds, before any tick conversion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DurationOutOfRange`] outside `100..=10000` ms.
    pub fn set_fallback_duration(&mut self, millis: u64) -> Result<Duration> {
        if !(MIN_MOTION_DURATION.as_millis()..=MAX_MOTION_DURATION.as_millis()).contains(&millis) {
            return Err(Error::DurationOutOfRange(millis));
        }
        self.fallback_duration = Duration::from_millis(millis);
        Ok(self.fallback_duration)
    }

    pub const fn set_blend_enabled(&mut self, blend_enabled: bool) {
        self.blend_enabled = blend_enabled;
    }

    /// Set the periodic-kernel weight, clamped to `0..=1`. Returns the value stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for NaN or infinite input.
    pub fn set_blend_alpha(&mut self, blend_alpha: f32) -> Result<f32> {
        if !blend_alpha.is_finite() {
            return Err(Error::InvalidArgument("blend alpha"));
        }
        self.blend_alpha = blend_alpha.clamp(0.0, 1.0);
        Ok(self.blend_alpha)
    }
}
