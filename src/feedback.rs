//! Feedback lines (`fb`, `rt`) and the periodic stream schedule.

use core::fmt;

use embassy_time::{Duration, Instant};

/// Angles are reported in whole degrees.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "joint angles are within ±150 degrees"
)]
pub fn whole_degrees(angle_deg: f32) -> i32 {
    libm::roundf(angle_deg) as i32
}

/// Which stream an all-joint line belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeedbackKind {
    /// Reply to `readall`.
    Snapshot,
    /// Periodic streaming line.
    Stream,
}

impl FeedbackKind {
    const fn tag(self) -> &'static str {
        match self {
            Self::Snapshot => "fb",
            Self::Stream => "rt",
        }
    }
}

/// Every joint's angle in joint order: `fb 0,45,...` or `rt 0,45,...`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngleList<const N: usize> {
    pub kind: FeedbackKind,
    pub angles_deg: [f32; N],
}

impl<const N: usize> fmt::Display for AngleList<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.kind.tag())?;
        for (index, angle_deg) in self.angles_deg.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", whole_degrees(*angle_deg))?;
        }
        Ok(())
    }
}

/// One joint's angle: `fb <id> <angle>`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointAngle {
    pub joint_id: u8,
    pub angle_deg: f32,
}

impl fmt::Display for JointAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fb {} {}", self.joint_id, whole_degrees(self.angle_deg))
    }
}

/// Decides when the next `rt` line is due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamSchedule {
    enabled: bool,
    period: Duration,
    last: Option<Instant>,
}

impl StreamSchedule {
    #[must_use]
    pub const fn new(period: Duration) -> Self {
        Self {
            enabled: false,
            period,
            last: None,
        }
    }

    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Turning streaming on makes the next poll due immediately.
    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.last = None;
    }

    /// True (and the schedule advances) when a line should be emitted at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.enabled {
            return false;
        }
        let due = self
            .last
            .is_none_or(|last| now.saturating_duration_since(last) >= self.period);
        if due {
            self.last = Some(now);
        }
        due
    }
}
