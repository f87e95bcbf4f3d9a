//! Per-joint trajectory state machine.
//!
//! [`TrajectoryEngine::start_motion`] turns a target angle into a time window;
//! [`TrajectoryEngine::tick`] samples every moving joint once and issues exactly one
//! actuator write per moving joint.

use embassy_time::{Duration, Instant};

use crate::actuator::ActuatorWriter;
use crate::easing::Easing;
use crate::joint::{JointConfig, JointTable};
use crate::logging::{info, warn};
use crate::motion_params::MotionParams;
use crate::shared_constants::{MAX_MOTION_DURATION, MIN_MOTION_DURATION};
use crate::{Error, Result};

/// Mutable motion state of one joint.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JointState {
    current_angle_deg: f32,
    target_angle_deg: f32,
    start: Instant,
    duration: Duration,
    moving: bool,
    easing: Easing,
    start_native: u16,
    target_native: u16,
    last_native: u16,
    progress: f32,
    // A write that failed; re-asserted before the motion advances.
    pending: Option<(u16, f32)>,
}

impl JointState {
    fn at_rest(config: &JointConfig) -> Self {
        let native = config.center_native();
        let angle_deg = config.native_to_degrees(native);
        Self {
            current_angle_deg: angle_deg,
            target_angle_deg: angle_deg,
            start: Instant::from_ticks(0),
            duration: Duration::from_ticks(0),
            moving: false,
            easing: Easing::Quintic,
            start_native: native,
            target_native: native,
            last_native: native,
            progress: 1.0,
            pending: None,
        }
    }

    /// Last committed angle. While moving this is where the motion started from.
    #[must_use]
    pub const fn current_angle_deg(&self) -> f32 {
        self.current_angle_deg
    }

    #[must_use]
    pub const fn target_angle_deg(&self) -> f32 {
        self.target_angle_deg
    }

    #[must_use]
    pub const fn start(&self) -> Instant {
        self.start
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub const fn moving(&self) -> bool {
        self.moving
    }

    #[must_use]
    pub const fn easing(&self) -> Easing {
        self.easing
    }

    #[must_use]
    pub const fn start_native(&self) -> u16 {
        self.start_native
    }

    #[must_use]
    pub const fn target_native(&self) -> u16 {
        self.target_native
    }

    /// The last native position the actuator accepted.
    #[must_use]
    pub const fn last_native(&self) -> u16 {
        self.last_native
    }

    /// Eased progress of the last successful sample, in `[0, 1]`.
    #[must_use]
    pub const fn progress(&self) -> f32 {
        self.progress
    }

    /// True when the previous write failed and the next sample will retry it.
    #[must_use]
    pub const fn retry_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Outcome of sampling one moving joint.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// The native position written this tick.
    pub native: u16,
    /// Eased progress in `[0, 1]`.
    pub progress: f32,
    /// The motion completed with this write.
    pub done: bool,
}

/// What one pass over all joints did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    pub writes: u8,
    pub completed: u8,
    pub failures: u8,
}

/// Motion duration for a move of `delta_deg` at `speed_deg_per_sec`.
///
/// A zero-length move gets `fallback` instead.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "float-to-int casts saturate and the value is clamped right after"
)]
pub fn motion_duration(delta_deg: f32, speed_deg_per_sec: f32, fallback: Duration) -> Duration {
    if delta_deg == 0.0 {
        return fallback;
    }
    let millis = (1000.0 * delta_deg / speed_deg_per_sec) as u64;
    Duration::from_millis(millis).clamp(MIN_MOTION_DURATION, MAX_MOTION_DURATION)
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the result is clamped between the two u16 endpoints"
)]
fn interpolate(start_native: u16, target_native: u16, progress: f32) -> u16 {
    let span = f32::from(target_native) - f32::from(start_native);
    let native = f32::from(start_native) + libm::roundf(span * progress);
    let (low, high) = if start_native <= target_native {
        (start_native, target_native)
    } else {
        (target_native, start_native)
    };
    (native as i32).clamp(i32::from(low), i32::from(high)) as u16
}

/// Owns the state of every joint and samples their trajectories.
#[derive(Clone, Debug)]
pub struct TrajectoryEngine<const N: usize> {
    joints: JointTable<N>,
    states: [JointState; N],
    write_failures: u32,
}

impl<const N: usize> TrajectoryEngine<N> {
    /// Every joint starts at rest at its center position.
    #[must_use]
    pub fn new(joints: JointTable<N>) -> Self {
        let states = joints.joints().map(|config| JointState::at_rest(&config));
        Self {
            joints,
            states,
            write_failures: 0,
        }
    }

    #[must_use]
    pub const fn joints(&self) -> &JointTable<N> {
        &self.joints
    }

    #[must_use]
    pub fn state(&self, joint_id: u8) -> Option<&JointState> {
        self.states.get(self.joints.index_of(joint_id)?)
    }

    #[must_use]
    pub fn is_moving(&self, joint_id: u8) -> bool {
        self.state(joint_id).is_some_and(JointState::moving)
    }

    #[must_use]
    pub fn any_moving(&self) -> bool {
        self.states.iter().any(JointState::moving)
    }

    /// `current_angle_deg` of every joint, in joint order.
    #[must_use]
    pub fn current_angles(&self) -> [f32; N] {
        self.states.map(|state| state.current_angle_deg)
    }

    /// Actuator writes that have failed since start-up.
    #[must_use]
    pub const fn write_failures(&self) -> u32 {
        self.write_failures
    }

    /// Start (or retarget) a motion of `joint_id` toward `target_angle_deg`.
    ///
    /// The target is clamped to the joint's range, and so is an explicit duration to
    /// `100..=10000` ms. The new window starts from the previous
    /// *target*, not from wherever an in-flight motion has reached: the latest command wins
    /// and the old motion is abandoned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidJoint`] for an unknown id and [`Error::InvalidArgument`] for
    /// a non-finite angle. Neither changes any state.
    pub fn start_motion(
        &mut self,
        joint_id: u8,
        target_angle_deg: f32,
        speed_deg_per_sec: f32,
        explicit_duration: Option<Duration>,
        params: &MotionParams,
        now: Instant,
    ) -> Result<&JointState> {
        let invalid_joint = Error::InvalidJoint(i32::from(joint_id));
        let index = self.joints.index_of(joint_id).ok_or(invalid_joint)?;
        if !target_angle_deg.is_finite() {
            return Err(Error::InvalidArgument("angle"));
        }
        let (Some(config), Some(state)) =
            (self.joints.joints().get(index), self.states.get_mut(index))
        else {
            return Err(invalid_joint);
        };

        let target_angle_deg = config.clamp_angle(target_angle_deg);
        state.current_angle_deg = state.target_angle_deg;
        let delta_deg = libm::fabsf(target_angle_deg - state.current_angle_deg);
        let duration = explicit_duration.map_or_else(
            || motion_duration(delta_deg, speed_deg_per_sec, params.fallback_duration()),
            |duration| duration.clamp(MIN_MOTION_DURATION, MAX_MOTION_DURATION),
        );

        state.start_native = state.target_native;
        state.target_angle_deg = target_angle_deg;
        state.target_native = config.degrees_to_native(target_angle_deg);
        state.start = now;
        state.duration = duration;
        state.easing = params.easing();
        state.progress = 0.0;
        state.pending = None;
        state.moving = true;

        info!(
            "joint {} -> {} deg ({}..{}) over {} ms",
            joint_id,
            target_angle_deg,
            state.start_native,
            state.target_native,
            duration.as_millis()
        );
        Ok(state)
    }

    /// Sample one joint at `now` and write its position.
    ///
    /// Returns `Ok(None)` for a joint at rest (nothing is written).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidJoint`] for an unknown id, or the writer's error. After a
    /// failed write the joint stays moving and the next sample re-asserts the same
    /// position before the motion advances.
    pub fn sample<W: ActuatorWriter + ?Sized>(
        &mut self,
        joint_id: u8,
        now: Instant,
        writer: &mut W,
    ) -> Result<Option<Sample>> {
        let index = self
            .joints
            .index_of(joint_id)
            .ok_or(Error::InvalidJoint(i32::from(joint_id)))?;
        self.sample_index(index, now, writer)
    }

    fn sample_index<W: ActuatorWriter + ?Sized>(
        &mut self,
        index: usize,
        now: Instant,
        writer: &mut W,
    ) -> Result<Option<Sample>> {
        let (Some(config), Some(state)) =
            (self.joints.joints().get(index), self.states.get_mut(index))
        else {
            return Ok(None);
        };
        if !state.moving {
            return Ok(None);
        }

        let (native, progress) = match state.pending {
            Some(pending) => pending,
            None => {
                let elapsed = now.saturating_duration_since(state.start).min(state.duration);
                if elapsed >= state.duration {
                    (state.target_native, 1.0)
                } else {
                    #[expect(
                        clippy::cast_precision_loss,
                        reason = "motion windows are at most 10 s of ticks"
                    )]
                    let tau = elapsed.as_ticks() as f32 / state.duration.as_ticks() as f32;
                    let progress = state.easing.progress(tau);
                    (
                        interpolate(state.start_native, state.target_native, progress),
                        progress,
                    )
                }
            }
        };

        if let Err(err) = config.actuator().write_native(native, writer) {
            state.pending = Some((native, progress));
            self.write_failures = self.write_failures.wrapping_add(1);
            warn!("joint {} write of {} failed: {}", config.id(), native, err);
            return Err(err);
        }

        state.pending = None;
        state.last_native = native;
        state.progress = progress;
        let done = progress >= 1.0 && native == state.target_native;
        if done {
            state.current_angle_deg = state.target_angle_deg;
            state.moving = false;
        }
        Ok(Some(Sample {
            native,
            progress,
            done,
        }))
    }

    /// Sample every moving joint once, in joint order.
    ///
    /// A failed write is counted and the pass continues with the next joint.
    pub fn tick<W: ActuatorWriter + ?Sized>(&mut self, now: Instant, writer: &mut W) -> TickReport {
        let mut report = TickReport::default();
        for index in 0..N {
            match self.sample_index(index, now, writer) {
                Ok(Some(sample)) => {
                    report.writes = report.writes.saturating_add(1);
                    if sample.done {
                        report.completed = report.completed.saturating_add(1);
                    }
                }
                Ok(None) => {}
                Err(_) => {
                    report.writes = report.writes.saturating_add(1);
                    report.failures = report.failures.saturating_add(1);
                }
            }
        }
        report
    }

    /// Send every joint home (0°) over `params.fallback_duration`.
    pub fn center_all(&mut self, params: &MotionParams, now: Instant) {
        let speed_deg_per_sec = params.speed_deg_per_sec();
        let joints = self.joints;
        for config in joints.iter() {
            if let Err(err) = self.start_motion(
                config.id(),
                0.0,
                speed_deg_per_sec,
                Some(params.fallback_duration()),
                params,
                now,
            ) {
                warn!("joint {} could not be centered: {}", config.id(), err);
            }
        }
    }

    /// Stop every joint where it is.
    ///
    /// The last accepted native position becomes the target and is re-asserted once.
    /// Returns how many of those writes failed.
    pub fn halt_all<W: ActuatorWriter + ?Sized>(&mut self, writer: &mut W) -> u8 {
        let mut failures: u8 = 0;
        for (config, state) in self.joints.iter().zip(self.states.iter_mut()) {
            let native = state.last_native;
            state.target_native = native;
            state.target_angle_deg = config.native_to_degrees(native);
            state.current_angle_deg = state.target_angle_deg;
            state.progress = 1.0;
            state.pending = None;
            state.moving = false;
            if config.actuator().write_native(native, writer).is_err() {
                failures = failures.saturating_add(1);
                self.write_failures = self.write_failures.wrapping_add(1);
            }
        }
        if failures > 0 {
            warn!("halt: {} joint writes failed", failures);
        }
        failures
    }
}
