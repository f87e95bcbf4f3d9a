//! The command interpreter and the per-tick control step.
//!
//! [`ArmController`] owns the trajectory engine, the motion parameters and the stream
//! schedule. One [`ArmController::tick`] is one control loop iteration: interpret at most
//! one command line, sample every moving joint, then maybe emit an `rt` line.

use core::fmt;

use embassy_time::{Duration, Instant};

use crate::actuator::ActuatorWriter;
use crate::command::Command;
use crate::feedback::{AngleList, FeedbackKind, JointAngle, StreamSchedule};
use crate::joint::JointTable;
use crate::logging::{info, warn};
use crate::motion_params::MotionParams;
use crate::shared_constants::{FEEDBACK_PERIOD, MAX_SPEED_DEG_PER_SEC, MIN_SPEED_DEG_PER_SEC};
use crate::trajectory::{TickReport, TrajectoryEngine};
use crate::{Error, Result};

/// Counters reported by `stats`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stats {
    pub lines_received: u32,
    pub commands_processed: u32,
    pub commands_rejected: u32,
    pub truncated_lines: u32,
    pub write_failures: u32,
}

/// The status or feedback line produced by one command.
#[derive(Clone, Copy, Debug)]
pub enum Reply<const N: usize> {
    Moving {
        joint_id: u8,
        requested_deg: f32,
        target_deg: f32,
        duration: Duration,
        clamped: bool,
    },
    SpeedSet {
        requested: f32,
        speed: f32,
        clamped: bool,
    },
    DurationSet(Duration),
    BlendSet(bool),
    BlendAlphaSet {
        requested: f32,
        alpha: f32,
        clamped: bool,
    },
    Joint(JointAngle),
    All(AngleList<N>),
    StreamSet(bool),
    Centering,
    Halted {
        failures: u8,
    },
    Stats(Stats),
    Rejected(Error),
}

const fn enabled_word(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}

impl<const N: usize> fmt::Display for Reply<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Moving {
                joint_id,
                target_deg,
                duration,
                clamped: false,
                ..
            } => write!(
                f,
                "joint {joint_id} moving to {target_deg:.1} deg over {} ms",
                duration.as_millis()
            ),
            Self::Moving {
                joint_id,
                requested_deg,
                target_deg,
                duration,
                ..
            } => write!(
                f,
                "joint {joint_id}: {requested_deg:.1} clamped to {target_deg:.1} deg, moving over {} ms",
                duration.as_millis()
            ),
            Self::SpeedSet {
                speed,
                clamped: false,
                ..
            } => write!(f, "speed set to {speed:.1} deg/s"),
            Self::SpeedSet {
                requested, speed, ..
            } => {
                write!(f, "speed {requested:.1} clamped to {speed:.1} deg/s")
            }
            Self::DurationSet(duration) => {
                write!(f, "duration set to {} ms", duration.as_millis())
            }
            Self::BlendSet(enabled) => write!(f, "blend {}", enabled_word(*enabled)),
            Self::BlendAlphaSet {
                alpha,
                clamped: false,
                ..
            } => write!(f, "blend alpha set to {alpha:.2}"),
            Self::BlendAlphaSet {
                requested, alpha, ..
            } => {
                write!(f, "blend alpha {requested:.2} clamped to {alpha:.2}")
            }
            Self::Joint(joint_angle) => write!(f, "{joint_angle}"),
            Self::All(angle_list) => write!(f, "{angle_list}"),
            Self::StreamSet(enabled) => write!(f, "stream {}", enabled_word(*enabled)),
            Self::Centering => f.write_str("centering all joints"),
            Self::Halted { failures: 0 } => f.write_str("all joints halted"),
            Self::Halted { failures } => {
                write!(f, "all joints halted ({failures} writes failed)")
            }
            Self::Stats(stats) => write!(
                f,
                "stats lines={} cmds={} rejected={} truncated={} write_failures={}",
                stats.lines_received,
                stats.commands_processed,
                stats.commands_rejected,
                stats.truncated_lines,
                stats.write_failures
            ),
            Self::Rejected(err) => write!(f, "err {err}"),
        }
    }
}

/// Everything one control loop iteration wants sent back to the host.
#[derive(Clone, Copy, Debug)]
pub struct TickOutput<const N: usize> {
    pub reply: Option<Reply<N>>,
    pub report: TickReport,
    pub stream: Option<AngleList<N>>,
}

/// Interprets commands and drives the trajectory engine, one tick at a time.
#[derive(Clone, Debug)]
pub struct ArmController<const N: usize> {
    engine: TrajectoryEngine<N>,
    params: MotionParams,
    stream: StreamSchedule,
    stats: Stats,
}

impl<const N: usize> ArmController<N> {
    #[must_use]
    pub fn new(joints: JointTable<N>) -> Self {
        Self::with_params(joints, MotionParams::default())
    }

    #[must_use]
    pub fn with_params(joints: JointTable<N>, params: MotionParams) -> Self {
        Self {
            engine: TrajectoryEngine::new(joints),
            params,
            stream: StreamSchedule::new(FEEDBACK_PERIOD),
            stats: Stats::default(),
        }
    }

    #[must_use]
    pub const fn engine(&self) -> &TrajectoryEngine<N> {
        &self.engine
    }

    #[must_use]
    pub const fn params(&self) -> &MotionParams {
        &self.params
    }

    #[must_use]
    pub const fn stream_enabled(&self) -> bool {
        self.stream.enabled()
    }

    #[must_use]
    pub const fn stats(&self) -> Stats {
        let mut stats = self.stats;
        stats.write_failures = self.engine.write_failures();
        stats
    }

    /// Count a line the receiver had to cut short.
    pub const fn note_truncated_line(&mut self) {
        self.stats.truncated_lines = self.stats.truncated_lines.wrapping_add(1);
    }

    /// Home every joint; called once before the loop starts.
    pub fn start(&mut self, now: Instant) {
        info!("centering {} joints", N);
        self.engine.center_all(&self.params, now);
    }

    /// One control loop iteration.
    pub fn tick<W: ActuatorWriter + ?Sized>(
        &mut self,
        line: Option<&str>,
        now: Instant,
        writer: &mut W,
    ) -> TickOutput<N> {
        let reply = line.and_then(|line| self.interpret(line, now, writer));
        let report = self.engine.tick(now, writer);
        let stream = self.stream.poll(now).then(|| AngleList {
            kind: FeedbackKind::Stream,
            angles_deg: self.engine.current_angles(),
        });
        TickOutput {
            reply,
            report,
            stream,
        }
    }

    /// Parse and execute one line. `None` means nothing is sent back.
    pub fn interpret<W: ActuatorWriter + ?Sized>(
        &mut self,
        line: &str,
        now: Instant,
        writer: &mut W,
    ) -> Option<Reply<N>> {
        self.stats.lines_received = self.stats.lines_received.wrapping_add(1);
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(Error::EmptyCommand) => return None,
            Err(err) => return Some(self.reject(err)),
        };
        match self.execute(command, now, writer) {
            Ok(reply) => {
                self.stats.commands_processed = self.stats.commands_processed.wrapping_add(1);
                Some(reply)
            }
            // A read of an unknown joint gets no line at all.
            Err(err) if matches!(command, Command::Read(_)) => {
                self.reject(err);
                None
            }
            Err(err) => Some(self.reject(err)),
        }
    }

    fn reject(&mut self, err: Error) -> Reply<N> {
        self.stats.commands_rejected = self.stats.commands_rejected.wrapping_add(1);
        warn!("command rejected: {}", err);
        Reply::Rejected(err)
    }

    /// Execute an already parsed command.
    ///
    /// # Errors
    ///
    /// Returns the reason a command was refused; no state has changed in that case.
    pub fn execute<W: ActuatorWriter + ?Sized>(
        &mut self,
        command: Command,
        now: Instant,
        writer: &mut W,
    ) -> Result<Reply<N>> {
        let reply = match command {
            Command::Move {
                joint_id,
                angle_deg,
                duration,
            } => {
                let joint_id = u8::try_from(joint_id).map_err(|_| Error::InvalidJoint(joint_id))?;
                let state = self.engine.start_motion(
                    joint_id,
                    angle_deg,
                    self.params.speed_deg_per_sec(),
                    duration,
                    &self.params,
                    now,
                )?;
                let (target_deg, duration) = (state.target_angle_deg(), state.duration());
                let clamped = self
                    .engine
                    .joints()
                    .get(joint_id)
                    .is_some_and(|config| {
                        let (min_deg, max_deg) = config.angle_range();
                        !(min_deg..=max_deg).contains(&angle_deg)
                    });
                Reply::Moving {
                    joint_id,
                    requested_deg: angle_deg,
                    target_deg,
                    duration,
                    clamped,
                }
            }
            Command::Speed(requested) => Reply::SpeedSet {
                requested,
                speed: self.params.set_speed(requested)?,
                clamped: !(MIN_SPEED_DEG_PER_SEC..=MAX_SPEED_DEG_PER_SEC).contains(&requested),
            },
            Command::Duration(millis) => {
                Reply::DurationSet(self.params.set_fallback_duration(millis)?)
            }
            Command::Blend(enabled) => {
                self.params.set_blend_enabled(enabled);
                Reply::BlendSet(enabled)
            }
            Command::BlendAlpha(requested) => Reply::BlendAlphaSet {
                requested,
                alpha: self.params.set_blend_alpha(requested)?,
                clamped: !(0.0..=1.0).contains(&requested),
            },
            Command::Read(joint_id) => {
                let invalid = Error::InvalidJoint(joint_id);
                let joint_id = u8::try_from(joint_id).map_err(|_| invalid)?;
                let state = self.engine.state(joint_id).ok_or(invalid)?;
                Reply::Joint(JointAngle {
                    joint_id,
                    angle_deg: state.current_angle_deg(),
                })
            }
            Command::ReadAll => Reply::All(AngleList {
                kind: FeedbackKind::Snapshot,
                angles_deg: self.engine.current_angles(),
            }),
            Command::Stream(enabled) => {
                self.stream.set_enabled(enabled);
                Reply::StreamSet(enabled)
            }
            Command::Center => {
                self.engine.center_all(&self.params, now);
                Reply::Centering
            }
            Command::Stop => Reply::Halted {
                failures: self.engine.halt_all(writer),
            },
            Command::Stats => Reply::Stats(self.stats()),
        };
        Ok(reply)
    }
}
