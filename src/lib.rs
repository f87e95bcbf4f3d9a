//! Motion control for a seven-joint arm: two PWM servos and five serial-bus servos driven
//! from one fixed-cadence control loop.
#![no_std]

mod logging;

pub mod actuator;
#[cfg(any(feature = "pico1", feature = "pico2"))]
pub mod arm_hardware;
pub mod bus_servo;
pub mod command;
pub mod control_loop;
pub mod controller;
pub mod easing;
mod error;
pub mod feedback;
pub mod joint;
pub mod line_reader;
pub mod motion_params;
pub mod pwm_servo;
mod shared_constants;
pub mod trajectory;

// Re-export commonly used items
pub use actuator::{Actuator, ActuatorWriter};
#[cfg(any(feature = "pico1", feature = "pico2"))]
pub use arm_hardware::ArmActuators;
pub use command::Command;
pub use control_loop::CommandLinkStatic;
pub use controller::{ArmController, Reply, Stats, TickOutput};
pub use easing::Easing;
pub use error::{Error, Result};
pub use joint::{ARM_JOINTS, JointConfig, JointTable};
pub use motion_params::MotionParams;
pub use shared_constants::*;
pub use trajectory::{JointState, TrajectoryEngine};
