//! The arm's actuators on an RP2040/RP2350.
//!
//! | joint | actuator | wiring |
//! |---|---|---|
//! | 1 | PWM servo | `PWM_SLICE0` channel A, GPIO 0 |
//! | 2 | PWM servo | `PWM_SLICE0` channel B, GPIO 1 |
//! | 3..=7 | bus servo, address = joint id | `UART1` TX, GPIO 4, 1 Mbaud |

use embassy_rp::pwm::{Pwm, PwmOutput};

use crate::actuator::ActuatorWriter;
use crate::bus_servo::BusServoLink;
use crate::logging::info;
use crate::pwm_servo::{PwmServo, servo_pwm_config};
use crate::shared_constants::PWM_JOINT_COUNT;
use crate::{Error, Result};

/// Every physical output the trajectory engine writes to.
pub struct ArmActuators<'d> {
    servos: [PwmServo<PwmOutput<'d>>; PWM_JOINT_COUNT],
    bus: BusServoLink<'d>,
}

impl<'d> ArmActuators<'d> {
    /// Take both channels of one PWM slice plus the bus link.
    ///
    /// `pwm` is reconfigured for servo timing, e.g.
    /// `Pwm::new_output_ab(p.PWM_SLICE0, p.PIN_0, p.PIN_1, Config::default())`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PwmWrite`] if `pwm` was not created with both outputs.
    pub fn new(mut pwm: Pwm<'d>, bus: BusServoLink<'d>) -> Result<Self> {
        pwm.set_config(&servo_pwm_config());
        let (Some(output_a), Some(output_b)) = pwm.split() else {
            return Err(Error::PwmWrite(0));
        };
        info!("arm actuators ready: {} pwm, bus link", PWM_JOINT_COUNT);
        Ok(Self {
            servos: [PwmServo::new(output_a, 0), PwmServo::new(output_b, 1)],
            bus,
        })
    }
}

impl ActuatorWriter for ArmActuators<'_> {
    fn set_duty_for_channel(&mut self, channel: u8, native: u16) -> Result<()> {
        self.servos
            .get_mut(usize::from(channel))
            .ok_or(Error::PwmWrite(channel))?
            .set_native(native)
    }

    fn send_framed_write(
        &mut self,
        address: u8,
        native: u16,
        speed: u16,
        accel: u8,
    ) -> Result<()> {
        self.bus.write_position(address, native, speed, accel)
    }
}
