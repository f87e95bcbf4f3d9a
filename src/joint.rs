//! Static joint configuration and the angle ↔ native-unit conversion.
//!
//! See [`JointTable`] for the start-up table and [`ARM_JOINTS`] for the default arm.

use crate::actuator::Actuator;
use crate::shared_constants::JOINT_COUNT;

/// Position units per degree for a 300° bus servo with a 12-bit position register.
pub const BUS_UNITS_PER_DEGREE: f32 = 4096.0 / 300.0;

/// Immutable description of one joint.
///
/// PWM joints use a ±90° convention over native 0..=180 (one unit per degree, centered
/// at 90). Bus joints use ±150° over native 0..=4095 centered at 2048.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JointConfig {
    id: u8,
    actuator: Actuator,
    min_angle_deg: f32,
    max_angle_deg: f32,
    min_native: u16,
    max_native: u16,
    center_native: u16,
    units_per_degree: f32,
}

impl JointConfig {
    /// A PWM hobby servo on output `channel`.
    #[must_use]
    pub const fn pwm(id: u8, channel: u8) -> Self {
        Self {
            id,
            actuator: Actuator::Pwm { channel },
            min_angle_deg: -90.0,
            max_angle_deg: 90.0,
            min_native: 0,
            max_native: 180,
            center_native: 90,
            units_per_degree: 1.0,
        }
    }

    /// A serial-bus servo answering to `address`.
    #[must_use]
    pub const fn bus(id: u8, address: u8) -> Self {
        Self {
            id,
            actuator: Actuator::Bus { address },
            min_angle_deg: -150.0,
            max_angle_deg: 150.0,
            min_native: 0,
            max_native: 4095,
            center_native: 2048,
            units_per_degree: BUS_UNITS_PER_DEGREE,
        }
    }

    /// Narrow (or skew) the commandable angle range. Asymmetric ranges are fine as long
    /// as zero stays inside, since zero is the center/home position.
    #[must_use]
    pub const fn with_angle_range(mut self, min_angle_deg: f32, max_angle_deg: f32) -> Self {
        assert!(min_angle_deg <= 0.0 && 0.0 <= max_angle_deg, "angle range must contain 0");
        self.min_angle_deg = min_angle_deg;
        self.max_angle_deg = max_angle_deg;
        self
    }

    #[must_use]
    pub const fn id(&self) -> u8 {
        self.id
    }

    #[must_use]
    pub const fn actuator(&self) -> Actuator {
        self.actuator
    }

    #[must_use]
    pub const fn angle_range(&self) -> (f32, f32) {
        (self.min_angle_deg, self.max_angle_deg)
    }

    #[must_use]
    pub const fn native_range(&self) -> (u16, u16) {
        (self.min_native, self.max_native)
    }

    #[must_use]
    pub const fn center_native(&self) -> u16 {
        self.center_native
    }

    #[must_use]
    pub const fn units_per_degree(&self) -> f32 {
        self.units_per_degree
    }

    /// Clamp `angle_deg` into this joint's angle range.
    #[must_use]
    pub fn clamp_angle(&self, angle_deg: f32) -> f32 {
        angle_deg.clamp(self.min_angle_deg, self.max_angle_deg)
    }

    /// Logical angle to the actuator's native unit.
    ///
    /// The angle is clamped to the angle range first and the result to the native range,
    /// so an out-of-range native value is never produced.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "clamped to the u16 native range just before the cast"
    )]
    pub fn degrees_to_native(&self, angle_deg: f32) -> u16 {
        let offset = libm::roundf(self.clamp_angle(angle_deg) * self.units_per_degree);
        let native = (f32::from(self.center_native) + offset)
            .clamp(f32::from(self.min_native), f32::from(self.max_native));
        native as u16
    }

    /// Native unit back to a logical angle. Pure affine inverse, no clamping.
    #[must_use]
    pub fn native_to_degrees(&self, native: u16) -> f32 {
        (f32::from(native) - f32::from(self.center_native)) / self.units_per_degree
    }
}

/// The fixed joint table built once at start-up.
///
/// Joint ids must be exactly `1..=N`, in order; this is checked at compile time when the
/// table is a `const`.
///
/// ```compile_fail
/// use arm_kit::joint::{JointConfig, JointTable};
/// // Ids out of order - caught at compile time
/// const BAD: JointTable<2> = JointTable::new([JointConfig::pwm(2, 0), JointConfig::pwm(1, 1)]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointTable<const N: usize> {
    joints: [JointConfig; N],
}

impl<const N: usize> JointTable<N> {
    #[must_use]
    pub const fn new(joints: [JointConfig; N]) -> Self {
        assert!(N > 0, "at least one joint required");
        assert!(N <= u8::MAX as usize, "joint ids must fit in u8");
        let mut index = 0;
        while index < N {
            let joint = &joints[index];
            assert!(joint.id as usize == index + 1, "joint ids must be 1..=N in order");
            assert!(
                joint.min_native <= joint.center_native && joint.center_native <= joint.max_native,
                "center must lie inside the native range"
            );
            index += 1;
        }
        Self { joints }
    }

    /// Look up a joint by its 1-based id.
    #[must_use]
    pub fn get(&self, joint_id: u8) -> Option<&JointConfig> {
        self.joints.get(self.index_of(joint_id)?)
    }

    /// Zero-based slot of a 1-based joint id, if configured.
    #[must_use]
    pub fn index_of(&self, joint_id: u8) -> Option<usize> {
        let index = usize::from(joint_id.checked_sub(1)?);
        (index < N).then_some(index)
    }

    #[must_use]
    pub const fn joints(&self) -> &[JointConfig; N] {
        &self.joints
    }

    pub fn iter(&self) -> impl Iterator<Item = &JointConfig> {
        self.joints.iter()
    }
}

/// Two PWM servos (ids 1–2 on channels 0–1) then five bus servos (ids 3–7 at addresses 3–7).
pub const ARM_JOINTS: JointTable<JOINT_COUNT> = JointTable::new([
    JointConfig::pwm(1, 0),
    JointConfig::pwm(2, 1),
    JointConfig::bus(3, 3),
    JointConfig::bus(4, 4),
    JointConfig::bus(5, 5),
    JointConfig::bus(6, 6),
    JointConfig::bus(7, 7),
]);
