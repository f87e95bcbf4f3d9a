//! Host-level tests for joint configuration and unit conversion.
#![cfg(feature = "host")]

mod common;

use arm_kit::joint::BUS_UNITS_PER_DEGREE;
use arm_kit::{ARM_JOINTS, Actuator, JointConfig};
use common::assert_close;

#[test]
fn pwm_joint_maps_degrees_onto_0_to_180() {
    let joint = JointConfig::pwm(1, 0);
    assert_eq!(joint.degrees_to_native(-90.0), 0);
    assert_eq!(joint.degrees_to_native(0.0), 90);
    assert_eq!(joint.degrees_to_native(45.0), 135);
    assert_eq!(joint.degrees_to_native(90.0), 180);
}

#[test]
fn pwm_joint_clamps_before_converting() {
    let joint = JointConfig::pwm(1, 0);
    assert_eq!(joint.clamp_angle(100.0), 90.0);
    assert_eq!(joint.degrees_to_native(100.0), 180);
    assert_eq!(joint.degrees_to_native(-1000.0), 0);
}

#[test]
fn bus_joint_max_angle_lands_on_max_native() {
    let joint = JointConfig::bus(4, 4);
    assert_eq!(joint.degrees_to_native(150.0), 4095);
    assert_eq!(joint.degrees_to_native(160.0), 4095);
    assert_eq!(joint.degrees_to_native(-150.0), 0);
    assert_eq!(joint.degrees_to_native(0.0), 2048);
}

#[test]
fn bus_joint_uses_12_bit_units() {
    let joint = JointConfig::bus(3, 3);
    assert_close(joint.units_per_degree(), 4096.0 / 300.0);
    assert_close(BUS_UNITS_PER_DEGREE, 4096.0 / 300.0);
    // 30° -> 2048 + round(409.6)
    assert_eq!(joint.degrees_to_native(30.0), 2458);
    assert_close(joint.native_to_degrees(2048), 0.0);
}

#[test]
fn native_to_degrees_inverts_whole_pwm_degrees() {
    let joint = JointConfig::pwm(2, 1);
    for angle in [-90.0, -23.0, 0.0, 17.0, 90.0] {
        assert_close(joint.native_to_degrees(joint.degrees_to_native(angle)), angle);
    }
}

#[test]
fn every_native_value_survives_a_round_trip_through_degrees() {
    for joint in [JointConfig::pwm(1, 0), JointConfig::bus(3, 3)] {
        let (min_native, max_native) = joint.native_range();
        for native in min_native..=max_native {
            let back = joint.degrees_to_native(joint.native_to_degrees(native));
            assert!(
                back.abs_diff(native) <= 1,
                "{:?}: {native} came back as {back}",
                joint.actuator()
            );
        }
    }
}

#[test]
fn asymmetric_angle_range_is_supported() {
    let joint = JointConfig::bus(1, 9).with_angle_range(-90.0, 150.0);
    assert_eq!(joint.angle_range(), (-90.0, 150.0));
    assert_eq!(joint.clamp_angle(-120.0), -90.0);
    assert_eq!(joint.degrees_to_native(150.0), 4095);
}

#[test]
fn arm_table_has_two_pwm_then_five_bus_joints() {
    let actuators: Vec<Actuator> = ARM_JOINTS.iter().map(JointConfig::actuator).collect();
    assert_eq!(
        actuators,
        vec![
            Actuator::Pwm { channel: 0 },
            Actuator::Pwm { channel: 1 },
            Actuator::Bus { address: 3 },
            Actuator::Bus { address: 4 },
            Actuator::Bus { address: 5 },
            Actuator::Bus { address: 6 },
            Actuator::Bus { address: 7 },
        ]
    );
}

#[test]
fn joint_ids_are_one_based() {
    assert_eq!(ARM_JOINTS.index_of(0), None);
    assert_eq!(ARM_JOINTS.index_of(1), Some(0));
    assert_eq!(ARM_JOINTS.index_of(7), Some(6));
    assert_eq!(ARM_JOINTS.index_of(8), None);
    assert_eq!(ARM_JOINTS.get(3).map(JointConfig::id), Some(3));
}
