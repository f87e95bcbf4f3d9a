//! Host-level tests for the easing curves.
#![cfg(feature = "host")]

mod common;

use arm_kit::easing::{Easing, blended_progress, periodic_kernel, quintic_ease};
use common::assert_close;

#[test]
fn quintic_hits_endpoints_and_midpoint() {
    assert_close(quintic_ease(0.0), 0.0);
    assert_close(quintic_ease(0.5), 0.5);
    assert_close(quintic_ease(1.0), 1.0);
}

#[test]
fn quintic_is_symmetric_about_midpoint() {
    for step in 0..=20 {
        let t = step as f32 / 20.0;
        assert_close(quintic_ease(t) + quintic_ease(1.0 - t), 1.0);
    }
}

#[test]
fn periodic_kernel_hits_endpoints_and_midpoint() {
    assert_close(periodic_kernel(0.0), 0.0);
    assert_close(periodic_kernel(0.5), 0.5);
    assert_close(periodic_kernel(1.0), 1.0);
}

#[test]
fn progress_saturates_outside_unit_interval() {
    for (blend_enabled, alpha) in [(false, 0.0), (true, 0.25), (true, 1.0)] {
        assert_eq!(blended_progress(-0.5, blend_enabled, alpha), 0.0);
        assert_eq!(blended_progress(0.0, blend_enabled, alpha), 0.0);
        assert_eq!(blended_progress(1.0, blend_enabled, alpha), 1.0);
        assert_eq!(blended_progress(3.0, blend_enabled, alpha), 1.0);
    }
}

#[test]
fn blending_off_ignores_alpha() {
    assert_close(blended_progress(0.3, false, 0.9), quintic_ease(0.3));
}

#[test]
fn blend_is_convex_combination() {
    let t = 0.25;
    assert_close(blended_progress(t, true, 0.0), quintic_ease(t));
    assert_close(blended_progress(t, true, 1.0), periodic_kernel(t));
    assert_close(
        blended_progress(t, true, 0.25),
        0.75 * quintic_ease(t) + 0.25 * periodic_kernel(t),
    );
}

#[test]
fn progress_is_monotonic_and_bounded() {
    for alpha in [0.0, 0.25, 0.5, 1.0] {
        let mut previous = 0.0;
        for step in 0..=100 {
            let progress = blended_progress(step as f32 / 100.0, true, alpha);
            assert!((0.0..=1.0).contains(&progress), "alpha {alpha}: {progress}");
            assert!(progress + 1e-6 >= previous, "alpha {alpha} not monotonic");
            previous = progress;
        }
    }
}

#[test]
fn easing_variants_dispatch() {
    assert_close(Easing::Quintic.progress(0.2), quintic_ease(0.2));
    assert_close(
        Easing::Blended { alpha: 0.5 }.progress(0.2),
        blended_progress(0.2, true, 0.5),
    );
}
