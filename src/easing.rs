//! Easing curves that shape every joint motion.
//!
//! All functions map normalized time `t` in `[0, 1]` to normalized progress in `[0, 1]`.

use core::f32::consts::PI;

/// Minimum-jerk curve `10t³ − 15t⁴ + 6t⁵`.
///
/// First and second derivatives are zero at both ends, so the joint starts and stops
/// without a velocity or acceleration step.
#[must_use]
pub fn quintic_ease(t: f32) -> f32 {
    let t3 = t * t * t;
    t3 * (10.0 + t * (-15.0 + 6.0 * t))
}

/// Half-cosine kernel `0.5·(1 − cos(πt))`, the rhythmic pattern-generator component.
#[must_use]
pub fn periodic_kernel(t: f32) -> f32 {
    0.5 * (1.0 - libm::cosf(PI * t))
}

/// Progress at `t`, saturating outside `(0, 1)`.
///
/// With blending on, the result is the convex combination
/// `(1 − alpha)·quintic + alpha·periodic`; `alpha` must already be within `[0, 1]`.
#[must_use]
pub fn blended_progress(t: f32, blend_enabled: bool, alpha: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let quintic = quintic_ease(t);
    if !blend_enabled {
        return quintic;
    }
    (1.0 - alpha) * quintic + alpha * periodic_kernel(t)
}

/// The easing choice captured when a motion starts.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Easing {
    Quintic,
    Blended { alpha: f32 },
}

impl Easing {
    /// Progress at normalized time `t`. See [`blended_progress`].
    #[must_use]
    pub fn progress(self, t: f32) -> f32 {
        match self {
            Self::Quintic => blended_progress(t, false, 0.0),
            Self::Blended { alpha } => blended_progress(t, true, alpha),
        }
    }
}
