//! Dihedral symmetry expansion of crystallized points.
//!
//! A snowflake with `arm_count` arms is built from `arm_count / 2`
//! rotational copies, each paired with its mirror image across the
//! horizontal axis.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::types::Offset;

/// Rotation between consecutive mirror pairs, `4π / arm_count`.
#[inline]
pub fn rotation_step(arm_count: usize) -> f32 {
    2.0 * TAU / arm_count as f32
}

/// Expands `v` into its `arm_count` symmetric counterparts.
///
/// Index `0` is `v` itself and index `1` its vertical mirror `(x, -y)`.
/// Every following pair `(2i + 2, 2i + 3)` is the pair `(2i, 2i + 1)`
/// rotated by [`rotation_step`] around the origin, so the result is closed
/// under that rotation.
///
/// ### Panics
/// Panics if `arm_count` is odd or smaller than 2.
pub fn reflect(v: Offset, arm_count: usize) -> Vec<Offset> {
    assert!(
        arm_count >= 2 && arm_count % 2 == 0,
        "arm count must be even and at least 2, got {arm_count}"
    );

    let rotor = Vec2::from_angle(rotation_step(arm_count));
    let mut arms = Vec::with_capacity(arm_count);
    arms.push(v);
    arms.push(Vec2::new(v.x, -v.y));

    for i in 0..arm_count / 2 - 1 {
        let a = rotor.rotate(arms[2 * i]);
        let b = rotor.rotate(arms[2 * i + 1]);
        arms.push(a);
        arms.push(b);
    }

    arms
}
