//! CPU reference for the particle vertex displacement.
//!
//! The WGSL in `particles.wgsl` follows the same formulas; keeping a copy here
//! lets tests pin the invariant that motion never grows as calm rises.

use crate::constants::{
    CALM_MAX, CALM_RENDER_SMOOTHING, CENTER_CALM_RADIUS, CENTER_MOTION_FLOOR, CURSOR_FIELD_RADIUS,
};
use glam::{Vec2, Vec3};

#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Renderer-side pursuit of the published calm factor.
#[inline]
pub fn smooth_calm(effective: f32, published: f32) -> f32 {
    let next = effective + (published - effective) * CALM_RENDER_SMOOTHING;
    next.clamp(0.0, CALM_MAX)
}

/// Overall motion multiplier: `1 − calm`, further reduced for particles near
/// the centre where the page text sits.
#[inline]
pub fn motion_intensity(effective_calm: f32, distance_from_center: f32) -> f32 {
    let base = 1.0 - effective_calm.clamp(0.0, 1.0);
    let edge = smoothstep(0.0, CENTER_CALM_RADIUS, distance_from_center);
    base * (CENTER_MOTION_FLOOR + (1.0 - CENTER_MOTION_FLOOR) * edge)
}

/// Uniform values the displacement depends on.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionInputs {
    pub time: f32,
    pub cursor: Vec2,
    pub scroll_velocity: f32,
    pub transition_progress: f32,
    pub effective_calm: f32,
}

/// Slow trigonometric drift standing in for low-frequency 3D noise.
#[inline]
pub fn drift(base: Vec3, random: f32, time: f32) -> Vec3 {
    let phase = random * std::f32::consts::TAU;
    Vec3::new(
        (base.y * 0.35 + time * 0.21 + phase).sin(),
        (base.x * 0.3 - time * 0.17 + phase).cos(),
        ((base.x + base.y) * 0.25 + time * 0.13).sin(),
    ) * 0.6
}

/// Rotation-like swirl around the cursor, fading out beyond the field radius.
#[inline]
pub fn cursor_swirl(base: Vec3, cursor: Vec2) -> Vec3 {
    let offset = base.truncate() - cursor;
    let d = offset.length();
    if d < 1e-4 {
        return Vec3::ZERO;
    }
    let falloff = 1.0 - smoothstep(0.0, CURSOR_FIELD_RADIUS, d);
    let tangent = Vec2::new(-offset.y, offset.x) / d;
    let push = offset / d * 0.35;
    ((tangent + push) * falloff * 1.2).extend(0.0)
}

#[inline]
pub fn scroll_wobble(random: f32, time: f32, scroll_velocity: f32) -> Vec3 {
    let phase = random * std::f32::consts::TAU;
    Vec3::new(0.0, (time * 3.0 + phase).sin(), (time * 2.0 + phase).cos() * 0.5)
        * scroll_velocity
        * 0.8
}

/// Depth scatter while close to a section boundary.
#[inline]
pub fn transition_scatter(random: f32, transition_progress: f32) -> Vec3 {
    Vec3::new(0.0, 0.0, (random - 0.5) * 2.0 * (1.0 - transition_progress))
}

/// Total displacement for one particle.
pub fn displacement(base: Vec3, random: f32, inputs: &MotionInputs) -> Vec3 {
    let sum = drift(base, random, inputs.time)
        + cursor_swirl(base, inputs.cursor)
        + scroll_wobble(random, inputs.time, inputs.scroll_velocity)
        + transition_scatter(random, inputs.transition_progress);
    sum * motion_intensity(inputs.effective_calm, base.truncate().length())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_never_increases_with_calm() {
        for d in [0.0, 2.0, 5.0, 12.0] {
            let mut prev = f32::MAX;
            for step in 0..=90 {
                let calm = step as f32 * 0.01;
                let m = motion_intensity(calm, d);
                assert!(m <= prev + 1e-6);
                prev = m;
            }
        }
    }

    #[test]
    fn centre_moves_less_than_edge() {
        assert!(motion_intensity(0.2, 0.5) < motion_intensity(0.2, 10.0));
        assert!((motion_intensity(0.0, 0.0) - CENTER_MOTION_FLOOR).abs() < 1e-6);
    }

    #[test]
    fn swirl_vanishes_far_from_cursor() {
        let far = cursor_swirl(Vec3::new(20.0, 0.0, 0.0), Vec2::ZERO);
        assert_eq!(far, Vec3::ZERO);
        let near = cursor_swirl(Vec3::new(1.0, 0.0, 0.0), Vec2::ZERO);
        assert!(near.length() > 0.5);
    }

    #[test]
    fn displacement_shrinks_as_calm_rises() {
        let bases = [
            Vec3::ZERO,
            Vec3::new(1.5, -0.5, 0.3),
            Vec3::new(-4.0, 3.0, -1.0),
            Vec3::new(9.0, 6.0, 2.0),
        ];
        for base in bases {
            for random in [0.0, 0.37, 0.91] {
                let mut inputs = MotionInputs {
                    time: 3.25,
                    cursor: Vec2::new(1.0, 0.5),
                    scroll_velocity: 0.8,
                    transition_progress: 0.6,
                    effective_calm: 0.0,
                };
                let mut prev = f32::MAX;
                for step in 0..=90 {
                    inputs.effective_calm = step as f32 * 0.01;
                    let len = displacement(base, random, &inputs).length();
                    assert!(
                        len <= prev + 1e-5,
                        "base {base} random {random}: {len} > {prev} at calm {}",
                        inputs.effective_calm
                    );
                    prev = len;
                }
            }
        }
    }

    #[test]
    fn still_inputs_leave_only_drift() {
        let base = Vec3::new(6.0, -2.0, 0.0);
        let inputs = MotionInputs {
            cursor: Vec2::splat(100.0),
            transition_progress: 1.0,
            ..MotionInputs::default()
        };
        assert_eq!(cursor_swirl(base, inputs.cursor), Vec3::ZERO);
        assert_eq!(scroll_wobble(0.4, 0.0, 0.0), Vec3::ZERO);
        assert_eq!(transition_scatter(0.4, 1.0), Vec3::ZERO);
        let expected = drift(base, 0.4, 0.0) * motion_intensity(0.0, base.truncate().length());
        let got = displacement(base, 0.4, &inputs);
        assert!((got - expected).length() < 1e-6);
    }

    #[test]
    fn shader_uses_the_same_constants() {
        let src = crate::PARTICLES_WGSL;
        for (name, value) in [
            ("CURSOR_FIELD_RADIUS", CURSOR_FIELD_RADIUS),
            ("CENTER_CALM_RADIUS", CENTER_CALM_RADIUS),
            ("CENTER_MOTION_FLOOR", CENTER_MOTION_FLOOR),
        ] {
            let line = src
                .lines()
                .find(|l| l.starts_with(&format!("const {name}: f32 = ")))
                .unwrap_or_else(|| panic!("{name} missing from particles.wgsl"));
            let literal = line
                .trim_end_matches(';')
                .rsplit(' ')
                .next()
                .unwrap();
            assert_eq!(literal.parse::<f32>().unwrap(), value, "{name}");
        }
    }

    #[test]
    fn renderer_calm_pursues_published_value() {
        let mut e = 0.0;
        for _ in 0..500 {
            e = smooth_calm(e, 0.6);
        }
        assert!((e - 0.6).abs() < 1e-3);
    }
}
