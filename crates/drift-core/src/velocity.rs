//! CPU side of the velocity-field feedback renderer: pointer velocity
//! damping, target sizing and the blur kernel the shader applies.

use crate::constants::*;
use glam::Vec2;

/// 3×3 blur weights, row-major, summing to 1.
pub const BLUR_KERNEL: [[f32; 3]; 3] = [
    [BLUR_CORNER, BLUR_EDGE, BLUR_CORNER],
    [BLUR_EDGE, BLUR_CENTER, BLUR_EDGE],
    [BLUR_CORNER, BLUR_EDGE, BLUR_CORNER],
];

/// Sizes of the high-res paint targets and the low-res feedback target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldResolution {
    pub hi: (u32, u32),
    pub lo: (u32, u32),
}

impl FieldResolution {
    pub fn for_viewport(width: u32, height: u32) -> Self {
        Self {
            hi: (width / FIELD_HI_DIVISOR, height / FIELD_HI_DIVISOR),
            lo: (width / FIELD_LO_DIVISOR, height / FIELD_LO_DIVISOR),
        }
    }

    /// Tiny viewports produce zero-sized targets; the pipeline skips those.
    pub fn is_renderable(&self) -> bool {
        self.hi.0 > 0 && self.hi.1 > 0 && self.lo.0 > 0 && self.lo.1 > 0
    }
}

/// Exponentially damped pointer delta, in uv units per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerVelocity {
    last: Option<Vec2>,
    velocity: Vec2,
}

impl PointerVelocity {
    /// Feed this frame's pointer uv and return the damped velocity.
    pub fn sample(&mut self, uv: Vec2) -> Vec2 {
        let raw = match self.last {
            Some(prev) => uv - prev,
            None => Vec2::ZERO,
        };
        self.last = Some(uv);
        self.velocity =
            self.velocity * POINTER_VELOCITY_KEEP + raw * (1.0 - POINTER_VELOCITY_KEEP);
        self.velocity
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }
}

/// Brush parameters for the paint pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushParams {
    pub radius: f32,
    pub softness: f32,
    pub decay: f32,
}

impl Default for BrushParams {
    fn default() -> Self {
        Self {
            radius: BRUSH_RADIUS,
            softness: BRUSH_SOFTNESS,
            decay: FIELD_DECAY,
        }
    }
}

/// Radial falloff of the brush: 1 inside `radius`, smooth to 0 over
/// `softness`. Mirrors the paint shader.
pub fn brush_falloff(distance: f32, brush: &BrushParams) -> f32 {
    let edge0 = brush.radius;
    let edge1 = brush.radius + brush.softness.max(1e-6);
    let t = ((distance - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    1.0 - t * t * (3.0 - 2.0 * t)
}

/// Inverse of `cursor::pixel_to_world`, landing in \[0, 1\] uv (y down).
#[inline]
pub fn world_to_uv(world: Vec2, aspect: f32, half_height: f32) -> Vec2 {
    if aspect <= 0.0 || half_height <= 0.0 {
        return Vec2::splat(0.5);
    }
    let ndc = Vec2::new(world.x / (half_height * aspect), world.y / half_height);
    Vec2::new(ndc.x * 0.5 + 0.5, 0.5 - ndc.y * 0.5)
}

/// Raw pointer pixels as \[0, 1\] uv (y down). `None` until the viewport
/// has a size or when the event carried non-finite coordinates.
#[inline]
pub fn pixel_to_uv(px: Vec2, viewport: Vec2) -> Option<Vec2> {
    if !(viewport.x > 0.0 && viewport.y > 0.0) || !px.is_finite() {
        return None;
    }
    Some(px / viewport)
}
