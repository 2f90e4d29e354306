//! Cursor force-field: pointer pixels → world space → spring-damped follow.
//!
//! The smoothed position lags the pointer by a frame or two on purpose; the
//! field should bias particles near the cursor, not pin them to it.

use crate::constants::{CURSOR_DAMPING, CURSOR_STIFFNESS, CURSOR_WORLD_HALF_HEIGHT};
use crate::store::AnimationStore;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringParams {
    pub stiffness: f32,
    pub damping: f32,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            stiffness: CURSOR_STIFFNESS,
            damping: CURSOR_DAMPING,
        }
    }
}

/// Spring registers: where the pointer is, where we draw it, and how fast
/// the drawn point is moving.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpringState {
    pub target: Vec2,
    pub current: Vec2,
    pub velocity: Vec2,
}

/// One frame of the spring-damper.
#[inline]
pub fn spring_step(state: SpringState, params: SpringParams) -> SpringState {
    let d = state.target - state.current;
    let velocity = (state.velocity + d * params.stiffness) * params.damping;
    SpringState {
        target: state.target,
        current: state.current + velocity,
        velocity,
    }
}

/// Map viewport pixels to the world box `±half_height·aspect` × `±half_height`.
/// Screen y grows downward, world y grows upward.
#[inline]
pub fn pixel_to_world(px: Vec2, viewport: Vec2, half_height: f32) -> Vec2 {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return Vec2::ZERO;
    }
    let aspect = viewport.x / viewport.y;
    let ndc_x = (px.x / viewport.x) * 2.0 - 1.0;
    let ndc_y = 1.0 - (px.y / viewport.y) * 2.0;
    Vec2::new(ndc_x * half_height * aspect, ndc_y * half_height)
}

#[derive(Clone, Debug)]
pub struct CursorField {
    spring: SpringState,
    params: SpringParams,
    half_height: f32,
    enabled: bool,
}

impl Default for CursorField {
    fn default() -> Self {
        Self::new(SpringParams::default(), CURSOR_WORLD_HALF_HEIGHT)
    }
}

impl CursorField {
    pub fn new(params: SpringParams, half_height: f32) -> Self {
        Self {
            spring: SpringState::default(),
            params,
            half_height,
            enabled: true,
        }
    }

    /// A controller that never moves; used on touch devices.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> SpringState {
        self.spring
    }

    pub fn current(&self) -> Vec2 {
        self.spring.current
    }

    pub fn set_target_world(&mut self, target: Vec2) {
        if self.enabled && target.is_finite() {
            self.spring.target = target;
        }
    }

    pub fn on_pointer_move(&mut self, px: Vec2, viewport: Vec2) {
        self.set_target_world(pixel_to_world(px, viewport, self.half_height));
    }

    /// Advance one frame and publish. Runs every frame regardless of pointer
    /// activity; disabled controllers publish nothing.
    pub fn tick(&mut self, store: &mut AnimationStore) {
        if !self.enabled {
            return;
        }
        self.spring = spring_step(self.spring, self.params);
        store.set_cursor_position(self.spring.current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_mapping_corners() {
        let vp = Vec2::new(1600.0, 800.0);
        let tl = pixel_to_world(Vec2::ZERO, vp, 8.0);
        assert!((tl - Vec2::new(-16.0, 8.0)).length() < 1e-5);
        let centre = pixel_to_world(vp * 0.5, vp, 8.0);
        assert!(centre.length() < 1e-5);
        assert_eq!(pixel_to_world(Vec2::ONE, Vec2::ZERO, 8.0), Vec2::ZERO);
    }

    #[test]
    fn first_step_moves_a_fraction_of_the_gap() {
        let s = SpringState {
            target: Vec2::new(10.0, 0.0),
            ..Default::default()
        };
        let next = spring_step(s, SpringParams::default());
        assert!((next.current.x - 10.0 * 0.06 * 0.75).abs() < 1e-5);
    }

    #[test]
    fn disabled_field_ignores_input() {
        let mut store = AnimationStore::new();
        let mut c = CursorField::disabled();
        c.on_pointer_move(Vec2::new(10.0, 10.0), Vec2::new(100.0, 100.0));
        c.tick(&mut store);
        assert_eq!(c.current(), Vec2::ZERO);
        assert_eq!(store.cursor_position(), Vec2::ZERO);
    }
}
