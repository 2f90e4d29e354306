//! GPU-side layout of the published uniform contract.
//!
//! Field order matches the `Scene` struct in the WGSL sources, where members
//! keep their contract names (`uTime`, `uScrollProgress`, ...).

use crate::camera::Camera;
use crate::store::FrameUniforms;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// `uCursorPosition`, world space
    pub cursor_position: [f32; 2],
    pub resolution: [f32; 2],
    /// `uTime`, seconds
    pub time: f32,
    pub scroll_progress: f32,
    pub section_progress: f32,
    pub scroll_velocity: f32,
    pub transition_progress: f32,
    /// `uSectionIndex`, integer stored as float
    pub section_index: f32,
    pub calm_factor: f32,
    pub effective_calm: f32,
    /// 1 when `uVelocityField` holds a live texture, 0 for the neutral stand-in
    pub velocity_field_active: f32,
    pub point_size: f32,
    pub _pad: [f32; 2],
}

impl SceneUniforms {
    pub fn new(
        camera: &Camera,
        resolution: [f32; 2],
        time: f32,
        mirror: &FrameUniforms,
        effective_calm: f32,
        point_size: f32,
    ) -> Self {
        Self {
            view_proj: camera.view_proj().to_cols_array_2d(),
            camera_pos: camera.eye.extend(1.0).to_array(),
            cursor_position: mirror.cursor_position.to_array(),
            resolution,
            time,
            scroll_progress: mirror.scroll_progress,
            section_progress: mirror.section_progress,
            scroll_velocity: mirror.scroll_velocity,
            transition_progress: mirror.transition_progress,
            section_index: mirror.section_index,
            calm_factor: mirror.calm_factor,
            effective_calm,
            velocity_field_active: if mirror.velocity_field.is_some() {
                1.0
            } else {
                0.0
            },
            point_size,
            _pad: [0.0; 2],
        }
    }
}
