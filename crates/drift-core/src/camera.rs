//! Section-driven camera with slow exponential follow and cursor parallax.

use crate::constants::*;
use crate::section::{CameraPose, SectionTable};
use crate::store::FrameUniforms;
use glam::{Mat4, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(eye: Vec3, target: Vec3, aspect: f32) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect.max(1e-3), self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Pose between the current section's and the next section's, blended by
/// intra-section progress. The last section blends with itself.
pub fn section_pose(table: &SectionTable, section_index: usize, section_progress: f32) -> CameraPose {
    let from = table.pose(section_index);
    let to = table.pose((section_index + 1).min(table.len().saturating_sub(1)));
    let t = section_progress.clamp(0.0, 1.0);
    CameraPose {
        position: from.position.lerp(to.position, t),
        look_at: from.look_at.lerp(to.look_at, t),
    }
}

/// Parallax offset from the smoothed cursor; shrinks as calm rises.
#[inline]
pub fn parallax_offset(uniforms: &FrameUniforms) -> Vec3 {
    let scale = CAMERA_PARALLAX / CURSOR_WORLD_HALF_HEIGHT * (1.0 - uniforms.calm_factor);
    Vec3::new(uniforms.cursor_position.x, uniforms.cursor_position.y, 0.0) * scale
}

#[derive(Clone, Debug)]
pub struct CameraRig {
    position: Vec3,
    look_at: Vec3,
    smoothing: f32,
    initialized: bool,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            look_at: Vec3::ZERO,
            smoothing: CAMERA_SMOOTHING,
            initialized: false,
        }
    }
}

impl CameraRig {
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    /// Move one frame toward the pose implied by `uniforms`. The first call
    /// snaps so the page does not open with a long fly-in.
    pub fn step(&mut self, table: &SectionTable, uniforms: &FrameUniforms, aspect: f32) -> Camera {
        let pose = section_pose(
            table,
            uniforms.section_index as usize,
            uniforms.section_progress,
        );
        let target_pos = pose.position + parallax_offset(uniforms);
        if !self.initialized {
            self.position = target_pos;
            self.look_at = pose.look_at;
            self.initialized = true;
        } else {
            self.position += (target_pos - self.position) * self.smoothing;
            self.look_at += (pose.look_at - self.look_at) * self.smoothing;
        }
        Camera::new(self.position, self.look_at, aspect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn pose_blends_toward_next_section() {
        let t = SectionTable::default();
        let p0 = section_pose(&t, 1, 0.0);
        let p1 = section_pose(&t, 1, 1.0);
        assert_eq!(p0.position, t.pose(1).position);
        assert_eq!(p1.position, t.pose(2).position);
        let last = section_pose(&t, 5, 0.7);
        assert_eq!(last.position, t.pose(5).position);
    }

    #[test]
    fn rig_moves_slowly_after_first_frame() {
        let table = SectionTable::default();
        let mut rig = CameraRig::default();
        let mut u = FrameUniforms::default();
        rig.step(&table, &u, 1.5);
        let start = rig.position();
        u.section_index = 3.0;
        rig.step(&table, &u, 1.5);
        let goal = table.pose(3).position;
        let moved = (rig.position() - start).length();
        assert!((moved - (goal - start).length() * CAMERA_SMOOTHING).abs() < 1e-4);
    }

    #[test]
    fn parallax_shrinks_with_calm() {
        let mut u = FrameUniforms {
            cursor_position: Vec2::new(8.0, 4.0),
            ..Default::default()
        };
        let loose = parallax_offset(&u).length();
        u.calm_factor = 0.9;
        let calm = parallax_offset(&u).length();
        assert!(calm < loose);
    }
}
