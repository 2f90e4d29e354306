//! Keyframe sets and the progress driver for the morphing particle cloud.

use crate::constants::*;
use crate::error::{CoreError, Result};
use glam::{Vec2, Vec3};

/// K point clouds of identical length plus matching UVs.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyframeSet {
    positions: Vec<Vec<Vec3>>,
    uvs: Vec<Vec<Vec2>>,
}

impl KeyframeSet {
    pub fn new(positions: Vec<Vec<Vec3>>, uvs: Vec<Vec<Vec2>>) -> Result<Self> {
        if positions.len() < 2 {
            return Err(CoreError::TooFewKeyframes(positions.len()));
        }
        let expected = positions[0].len();
        for (index, frame) in positions.iter().enumerate() {
            if frame.len() != expected {
                return Err(CoreError::KeyframeLength {
                    index,
                    expected,
                    found: frame.len(),
                });
            }
        }
        if uvs.len() != positions.len() {
            return Err(CoreError::KeyframeUvLength {
                index: uvs.len().min(positions.len()),
                expected,
                found: 0,
            });
        }
        for (index, frame) in uvs.iter().enumerate() {
            if frame.len() != expected {
                return Err(CoreError::KeyframeUvLength {
                    index,
                    expected,
                    found: frame.len(),
                });
            }
        }
        Ok(Self { positions, uvs })
    }

    /// Number of keyframes, K.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.positions[0].len()
    }

    pub fn positions(&self, keyframe: usize) -> &[Vec3] {
        &self.positions[keyframe]
    }

    pub fn uvs(&self, keyframe: usize) -> &[Vec2] {
        &self.uvs[keyframe]
    }

    /// Copy with keyframe 0 appended at the end so a cyclic sequence can
    /// close without interpolating backwards through every shape.
    pub fn with_wraparound(&self) -> Self {
        let mut positions = self.positions.clone();
        let mut uvs = self.uvs.clone();
        positions.push(self.positions[0].clone());
        uvs.push(self.uvs[0].clone());
        Self { positions, uvs }
    }

    /// All keyframes back to back as `vec4` (w = 1), keyframe-major, for a
    /// storage buffer indexed `k * point_count + i`.
    pub fn packed_positions(&self) -> Vec<[f32; 4]> {
        self.positions
            .iter()
            .flat_map(|f| f.iter().map(|p| p.extend(1.0).to_array()))
            .collect()
    }

    pub fn packed_uvs(&self) -> Vec<[f32; 2]> {
        self.uvs
            .iter()
            .flat_map(|f| f.iter().map(|uv| uv.to_array()))
            .collect()
    }

    /// CPU evaluation of the shader's interpolation.
    pub fn sample(&self, progress: f32) -> Vec<Vec3> {
        let seg = segment(progress, self.len());
        let a = &self.positions[seg.from];
        let b = &self.positions[seg.to];
        a.iter().zip(b).map(|(p, q)| p.lerp(*q, seg.t)).collect()
    }
}

/// Adjacent keyframe pair and mix factor for a progress value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: usize,
    pub to: usize,
    pub t: f32,
}

#[inline]
pub fn scaled_progress(progress: f32, keyframes: usize) -> f32 {
    progress.clamp(0.0, 1.0) * keyframes.saturating_sub(1) as f32
}

/// Mirrors the generated shader: segment `floor(scaled)`, with the last
/// segment clamped so `progress == 1` lands exactly on keyframe K−1.
pub fn segment(progress: f32, keyframes: usize) -> Segment {
    let k = keyframes.max(2);
    let scaled = scaled_progress(progress, k);
    let from = (scaled.floor() as usize).min(k - 2);
    Segment {
        from,
        to: from + 1,
        t: (scaled - from as f32).clamp(0.0, 1.0),
    }
}

/// Where the morph target comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MorphMode {
    /// Each click hops to the next keyframe, wrapping at the end.
    #[default]
    ClickCycle,
    /// Target follows the page scroll fraction across all keyframes.
    ScrollFraction,
    /// Hops on an internal timer.
    Oscillator,
}

impl MorphMode {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "click" | "cycle" => Some(MorphMode::ClickCycle),
            "scroll" => Some(MorphMode::ScrollFraction),
            "oscillator" | "auto" => Some(MorphMode::Oscillator),
            _ => None,
        }
    }
}

/// Progress pursuit over an extended (wrap-around) keyframe sequence.
///
/// Progress is kept in keyframe units `[0, K]`, where index K is the
/// duplicate of keyframe 0.
#[derive(Clone, Debug)]
pub struct MorphDriver {
    mode: MorphMode,
    shapes: usize,
    progress: f32,
    target: f32,
    index: usize,
    wrapping: bool,
    speed: f32,
    clock: f32,
}

impl MorphDriver {
    /// `shapes` is K, the number of distinct keyframes (without duplicate).
    pub fn new(shapes: usize, mode: MorphMode, speed: f32) -> Self {
        Self {
            mode,
            shapes: shapes.max(2),
            progress: 0.0,
            target: 0.0,
            index: 0,
            wrapping: false,
            speed,
            clock: 0.0,
        }
    }

    pub fn mode(&self) -> MorphMode {
        self.mode
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Length of the uploaded sequence, K + 1.
    pub fn extended_len(&self) -> usize {
        self.shapes + 1
    }

    /// Hop to the next keyframe. From the last one, aim at the duplicate of
    /// keyframe 0 instead of travelling back through the sequence.
    pub fn advance(&mut self) {
        if self.wrapping {
            return;
        }
        if self.index + 1 >= self.shapes {
            self.target = self.shapes as f32;
            self.wrapping = true;
            self.index = 0;
        } else {
            self.index += 1;
            self.target = self.index as f32;
        }
    }

    /// Scroll-driven target; ignored in other modes.
    pub fn set_scroll_fraction(&mut self, fraction: f32) {
        if self.mode == MorphMode::ScrollFraction {
            self.target = fraction.clamp(0.0, 1.0) * (self.shapes - 1) as f32;
        }
    }

    pub fn tick(&mut self, dt_sec: f32) {
        if self.mode == MorphMode::Oscillator {
            self.clock += dt_sec;
            if self.clock >= MORPH_OSCILLATOR_PERIOD_SEC {
                self.clock -= MORPH_OSCILLATOR_PERIOD_SEC;
                self.advance();
            }
        }
        let k = (self.speed * dt_sec).clamp(0.0, 1.0);
        self.progress += (self.target - self.progress) * k;
        if self.wrapping && (self.target - self.progress).abs() < MORPH_SNAP_EPSILON {
            self.progress = 0.0;
            self.target = 0.0;
            self.wrapping = false;
        }
    }

    /// Normalised value for the shader's morph-progress uniform.
    pub fn uniform(&self) -> f32 {
        (self.progress / (self.extended_len() - 1) as f32).clamp(0.0, 1.0)
    }
}

/// Built-in target shapes, all with `n` points.
pub mod shapes {
    use super::*;
    use std::f32::consts::{PI, TAU};

    fn golden_sphere_dir(i: usize, n: usize) -> Vec3 {
        let y = 1.0 - 2.0 * (i as f32 + 0.5) / n as f32;
        let r = (1.0 - y * y).max(0.0).sqrt();
        let theta = i as f32 * GOLDEN_ANGLE;
        Vec3::new(theta.cos() * r, y, theta.sin() * r)
    }

    pub fn sphere(n: usize, radius: f32) -> (Vec<Vec3>, Vec<Vec2>) {
        (0..n)
            .map(|i| {
                let d = golden_sphere_dir(i, n);
                let uv = Vec2::new(d.z.atan2(d.x) / TAU + 0.5, d.y.acos() / PI);
                (d * radius, uv)
            })
            .unzip()
    }

    pub fn torus(n: usize, major: f32, minor: f32) -> (Vec<Vec3>, Vec<Vec2>) {
        (0..n)
            .map(|i| {
                let u = (i as f32 + 0.5) / n as f32;
                let v = (i as f32 * GOLDEN_ANGLE / TAU).fract();
                let a = u * TAU;
                let b = v * TAU;
                let p = Vec3::new(
                    (major + minor * b.cos()) * a.cos(),
                    minor * b.sin(),
                    (major + minor * b.cos()) * a.sin(),
                );
                (p, Vec2::new(u, v))
            })
            .unzip()
    }

    pub fn helix(n: usize, radius: f32, height: f32, turns: f32) -> (Vec<Vec3>, Vec<Vec2>) {
        (0..n)
            .map(|i| {
                let u = (i as f32 + 0.5) / n as f32;
                let strand = if i % 2 == 0 { 0.0 } else { PI };
                let a = u * turns * TAU + strand;
                let p = Vec3::new(a.cos() * radius, (u - 0.5) * height, a.sin() * radius);
                (p, Vec2::new(u, (i % 2) as f32))
            })
            .unzip()
    }

    pub fn galaxy(n: usize, radius: f32, arms: u32) -> (Vec<Vec3>, Vec<Vec2>) {
        let arms = arms.max(1);
        (0..n)
            .map(|i| {
                let u = (i as f32 + 0.5) / n as f32;
                let arm = (i as u32 % arms) as f32 / arms as f32;
                let r = u.sqrt() * radius;
                let a = arm * TAU + r * 0.6;
                let jitter = ((i as f32 * GOLDEN_ANGLE).sin()) * 0.15 * r.max(0.5);
                let p = Vec3::new(a.cos() * r + jitter, jitter * 0.4, a.sin() * r - jitter);
                (p, Vec2::new(u, arm))
            })
            .unzip()
    }

    pub fn grid(n: usize, extent: f32) -> (Vec<Vec3>, Vec<Vec2>) {
        let side = (n as f32).sqrt().ceil().max(1.0) as usize;
        (0..n)
            .map(|i| {
                let uv = Vec2::new(
                    (i % side) as f32 / (side.max(2) - 1) as f32,
                    (i / side) as f32 / (side.max(2) - 1) as f32,
                );
                let p = Vec3::new((uv.x - 0.5) * extent, (uv.y - 0.5) * extent, 0.0);
                (p, uv)
            })
            .unzip()
    }

    /// The default sequence used by the morph renderer.
    pub fn default_set(n: usize) -> Result<KeyframeSet> {
        let frames = [
            sphere(n, 4.0),
            torus(n, 3.5, 1.2),
            helix(n, 2.5, 8.0, 3.0),
            galaxy(n, 5.0, 3),
            grid(n, 9.0),
        ];
        let (positions, uvs) = frames.into_iter().unzip();
        KeyframeSet::new(positions, uvs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_lengths_are_rejected() {
        let a = vec![Vec3::ZERO; 4];
        let b = vec![Vec3::ZERO; 3];
        let uv = vec![Vec2::ZERO; 4];
        let err = KeyframeSet::new(vec![a, b], vec![uv.clone(), uv]).unwrap_err();
        assert_eq!(
            err,
            CoreError::KeyframeLength {
                index: 1,
                expected: 4,
                found: 3
            }
        );
        assert_eq!(
            KeyframeSet::new(vec![vec![Vec3::ZERO]], vec![vec![Vec2::ZERO]]).unwrap_err(),
            CoreError::TooFewKeyframes(1)
        );
    }

    #[test]
    fn default_shapes_share_point_count() {
        let set = shapes::default_set(500).unwrap();
        assert_eq!(set.len(), 5);
        assert_eq!(set.point_count(), 500);
        let ext = set.with_wraparound();
        assert_eq!(ext.len(), 6);
        assert_eq!(ext.positions(5), set.positions(0));
        assert_eq!(ext.packed_positions().len(), 6 * 500);
    }

    #[test]
    fn scroll_mode_targets_fraction() {
        let mut d = MorphDriver::new(5, MorphMode::ScrollFraction, MORPH_SPEED);
        d.set_scroll_fraction(0.5);
        assert_eq!(d.target(), 2.0);
        d.advance();
        d.set_scroll_fraction(1.0);
        assert_eq!(d.target(), 4.0);
    }
}
