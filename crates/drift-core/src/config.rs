//! Presentation parameters a host may override at startup.

use crate::constants::*;
use crate::cursor::SpringParams;
use crate::morph::MorphMode;
use crate::particles::ParticleParams;
use crate::velocity::BrushParams;

/// Smallest and largest particle counts accepted from overrides.
pub const PARTICLE_COUNT_RANGE: (usize, usize) = (64, 20_000);

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub particles: ParticleParams,
    pub spring: SpringParams,
    pub brush: BrushParams,
    pub world_half_height: f32,
    pub point_size: f32,
    pub morph_mode: MorphMode,
    pub morph_speed: f32,
    pub morph_particles: usize,
    pub noise_size: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            particles: ParticleParams::default(),
            spring: SpringParams::default(),
            brush: BrushParams::default(),
            world_half_height: CURSOR_WORLD_HALF_HEIGHT,
            point_size: 3.0,
            morph_mode: MorphMode::default(),
            morph_speed: MORPH_SPEED,
            morph_particles: MORPH_PARTICLE_COUNT,
            noise_size: BLUE_NOISE_SIZE,
        }
    }
}

impl SceneConfig {
    /// Apply string overrides from the host (DOM `data-*` attributes or
    /// environment variables). Values that do not parse are logged and
    /// ignored.
    pub fn with_overrides(
        mut self,
        particles: Option<&str>,
        seed: Option<&str>,
        morph: Option<&str>,
    ) -> Self {
        if let Some(raw) = particles {
            match raw.trim().parse::<usize>() {
                Ok(n) => {
                    let (lo, hi) = PARTICLE_COUNT_RANGE;
                    self.particles.count = n.clamp(lo, hi);
                    self.particles.max_connections =
                        MAX_CONNECTIONS * self.particles.count / PARTICLE_COUNT;
                }
                Err(_) => log::warn!("[config] ignoring particle count {raw:?}"),
            }
        }
        if let Some(raw) = seed {
            match raw.trim().parse::<u64>() {
                Ok(s) => self.particles.seed = s,
                Err(_) => log::warn!("[config] ignoring seed {raw:?}"),
            }
        }
        if let Some(raw) = morph {
            match MorphMode::from_key(raw.trim()) {
                Some(mode) => self.morph_mode = mode,
                None => log::warn!("[config] unknown morph mode {raw:?}"),
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_parse_and_clamp() {
        let c = SceneConfig::default().with_overrides(Some("900"), Some("7"), Some("scroll"));
        assert_eq!(c.particles.count, 900);
        assert_eq!(c.particles.max_connections, MAX_CONNECTIONS / 2);
        assert_eq!(c.particles.seed, 7);
        assert_eq!(c.morph_mode, MorphMode::ScrollFraction);

        let c = SceneConfig::default().with_overrides(Some("5"), None, None);
        assert_eq!(c.particles.count, PARTICLE_COUNT_RANGE.0);
    }

    #[test]
    fn bad_overrides_are_ignored() {
        let c = SceneConfig::default().with_overrides(Some("lots"), Some("-1"), Some("spin"));
        assert_eq!(c, SceneConfig::default());
    }
}
