//! Static capability gates, evaluated once at startup.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// `prefers-reduced-motion: reduce`
    pub reduced_motion: bool,
    /// `pointer: coarse` (touch-first device)
    pub coarse_pointer: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gates {
    pub cursor_field: bool,
    pub animate: bool,
}

impl Capabilities {
    pub fn gates(self) -> Gates {
        Gates {
            cursor_field: !self.coarse_pointer && !self.reduced_motion,
            animate: !self.reduced_motion,
        }
    }
}

impl Gates {
    /// Shader time; frozen at 0 when animation is off so the scene renders
    /// as a still frame.
    #[inline]
    pub fn shader_time(self, now_sec: f64) -> f32 {
        if self.animate {
            now_sec as f32
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_disables_cursor_only() {
        let g = Capabilities {
            coarse_pointer: true,
            ..Default::default()
        }
        .gates();
        assert!(!g.cursor_field);
        assert!(g.animate);
    }

    #[test]
    fn reduced_motion_freezes_time() {
        let g = Capabilities {
            reduced_motion: true,
            ..Default::default()
        }
        .gates();
        assert!(!g.cursor_field);
        assert_eq!(g.shader_time(12.5), 0.0);
        assert_eq!(Capabilities::default().gates().shader_time(12.5), 12.5);
    }
}
