//! Pure helpers for the web front-end. No DOM types here so the host test
//! suite can pull this file in directly.

use drift_core::ScrollSample;
use glam::Vec2;

/// Canvas backing-store size for a CSS box at `dpr`, never zero.
#[inline]
pub fn backing_size(css_width: f64, css_height: f64, dpr: f64) -> (u32, u32) {
    let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    let px = |css: f64| -> u32 {
        if css.is_finite() && css > 0.0 {
            ((css * dpr) as u32).max(1)
        } else {
            1
        }
    };
    (px(css_width), px(css_height))
}

/// Raw layout numbers read from the page; any of them may be missing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportMetrics {
    pub scroll_y: Option<f64>,
    pub document_height: Option<f64>,
    pub viewport_height: Option<f64>,
}

#[inline]
fn finite_or_zero(v: Option<f64>) -> f32 {
    match v {
        Some(v) if v.is_finite() => v as f32,
        _ => 0.0,
    }
}

impl ViewportMetrics {
    /// Convert to a scroll sample; missing or non-finite values read as 0,
    /// which the controller treats as an unscrollable page.
    pub fn sample(&self, time_ms: f64) -> ScrollSample {
        ScrollSample {
            scroll_y: finite_or_zero(self.scroll_y),
            document_height: finite_or_zero(self.document_height),
            viewport_height: finite_or_zero(self.viewport_height),
            time_ms: if time_ms.is_finite() { time_ms } else { 0.0 },
        }
    }
}

/// Pointer position relative to the viewport, with the viewport size the
/// cursor controller maps it through.
#[inline]
pub fn pointer_px(client_x: f64, client_y: f64, inner_width: f64, inner_height: f64) -> (Vec2, Vec2) {
    let vp = Vec2::new(finite_or_zero(Some(inner_width)), finite_or_zero(Some(inner_height)));
    let px = Vec2::new(finite_or_zero(Some(client_x)), finite_or_zero(Some(client_y)));
    (px, vp)
}

/// What the loop does after a failed surface acquire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceAction {
    Reconfigure,
    Stop,
    SkipFrame,
}

pub fn surface_action(err: &wgpu::SurfaceError) -> SurfaceAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceAction::Reconfigure,
        wgpu::SurfaceError::OutOfMemory => SurfaceAction::Stop,
        _ => SurfaceAction::SkipFrame,
    }
}

/// `data-*` override name on the canvas for a scene setting.
#[inline]
pub fn data_attribute(setting: &str) -> String {
    format!("data-{setting}")
}
