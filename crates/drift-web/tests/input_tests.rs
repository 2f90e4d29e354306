// Host-side tests for the pure web input helpers.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
#[path = "../src/input.rs"]
mod input;

use input::*;

#[test]
fn backing_size_scales_by_device_pixel_ratio() {
    assert_eq!(backing_size(800.0, 600.0, 2.0), (1600, 1200));
    assert_eq!(backing_size(333.5, 100.0, 1.5), (500, 150));
}

#[test]
fn backing_size_is_never_zero() {
    assert_eq!(backing_size(0.0, 0.0, 2.0), (1, 1));
    assert_eq!(backing_size(f64::NAN, 10.0, 1.0), (1, 10));
    // Bad dpr falls back to 1.
    assert_eq!(backing_size(640.0, 480.0, 0.0), (640, 480));
}

#[test]
fn missing_metrics_give_an_unscrollable_sample() {
    let m = ViewportMetrics {
        scroll_y: None,
        document_height: Some(f64::INFINITY),
        viewport_height: Some(900.0),
    };
    let s = m.sample(f64::NAN);
    assert_eq!(s.scroll_y, 0.0);
    assert_eq!(s.document_height, 0.0);
    assert_eq!(s.viewport_height, 900.0);
    assert_eq!(s.time_ms, 0.0);
    assert_eq!(
        drift_core::scroll_fraction(s.scroll_y, s.document_height, s.viewport_height),
        0.0
    );
}

#[test]
fn pointer_maps_to_world_through_the_viewport() {
    let (px, vp) = pointer_px(960.0, 540.0, 1920.0, 1080.0);
    let world = drift_core::pixel_to_world(px, vp, 8.0);
    assert!(world.length() < 1e-5);

    let (px, vp) = pointer_px(0.0, 0.0, 1920.0, 1080.0);
    let world = drift_core::pixel_to_world(px, vp, 8.0);
    assert!(world.x < 0.0 && world.y > 0.0);
}

#[test]
fn surface_errors_map_to_loop_actions() {
    assert_eq!(
        surface_action(&wgpu::SurfaceError::Lost),
        SurfaceAction::Reconfigure
    );
    assert_eq!(
        surface_action(&wgpu::SurfaceError::Outdated),
        SurfaceAction::Reconfigure
    );
    assert_eq!(
        surface_action(&wgpu::SurfaceError::OutOfMemory),
        SurfaceAction::Stop
    );
    assert_eq!(
        surface_action(&wgpu::SurfaceError::Timeout),
        SurfaceAction::SkipFrame
    );
}

#[test]
fn overrides_use_data_attributes() {
    assert_eq!(data_attribute("particles"), "data-particles");
}
