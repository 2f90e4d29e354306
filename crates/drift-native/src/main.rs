use std::time::Instant;
use winit::{
    dpi::PhysicalSize,
    event::*,
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

use drift_core::{
    pixel_to_uv, AnimationStore, CursorField, MorphMode, PointerVelocity, SceneConfig,
    ScrollController, ScrollSample, SectionTable, MAX_FRAME_DT_SEC,
};
use drift_gpu::{FrameInputs, GpuState};
use glam::Vec2;

/// Virtual document height, in viewport heights, scrolled by the mouse wheel.
const DOCUMENT_VIEWPORTS: f32 = 6.0;
const LINE_PX: f32 = 48.0;

/// Stand-in for a browser page: a scroll offset over a fixed-length document.
struct VirtualPage {
    scroll_y: f32,
    viewport_height: f32,
}

impl VirtualPage {
    fn document_height(&self) -> f32 {
        self.viewport_height * DOCUMENT_VIEWPORTS
    }

    fn scroll_by(&mut self, dy: f32) {
        let max = (self.document_height() - self.viewport_height).max(0.0);
        self.scroll_y = (self.scroll_y + dy).clamp(0.0, max);
    }

    fn sample(&self, time_ms: f64) -> ScrollSample {
        ScrollSample {
            scroll_y: self.scroll_y,
            document_height: self.document_height(),
            viewport_height: self.viewport_height,
            time_ms,
        }
    }
}

fn wheel_pixels(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * LINE_PX,
        MouseScrollDelta::PixelDelta(p) => -p.y as f32,
    }
}

fn viewport(size: PhysicalSize<u32>) -> Vec2 {
    Vec2::new(size.width as f32, size.height as f32)
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = SceneConfig::default().with_overrides(
        std::env::var("DRIFT_PARTICLES").ok().as_deref(),
        std::env::var("DRIFT_SEED").ok().as_deref(),
        std::env::var("DRIFT_MORPH").ok().as_deref(),
    );
    let sections = SectionTable::default();

    let event_loop = EventLoop::new()?;
    let window: Window = WindowBuilder::new()
        .with_title("driftfield (native)")
        .with_inner_size(PhysicalSize::new(1280u32, 800u32))
        .build(&event_loop)?;
    let window = &window;

    let size = window.inner_size();
    let mut gpu = pollster::block_on(GpuState::new(
        window,
        size.width,
        size.height,
        &config,
        sections.clone(),
    ))?;

    let mut store = AnimationStore::new();
    let mut scroll = ScrollController::new(sections);
    let mut cursor = CursorField::new(config.spring, config.world_half_height);
    let mut pointer = PointerVelocity::default();
    let mut pointer_uv: Option<Vec2> = None;
    let mut page = VirtualPage {
        scroll_y: 0.0,
        viewport_height: size.height as f32,
    };
    let start = Instant::now();
    let mut last = start;
    let now_ms = move || start.elapsed().as_secs_f64() * 1000.0;
    scroll.on_scroll(page.sample(now_ms()), &mut store);

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(size) => {
                gpu.resize(size.width, size.height);
                page.viewport_height = size.height as f32;
                page.scroll_by(0.0);
                scroll.on_scroll(page.sample(now_ms()), &mut store);
            }
            WindowEvent::Occluded(hidden) => scroll.set_visible(!hidden),
            WindowEvent::MouseWheel { delta, .. } => {
                page.scroll_by(wheel_pixels(delta));
                scroll.on_scroll(page.sample(now_ms()), &mut store);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let px = Vec2::new(position.x as f32, position.y as f32);
                let vp = viewport(window.inner_size());
                cursor.on_pointer_move(px, vp);
                if let Some(uv) = pixel_to_uv(px, vp) {
                    pointer_uv = Some(uv);
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                let morph = gpu.morph_mut();
                if morph.mode() == MorphMode::ClickCycle {
                    morph.advance();
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            let now = Instant::now();
            let dt = (now - last).as_secs_f64().min(MAX_FRAME_DT_SEC) as f32;
            last = now;

            // Controllers first, then the renderer reads the mirror.
            cursor.tick(&mut store);
            scroll.decay_tick(&mut store);

            let inputs = FrameInputs {
                uniforms: *store.uniforms(),
                time_sec: start.elapsed().as_secs_f32(),
                dt_sec: dt,
                pointer_velocity: pointer_uv.map_or(Vec2::ZERO, |uv| pointer.sample(uv)),
            };
            match gpu.render(&inputs) {
                Ok(handle) => {
                    store.publish_velocity_field(handle);
                    window.request_redraw();
                }
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("[gpu] out of memory; exiting");
                    elwt.exit();
                }
                Err(e) => log::warn!("[gpu] frame dropped: {:?}", e),
            }
        }
        _ => {}
    })?;
    Ok(())
}
