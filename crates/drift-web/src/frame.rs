use crate::input::{self, SurfaceAction};
use drift_core::{
    AnimationStore, CursorField, FrameScheduler, Gates, LoopHandle, Phase, PointerVelocity,
    SceneConfig, ScrollController, SectionTable, TaskStatus,
};
use glam::Vec2;
use drift_gpu::{FrameInputs, GpuState};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Everything the event handlers and frame tasks share on the main thread.
pub struct Shared {
    pub store: AnimationStore,
    pub scroll: ScrollController,
    pub cursor: CursorField,
    /// Last raw pointer position in uv; the brush velocity follows this,
    /// not the spring-smoothed cursor.
    pub pointer_uv: Option<Vec2>,
    pub gates: Gates,
}

impl Shared {
    pub fn new(config: &SceneConfig, sections: SectionTable, gates: Gates) -> Self {
        let cursor = if gates.cursor_field {
            CursorField::new(config.spring, config.world_half_height)
        } else {
            CursorField::disabled()
        };
        Self {
            store: AnimationStore::new(),
            scroll: ScrollController::new(sections),
            cursor,
            pointer_uv: None,
            gates,
        }
    }
}

pub type GpuSlot = Rc<RefCell<Option<GpuState<'static>>>>;

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    config: &SceneConfig,
    sections: SectionTable,
) -> Option<GpuState<'static>> {
    let (w, h) = (canvas.width(), canvas.height());
    match GpuState::new(wgpu::SurfaceTarget::Canvas(canvas.clone()), w, h, config, sections).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("[gpu] WebGPU init error: {:?}", e);
            None
        }
    }
}

/// Handles to the tasks a host may need to drop on its own. Scroll decay
/// lives as long as the loop.
pub struct FrameTasks {
    pub cursor: LoopHandle,
    pub render: LoopHandle,
}

/// Register the per-frame controller and renderer tasks.
pub fn install_tasks(
    scheduler: &mut FrameScheduler,
    shared: &Rc<RefCell<Shared>>,
    gpu: &GpuSlot,
    main_loop: LoopHandle,
) -> FrameTasks {
    let s = shared.clone();
    let cursor = scheduler.add("cursor", Phase::Controllers, move |_| {
        let mut sh = s.borrow_mut();
        let Shared { cursor, store, .. } = &mut *sh;
        cursor.tick(store);
        TaskStatus::Ran
    });

    let s = shared.clone();
    scheduler.add("scroll-decay", Phase::Controllers, move |_| {
        let mut sh = s.borrow_mut();
        let Shared { scroll, store, .. } = &mut *sh;
        scroll.decay_tick(store);
        TaskStatus::Ran
    });

    let s = shared.clone();
    let g = gpu.clone();
    let mut pointer = PointerVelocity::default();
    let render = scheduler.add("render", Phase::Renderers, move |t| {
        let mut slot = g.borrow_mut();
        let Some(gpu) = slot.as_mut() else {
            return TaskStatus::Skipped;
        };
        let mut sh = s.borrow_mut();
        let inputs = FrameInputs {
            uniforms: *sh.store.uniforms(),
            time_sec: sh.gates.shader_time(t.now_sec),
            dt_sec: if sh.gates.animate { t.dt_sec } else { 0.0 },
            pointer_velocity: sh.pointer_uv.map_or(Vec2::ZERO, |uv| pointer.sample(uv)),
        };
        match gpu.render(&inputs) {
            Ok(handle) => sh.store.publish_velocity_field(handle),
            Err(e) => match input::surface_action(&e) {
                SurfaceAction::Reconfigure => {
                    log::warn!("[gpu] surface {:?}; reconfiguring", e);
                    gpu.reconfigure();
                }
                SurfaceAction::Stop => {
                    log::error!("[gpu] surface {:?}; stopping", e);
                    main_loop.cancel();
                }
                SurfaceAction::SkipFrame => {
                    log::warn!("[gpu] surface {:?}; frame dropped", e);
                    return TaskStatus::Skipped;
                }
            },
        }
        TaskStatus::Ran
    });

    FrameTasks { cursor, render }
}

/// Drive the scheduler from requestAnimationFrame until `main_loop` is
/// cancelled.
pub fn start_loop(scheduler: Rc<RefCell<FrameScheduler>>, gpu: GpuSlot, main_loop: LoopHandle) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp_ms: f64| {
        if main_loop.is_cancelled() {
            scheduler.borrow_mut().cancel_all();
            gpu.borrow_mut().take();
            log::info!("[frame] loop stopped");
            return;
        }
        scheduler.borrow_mut().run_frame(timestamp_ms / 1000.0);
        request_frame(&tick_clone);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
