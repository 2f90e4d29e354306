#![cfg(target_arch = "wasm32")]
use drift_core::{FrameScheduler, LoopHandle, SceneConfig, SectionTable, StateField};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

mod dom;
mod events;
mod frame;
mod input;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("drift-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let (window, document) =
        dom::window_document().ok_or_else(|| anyhow::anyhow!("no window/document"))?;
    let canvas = dom::canvas(&document, dom::CANVAS_ID)?;
    let (w, h) = dom::sync_canvas_backing_size(&canvas);
    log::info!("[init] canvas {w}x{h}");

    let config = SceneConfig::default().with_overrides(
        dom::data_attr(&canvas, "particles").as_deref(),
        dom::data_attr(&canvas, "seed").as_deref(),
        dom::data_attr(&canvas, "morph").as_deref(),
    );
    let caps = dom::capabilities(&window);
    let gates = caps.gates();
    log::info!(
        "[init] reduced_motion={} coarse_pointer={} -> cursor_field={} animate={}",
        caps.reduced_motion,
        caps.coarse_pointer,
        gates.cursor_field,
        gates.animate
    );

    let sections = SectionTable::default();
    let shared = Rc::new(RefCell::new(frame::Shared::new(
        &config,
        sections.clone(),
        gates,
    )));

    // Expose the active section to page CSS.
    if let Some(root) = document.document_element() {
        shared.borrow_mut().store.subscribe(move |field, state| {
            if field == StateField::Section {
                let _ = root.set_attribute(
                    &input::data_attribute("section"),
                    state.current_section.key(),
                );
            }
        });
    }

    // Seed the store from the initial scroll position.
    {
        let sample = dom::viewport_metrics(&window, &document).sample(dom::now_ms(&window));
        let mut sh = shared.borrow_mut();
        let frame::Shared { scroll, store, .. } = &mut *sh;
        scroll.on_scroll(sample, store);
    }

    let gpu: frame::GpuSlot = Rc::new(RefCell::new(None));
    let main_loop = LoopHandle::default();
    let scheduler = Rc::new(RefCell::new(FrameScheduler::new()));
    let tasks =
        frame::install_tasks(&mut scheduler.borrow_mut(), &shared, &gpu, main_loop.clone());
    if !gates.cursor_field {
        tasks.cursor.cancel();
    }
    events::wire(&window, &document, &canvas, &shared, &gpu, &main_loop);
    frame::start_loop(scheduler, gpu.clone(), main_loop);

    // The loop runs (and skips rendering) until the device is ready.
    if let Some(mut g) = frame::init_gpu(&canvas, &config, sections).await {
        // The canvas may have been resized while the device was pending.
        g.resize(canvas.width(), canvas.height());
        *gpu.borrow_mut() = Some(g);
        log::info!("[init] renderer attached");
    } else {
        // No device: drop the render task, keep the controllers publishing.
        tasks.render.cancel();
        log::warn!("[init] render task removed; page stays static");
    }
    Ok(())
}
