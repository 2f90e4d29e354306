use crate::dom;
use crate::frame::{GpuSlot, Shared};
use crate::input;
use drift_core::{LoopHandle, MorphMode};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// Wire viewport signals into the controllers. Handlers only touch the
/// shared state; the frame tasks pick the results up on the next tick.
pub fn wire(
    window: &web::Window,
    document: &web::Document,
    canvas: &web::HtmlCanvasElement,
    shared: &Rc<RefCell<Shared>>,
    gpu: &GpuSlot,
    main_loop: &LoopHandle,
) {
    let win: &web::EventTarget = window.as_ref();

    {
        let s = shared.clone();
        let w = window.clone();
        let d = document.clone();
        dom::listen::<web::Event>(win, "scroll", true, move |_| {
            let sample = dom::viewport_metrics(&w, &d).sample(dom::now_ms(&w));
            let mut sh = s.borrow_mut();
            let Shared { scroll, store, .. } = &mut *sh;
            scroll.on_scroll(sample, store);
        });
    }

    if shared.borrow().gates.cursor_field {
        let s = shared.clone();
        let w = window.clone();
        dom::listen::<web::PointerEvent>(win, "pointermove", true, move |ev| {
            let inner_w = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let inner_h = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let (px, vp) =
                input::pointer_px(ev.client_x() as f64, ev.client_y() as f64, inner_w, inner_h);
            let mut sh = s.borrow_mut();
            sh.cursor.on_pointer_move(px, vp);
            if let Some(uv) = drift_core::pixel_to_uv(px, vp) {
                sh.pointer_uv = Some(uv);
            }
        });
    } else {
        log::info!("[events] cursor field disabled; pointer ignored");
    }

    {
        let g = gpu.clone();
        dom::listen::<web::MouseEvent>(win, "click", true, move |_| {
            if let Some(gpu) = g.borrow_mut().as_mut() {
                let morph = gpu.morph_mut();
                if morph.mode() == MorphMode::ClickCycle {
                    morph.advance();
                }
            }
        });
    }

    {
        let g = gpu.clone();
        let s = shared.clone();
        let w = window.clone();
        let d = document.clone();
        let c = canvas.clone();
        dom::listen::<web::Event>(win, "resize", true, move |_| {
            let (px_w, px_h) = dom::sync_canvas_backing_size(&c);
            // Resize before the next paint so field targets match the canvas.
            if let Some(gpu) = g.borrow_mut().as_mut() {
                gpu.resize(px_w, px_h);
            }
            let sample = dom::viewport_metrics(&w, &d).sample(dom::now_ms(&w));
            let mut sh = s.borrow_mut();
            let Shared { scroll, store, .. } = &mut *sh;
            scroll.on_scroll(sample, store);
        });
    }

    {
        let s = shared.clone();
        let d = document.clone();
        dom::listen::<web::Event>(document.as_ref(), "visibilitychange", true, move |_| {
            s.borrow_mut().scroll.set_visible(!d.hidden());
        });
    }

    {
        let handle = main_loop.clone();
        dom::listen::<web::Event>(win, "pagehide", true, move |_| {
            log::info!("[events] page hidden for good; tearing down");
            handle.cancel();
        });
    }
}
