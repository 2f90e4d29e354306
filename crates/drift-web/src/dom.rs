use crate::input::{self, ViewportMetrics};
use drift_core::Capabilities;
use wasm_bindgen::JsCast;
use web_sys as web;

pub const CANVAS_ID: &str = "drift-canvas";

#[inline]
pub fn window_document() -> Option<(web::Window, web::Document)> {
    let window = web::window()?;
    let document = window.document()?;
    Some((window, document))
}

pub fn canvas(document: &web::Document, id: &str) -> anyhow::Result<web::HtmlCanvasElement> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("missing #{id}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))
}

/// Match the canvas backing store to its CSS size times devicePixelRatio.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> (u32, u32) {
    let dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    let rect = canvas.get_bounding_client_rect();
    let (w, h) = input::backing_size(rect.width(), rect.height(), dpr);
    canvas.set_width(w);
    canvas.set_height(h);
    (w, h)
}

#[inline]
pub fn data_attr(el: &web::Element, setting: &str) -> Option<String> {
    el.get_attribute(&input::data_attribute(setting))
}

#[inline]
pub fn media_matches(window: &web::Window, query: &str) -> bool {
    matches!(window.match_media(query), Ok(Some(mql)) if mql.matches())
}

pub fn capabilities(window: &web::Window) -> Capabilities {
    Capabilities {
        reduced_motion: media_matches(window, "(prefers-reduced-motion: reduce)"),
        coarse_pointer: media_matches(window, "(pointer: coarse)"),
    }
}

pub fn viewport_metrics(window: &web::Window, document: &web::Document) -> ViewportMetrics {
    ViewportMetrics {
        scroll_y: window.scroll_y().ok(),
        document_height: document
            .document_element()
            .map(|el| el.scroll_height() as f64),
        viewport_height: window.inner_height().ok().and_then(|v| v.as_f64()),
    }
}

#[inline]
pub fn now_ms(window: &web::Window) -> f64 {
    window.performance().map(|p| p.now()).unwrap_or(0.0)
}

/// Register `handler` for `event` on `target` and leak the closure for the
/// page lifetime.
pub fn listen<E: JsCast + 'static>(
    target: &web::EventTarget,
    event: &str,
    passive: bool,
    mut handler: impl FnMut(E) + 'static,
) {
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::Event| {
        if let Ok(ev) = ev.dyn_into::<E>() {
            handler(ev);
        }
    }) as Box<dyn FnMut(web::Event)>);
    let opts = web::AddEventListenerOptions::new();
    opts.set_passive(passive);
    if let Err(e) = target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        closure.as_ref().unchecked_ref(),
        &opts,
    ) {
        log::warn!("[dom] could not listen for {event}: {:?}", e);
    }
    closure.forget();
}
