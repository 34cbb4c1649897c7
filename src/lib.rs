#![cfg(target_arch = "wasm32")]
use ripple_core::{BindingValue, GlobalDefaults};
use wasm_bindgen::prelude::*;
use web_sys as web;

mod dom;
mod host;
mod registry;
mod style;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("ripplify ready");
    Ok(())
}

fn decode_binding(value: &JsValue) -> BindingValue {
    dom::decode(value, BindingValue::from_json).unwrap_or_else(|e| {
        log::warn!("[binding] {:#}; using defaults", e);
        BindingValue::default()
    })
}

/// Host element entered the tree.
#[wasm_bindgen]
pub fn attach(el: web::HtmlElement, binding: JsValue) {
    let binding = decode_binding(&binding);
    let shared = registry::lookup_or_insert(&el);
    let Ok(mut b) = shared.try_borrow_mut() else {
        log::warn!("[binding] attach ignored: binding busy");
        return;
    };
    b.attach(&binding, &registry::global_defaults());
}

/// Reconfiguration pass with the new and previous binding values.
#[wasm_bindgen]
pub fn update(el: web::HtmlElement, binding: JsValue, old_binding: JsValue) {
    let (binding, old_binding) = (decode_binding(&binding), decode_binding(&old_binding));
    let shared = registry::lookup_or_insert(&el);
    let Ok(mut b) = shared.try_borrow_mut() else {
        log::warn!("[binding] update ignored: binding busy");
        return;
    };
    b.update(&binding, &old_binding, &registry::global_defaults());
}

/// Remove activation listeners. An in-flight ripple still runs to completion.
#[wasm_bindgen]
pub fn detach(el: web::HtmlElement) {
    let Some(shared) = registry::lookup(&el) else {
        return;
    };
    let (handle, releasable) = {
        let Ok(mut b) = shared.try_borrow_mut() else {
            log::warn!("[binding] detach ignored: binding busy");
            return;
        };
        b.detach();
        let releasable = b.is_releasable();
        (b.handle, releasable)
    };
    drop(shared);
    if releasable {
        registry::forget(handle);
    }
}

/// Replace the component-level defaults used by subsequent attaches.
#[wasm_bindgen(js_name = setDefaults)]
pub fn set_defaults(defaults: JsValue) {
    match dom::decode(&defaults, GlobalDefaults::from_json) {
        Ok(defaults) => registry::set_global_defaults(defaults),
        Err(e) => log::warn!("[binding] defaults ignored: {:#}", e),
    }
}

#[wasm_bindgen(js_name = isAttached)]
pub fn is_attached(el: web::HtmlElement) -> bool {
    let Some(shared) = registry::lookup(&el) else {
        return false;
    };
    let attached = shared
        .try_borrow()
        .map(|b| b.ripplify.is_attached())
        .unwrap_or(false);
    attached
}
