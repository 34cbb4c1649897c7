// Side table from host elements to their bindings, plus the global defaults.
// Each bound element carries a numeric handle in an expando property.

use crate::host::{Binding, SharedBinding};
use fnv::FnvHashMap;
use ripple_core::GlobalDefaults;
use std::cell::{Cell, RefCell};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

const HANDLE_PROPERTY: &str = "__ripplifyHandle";

thread_local! {
    static BINDINGS: RefCell<FnvHashMap<u32, SharedBinding>> = RefCell::new(FnvHashMap::default());
    static DEFAULTS: RefCell<GlobalDefaults> = RefCell::new(GlobalDefaults::default());
    static NEXT_HANDLE: Cell<u32> = const { Cell::new(1) };
}

fn handle_of(el: &web::HtmlElement) -> Option<u32> {
    js_sys::Reflect::get(el, &JsValue::from_str(HANDLE_PROPERTY))
        .ok()?
        .as_f64()
        .map(|h| h as u32)
}

pub fn lookup(el: &web::HtmlElement) -> Option<SharedBinding> {
    let handle = handle_of(el)?;
    BINDINGS.with(|b| b.borrow().get(&handle).cloned())
}

pub fn lookup_or_insert(el: &web::HtmlElement) -> SharedBinding {
    if let Some(existing) = lookup(el) {
        return existing;
    }
    let handle = NEXT_HANDLE.with(|n| {
        let h = n.get();
        n.set(h.wrapping_add(1));
        h
    });
    if let Err(e) = js_sys::Reflect::set(
        el,
        &JsValue::from_str(HANDLE_PROPERTY),
        &JsValue::from(handle),
    ) {
        log::warn!("[binding] could not tag element: {:?}", e);
    }
    let binding = Binding::new_shared(el.clone(), handle);
    BINDINGS.with(|b| b.borrow_mut().insert(handle, binding.clone()));
    log::debug!("[binding] element #{} registered", handle);
    binding
}

/// Drop the binding for `handle`, removing whatever it still has installed.
pub fn forget(handle: u32) {
    let removed = BINDINGS.with(|b| b.borrow_mut().remove(&handle));
    if removed.is_some() {
        log::debug!("[binding] element #{} released", handle);
    }
}

/// Release `handle` from a fresh task, once no callback of it is running.
pub fn release_later(handle: u32) {
    let Some(window) = web::window() else {
        return;
    };
    let callback = Closure::once_into_js(move || release_if_idle(handle));
    if window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0)
        .is_err()
    {
        log::warn!("[binding] deferred release of #{} not scheduled", handle);
    }
}

fn release_if_idle(handle: u32) {
    let Some(binding) = BINDINGS.with(|b| b.borrow().get(&handle).cloned()) else {
        return;
    };
    let releasable = binding
        .try_borrow()
        .map(|b| b.release_when_idle && b.is_releasable())
        .unwrap_or(false);
    drop(binding);
    if releasable {
        forget(handle);
    }
}

pub fn global_defaults() -> GlobalDefaults {
    DEFAULTS.with(|d| d.borrow().clone())
}

pub fn set_global_defaults(defaults: GlobalDefaults) {
    DEFAULTS.with(|d| *d.borrow_mut() = defaults);
}
