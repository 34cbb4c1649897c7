use crate::dom;
use crate::registry;
use crate::style;
use fnv::FnvHashMap;
use glam::DVec2;
use ripple_core::constants::{CONTAINER_CLASS, FULL_SCALE_CLASS, RIPPLE_CLASS};
use ripple_core::{
    BindingValue, CornerRadii, GlobalDefaults, HostBox, RippleHost, RippleId, RipplePhase,
    Ripplify, Scheduler, SurfaceStyle, Task,
};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type EventClosure = Closure<dyn FnMut(web::Event)>;
type TickClosure = Closure<dyn FnMut()>;

/// One bound element: its lifecycle state plus the DOM host it drives.
pub struct Binding {
    pub handle: u32,
    pub ripplify: Ripplify<DomHost>,
    pub host: DomHost,
    /// Detached while a ripple was still in flight; drop once it finishes.
    pub release_when_idle: bool,
}

pub type SharedBinding = Rc<RefCell<Binding>>;

impl Binding {
    pub fn new_shared(el: web::HtmlElement, handle: u32) -> SharedBinding {
        Rc::new_cyclic(|weak| {
            RefCell::new(Binding {
                handle,
                ripplify: Ripplify::new(),
                host: DomHost::new(el, weak.clone()),
                release_when_idle: false,
            })
        })
    }

    pub fn attach(&mut self, value: &BindingValue, globals: &GlobalDefaults) {
        self.release_when_idle = false;
        self.ripplify.attach(&mut self.host, value, globals);
    }

    pub fn update(&mut self, value: &BindingValue, old: &BindingValue, globals: &GlobalDefaults) {
        self.release_when_idle = false;
        self.ripplify.update(&mut self.host, value, old, globals);
    }

    pub fn detach(&mut self) {
        self.ripplify.detach(&mut self.host);
        self.release_when_idle = true;
    }

    /// Nothing installed and nothing in flight.
    pub fn is_releasable(&self) -> bool {
        !self.ripplify.is_attached() && self.ripplify.phase() == RipplePhase::Idle
    }
}

/// Run `f` against the binding behind `weak` if it is still alive.
///
/// Every DOM callback enters the state machine through here. Closures retired
/// by earlier callbacks are freed first; the closure currently running is
/// never among them.
fn dispatch(weak: &Weak<RefCell<Binding>>, f: impl FnOnce(&mut Ripplify<DomHost>, &mut DomHost)) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let Ok(mut binding) = shared.try_borrow_mut() else {
        log::warn!("[dom] re-entrant ripple callback ignored");
        return;
    };
    let Binding { ripplify, host, .. } = &mut *binding;
    host.drain_retired();
    f(ripplify, host);

    let release = binding.release_when_idle && binding.is_releasable();
    let handle = binding.handle;
    drop(binding);
    if release {
        registry::release_later(handle);
    }
}

pub struct DomSurface {
    container: web::HtmlElement,
    ripple: web::HtmlElement,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerKey(u32);

struct PendingTimer {
    handle: i32,
    closure: TickClosure,
}

struct PendingFrame {
    ripple: RippleId,
    handle: i32,
    closure: TickClosure,
}

pub struct DomHost {
    el: web::HtmlElement,
    binding: Weak<RefCell<Binding>>,
    next_key: u32,
    activation: FnvHashMap<String, EventClosure>,
    deactivation: FnvHashMap<RippleId, SmallVec<[(String, EventClosure); 1]>>,
    timers: FnvHashMap<TimerKey, PendingTimer>,
    frames: FnvHashMap<u32, PendingFrame>,
    // Closures that may still be on the call stack; freed on the next dispatch
    retired_events: Vec<EventClosure>,
    retired_ticks: Vec<TickClosure>,
}

impl DomHost {
    fn new(el: web::HtmlElement, binding: Weak<RefCell<Binding>>) -> Self {
        Self {
            el,
            binding,
            next_key: 1,
            activation: FnvHashMap::default(),
            deactivation: FnvHashMap::default(),
            timers: FnvHashMap::default(),
            frames: FnvHashMap::default(),
            retired_events: Vec::new(),
            retired_ticks: Vec::new(),
        }
    }

    fn next_key(&mut self) -> u32 {
        let key = self.next_key;
        self.next_key = self.next_key.wrapping_add(1);
        key
    }

    fn drain_retired(&mut self) {
        self.retired_events.clear();
        self.retired_ticks.clear();
    }

    fn retire_timer(&mut self, key: TimerKey) {
        if let Some(timer) = self.timers.remove(&key) {
            self.retired_ticks.push(timer.closure);
        }
    }

    fn retire_frame(&mut self, key: u32) {
        if let Some(frame) = self.frames.remove(&key) {
            self.retired_ticks.push(frame.closure);
        }
    }

    fn build_surface(&self, style: &SurfaceStyle) -> anyhow::Result<DomSurface> {
        let container = dom::create_div(CONTAINER_CLASS)?;
        let ripple = dom::create_div(RIPPLE_CLASS)?;
        container
            .set_attribute("style", &style::css_text(&style::container_declarations(style)))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        ripple
            .set_attribute("style", &style::css_text(&style::ripple_declarations(style)))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        container
            .append_child(&ripple)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        self.el
            .append_child(&container)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        Ok(DomSurface { container, ripple })
    }
}

impl Drop for DomHost {
    fn drop(&mut self) {
        for (event_type, closure) in self.activation.drain() {
            _ = self
                .el
                .remove_event_listener_with_callback(&event_type, closure.as_ref().unchecked_ref());
        }
        if let Some(body) = dom::body() {
            for (_, listeners) in self.deactivation.drain() {
                for (event_type, closure) in listeners {
                    _ = body.remove_event_listener_with_callback(
                        &event_type,
                        closure.as_ref().unchecked_ref(),
                    );
                }
            }
        }
        if let Some(window) = web::window() {
            for (_, timer) in self.timers.drain() {
                window.clear_timeout_with_handle(timer.handle);
            }
            for (_, frame) in self.frames.drain() {
                _ = window.cancel_animation_frame(frame.handle);
            }
        }
    }
}

impl Scheduler for DomHost {
    type Timer = TimerKey;

    fn set_timeout(&mut self, delay_ms: f64, task: Task) -> TimerKey {
        let key = TimerKey(self.next_key());
        let weak = self.binding.clone();
        let closure = Closure::wrap(Box::new(move || {
            dispatch(&weak, |ripplify, host| {
                host.retire_timer(key);
                ripplify.run(host, task);
            });
        }) as Box<dyn FnMut()>);

        let handle = web::window().and_then(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay_ms.round() as i32,
            )
            .ok()
        });
        match handle {
            Some(handle) => {
                self.timers.insert(key, PendingTimer { handle, closure });
            }
            None => log::error!("[dom] setTimeout failed; {:?} dropped", task),
        }
        key
    }

    fn clear_timeout(&mut self, timer: TimerKey) {
        if let Some(pending) = self.timers.remove(&timer) {
            if let Some(window) = web::window() {
                window.clear_timeout_with_handle(pending.handle);
            }
            self.retired_ticks.push(pending.closure);
        }
    }

    fn request_frame(&mut self, task: Task) {
        let key = self.next_key();
        let weak = self.binding.clone();
        let closure = Closure::wrap(Box::new(move || {
            dispatch(&weak, |ripplify, host| {
                host.retire_frame(key);
                ripplify.run(host, task);
            });
        }) as Box<dyn FnMut()>);

        let handle = web::window()
            .and_then(|w| w.request_animation_frame(closure.as_ref().unchecked_ref()).ok());
        match handle {
            Some(handle) => {
                self.frames.insert(
                    key,
                    PendingFrame {
                        ripple: task.ripple(),
                        handle,
                        closure,
                    },
                );
            }
            None => log::error!("[dom] requestAnimationFrame failed; {:?} dropped", task),
        }
    }

    fn cancel_frames(&mut self, ripple: RippleId) {
        let keys: SmallVec<[u32; 2]> = self
            .frames
            .iter()
            .filter(|(_, frame)| frame.ripple == ripple)
            .map(|(key, _)| *key)
            .collect();
        let window = web::window();
        for key in keys {
            if let Some(frame) = self.frames.remove(&key) {
                if let Some(window) = window.as_ref() {
                    _ = window.cancel_animation_frame(frame.handle);
                }
                self.retired_ticks.push(frame.closure);
            }
        }
    }
}

impl RippleHost for DomHost {
    type Surface = DomSurface;

    fn host_box(&self) -> HostBox {
        dom::host_box(&self.el)
    }

    fn corner_radii(&self) -> CornerRadii {
        dom::corner_radii(&self.el)
    }

    fn inline_position(&self) -> String {
        self.el
            .style()
            .get_property_value("position")
            .unwrap_or_default()
    }

    fn computed_position(&self) -> String {
        dom::computed_property(&self.el, "position")
    }

    fn set_inline_position(&mut self, position: &str) {
        let style = self.el.style();
        let result = if position.is_empty() {
            style.remove_property("position").map(|_| ())
        } else {
            style.set_property("position", position)
        };
        if let Err(e) = result {
            log::warn!("[dom] position update failed: {:?}", e);
        }
    }

    fn mount_surface(&mut self, style: &SurfaceStyle) -> Option<DomSurface> {
        match self.build_surface(style) {
            Ok(surface) => Some(surface),
            Err(e) => {
                log::error!("[dom] ripple mount failed: {:?}", e);
                None
            }
        }
    }

    fn scale_to_full(&mut self, surface: &DomSurface) {
        // Flush the initial transform so the change animates
        _ = surface.ripple.offset_width();
        _ = surface.ripple.class_list().add_1(FULL_SCALE_CLASS);
        _ = surface.ripple.style().set_property("transform", "scale(1)");
    }

    fn fade_out(&mut self, surface: &DomSurface) {
        _ = surface.ripple.style().set_property("opacity", "0");
    }

    fn remove_surface(&mut self, surface: DomSurface) {
        surface.container.remove();
    }

    fn listen_activation(&mut self, event_types: &[String]) {
        self.unlisten_activation();
        for event_type in event_types {
            if self.activation.contains_key(event_type) {
                continue;
            }
            let weak = self.binding.clone();
            let closure = Closure::wrap(Box::new(move |ev: web::Event| {
                let point = dom::event_client_point(&ev);
                dispatch(&weak, |ripplify, host| {
                    let point: DVec2 = point.unwrap_or_else(|| host.host_box().center());
                    ripplify.activate(host, point);
                });
            }) as Box<dyn FnMut(_)>);

            if let Err(e) = self
                .el
                .add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())
            {
                log::error!("[dom] {} listener failed: {:?}", event_type, e);
                continue;
            }
            self.activation.insert(event_type.clone(), closure);
        }
    }

    fn unlisten_activation(&mut self) {
        for (event_type, closure) in self.activation.drain() {
            _ = self
                .el
                .remove_event_listener_with_callback(&event_type, closure.as_ref().unchecked_ref());
            self.retired_events.push(closure);
        }
    }

    fn listen_deactivation(&mut self, ripple: RippleId, event_types: &[&str]) {
        let Some(body) = dom::body() else {
            log::warn!("[dom] no document body; ripple #{} cannot observe release", ripple);
            return;
        };
        let mut listeners = SmallVec::new();
        for event_type in event_types {
            let weak = self.binding.clone();
            let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
                dispatch(&weak, |ripplify, host| ripplify.interaction_ended(host, ripple));
            }) as Box<dyn FnMut(_)>);

            match body.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref()) {
                Ok(()) => listeners.push((event_type.to_string(), closure)),
                Err(e) => log::error!("[dom] {} listener failed: {:?}", event_type, e),
            }
        }
        self.deactivation.insert(ripple, listeners);
    }

    fn unlisten_deactivation(&mut self, ripple: RippleId) {
        let Some(listeners) = self.deactivation.remove(&ripple) else {
            return;
        };
        let body = dom::body();
        for (event_type, closure) in listeners {
            if let Some(body) = body.as_ref() {
                _ = body.remove_event_listener_with_callback(
                    &event_type,
                    closure.as_ref().unchecked_ref(),
                );
            }
            self.retired_events.push(closure);
        }
    }
}
