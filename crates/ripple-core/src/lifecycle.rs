//! Attach/update/detach handling for one bound element.

use crate::controller::{RipplePhase, RippleController};
use crate::host::{RippleHost, RippleId, Task};
use crate::settings::{resolve_settings, BindingValue, GlobalDefaults, Settings};
use glam::DVec2;

/// Binding of the ripple effect to one host element.
///
/// `settings` is `Some` while activation listeners are installed. The
/// controller outlives detach so an in-flight ripple still completes.
pub struct Ripplify<H: RippleHost> {
    settings: Option<Settings>,
    controller: RippleController<H>,
}

impl<H: RippleHost> Default for Ripplify<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: RippleHost> Ripplify<H> {
    pub fn new() -> Self {
        Self {
            settings: None,
            controller: RippleController::new(),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.settings.is_some()
    }

    pub fn settings(&self) -> Option<&Settings> {
        self.settings.as_ref()
    }

    pub fn controller(&self) -> &RippleController<H> {
        &self.controller
    }

    pub fn phase(&self) -> RipplePhase {
        self.controller.phase()
    }

    /// Element entered the tree. Disabled bindings install nothing.
    pub fn attach(&mut self, host: &mut H, binding: &BindingValue, globals: &GlobalDefaults) {
        if binding.is_disabled() {
            log::debug!("[binding] attach skipped: disabled");
            return;
        }
        self.init(host, binding, globals);
    }

    /// Reconfiguration pass: toggles on disabled-state changes, otherwise
    /// reinstalls listeners when any visual field or the event types changed.
    pub fn update(
        &mut self,
        host: &mut H,
        binding: &BindingValue,
        old_binding: &BindingValue,
        globals: &GlobalDefaults,
    ) {
        let (value, old_value) = (binding.options(), old_binding.options());

        if value.is_disabled != old_value.is_disabled {
            if value.is_disabled {
                self.detach(host);
            } else {
                self.init(host, binding, globals);
            }
        } else if !value.is_disabled
            && (value.visuals_differ(&old_value) || binding.activation_differs(old_binding))
        {
            self.detach(host);
            self.init(host, binding, globals);
        }
    }

    /// Remove activation listeners. Safe to call when nothing is attached.
    pub fn detach(&mut self, host: &mut H) {
        if self.settings.take().is_some() {
            log::debug!("[binding] detached");
            host.unlisten_activation();
        }
    }

    /// An activation event fired on the host.
    pub fn activate(&mut self, host: &mut H, client_point: DVec2) {
        if let Some(settings) = self.settings.as_ref() {
            self.controller.spawn(host, settings, client_point);
        }
    }

    pub fn run(&mut self, host: &mut H, task: Task) {
        self.controller.run(host, task);
    }

    pub fn interaction_ended(&mut self, host: &mut H, ripple: RippleId) {
        self.controller.interaction_ended(host, ripple);
    }

    fn init(&mut self, host: &mut H, binding: &BindingValue, globals: &GlobalDefaults) {
        let settings = resolve_settings(&binding.options(), globals, binding.arg.as_ref());
        if self.settings.is_some() {
            host.unlisten_activation();
        }
        host.listen_activation(&settings.activation_event_types);
        log::debug!(
            "[binding] attached events={:?} duration={}ms fade={}ms",
            settings.activation_event_types,
            settings.duration_ms,
            settings.fade_duration_ms
        );
        self.settings = Some(settings);
    }
}
