// Scripted host for driving the ripple state machine without a DOM.
// Timers run on a virtual millisecond clock; frames are queued until flushed.

#![allow(dead_code)]

use glam::DVec2;
use ripple_core::*;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FakeTimer(pub u32);

#[derive(Debug)]
pub struct FakeSurface(pub u32);

/// Deactivation listeners on the document root, shared by every bound host.
/// Keyed by host then ripple.
pub type SharedRoot = Rc<RefCell<BTreeMap<(u32, RippleId), Vec<String>>>>;

pub struct FakeHost {
    pub now: f64,
    next_timer: u32,
    pub timers: BTreeMap<FakeTimer, (f64, Task)>,
    pub cleared: Vec<FakeTimer>,
    pub frames: Vec<Task>,

    pub host_box: HostBox,
    pub radii: CornerRadii,
    pub stylesheet_position: String,
    pub inline_position: String,

    next_surface: u32,
    pub mounted: Vec<u32>,
    pub styles: BTreeMap<u32, SurfaceStyle>,
    pub full_scale: HashSet<u32>,
    pub faded: HashSet<u32>,
    pub removed: Vec<u32>,
    pub fail_mount: bool,

    pub activation: Vec<String>,
    pub root: SharedRoot,
    pub key: u32,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_timer: 1,
            timers: BTreeMap::new(),
            cleared: Vec::new(),
            frames: Vec::new(),
            host_box: HostBox::new(DVec2::ZERO, DVec2::new(200.0, 100.0)),
            radii: CornerRadii {
                top_left: "4px".into(),
                top_right: "4px".into(),
                bottom_left: "0px".into(),
                bottom_right: "0px".into(),
            },
            stylesheet_position: "static".into(),
            inline_position: String::new(),
            next_surface: 1,
            mounted: Vec::new(),
            styles: BTreeMap::new(),
            full_scale: HashSet::new(),
            faded: HashSet::new(),
            removed: Vec::new(),
            fail_mount: false,
            activation: Vec::new(),
            root: SharedRoot::default(),
            key: 0,
        }
    }
}

impl FakeHost {
    pub fn on_root(root: &SharedRoot, key: u32) -> Self {
        Self {
            root: Rc::clone(root),
            key,
            ..Self::default()
        }
    }

    /// This host's deactivation listeners on the root.
    pub fn deactivation(&self) -> BTreeMap<RippleId, Vec<String>> {
        self.root
            .borrow()
            .iter()
            .filter(|((key, _), _)| *key == self.key)
            .map(|((_, ripple), types)| (*ripple, types.clone()))
            .collect()
    }
}

impl Scheduler for FakeHost {
    type Timer = FakeTimer;

    fn set_timeout(&mut self, delay_ms: f64, task: Task) -> FakeTimer {
        let timer = FakeTimer(self.next_timer);
        self.next_timer += 1;
        self.timers.insert(timer, (self.now + delay_ms, task));
        timer
    }

    fn clear_timeout(&mut self, timer: FakeTimer) {
        self.timers.remove(&timer);
        self.cleared.push(timer);
    }

    fn request_frame(&mut self, task: Task) {
        self.frames.push(task);
    }

    fn cancel_frames(&mut self, ripple: RippleId) {
        self.frames.retain(|t| t.ripple() != ripple);
    }
}

impl RippleHost for FakeHost {
    type Surface = FakeSurface;

    fn host_box(&self) -> HostBox {
        self.host_box
    }

    fn corner_radii(&self) -> CornerRadii {
        self.radii.clone()
    }

    fn inline_position(&self) -> String {
        self.inline_position.clone()
    }

    fn computed_position(&self) -> String {
        if self.inline_position.is_empty() {
            self.stylesheet_position.clone()
        } else {
            self.inline_position.clone()
        }
    }

    fn set_inline_position(&mut self, position: &str) {
        self.inline_position = position.to_string();
    }

    fn mount_surface(&mut self, style: &SurfaceStyle) -> Option<FakeSurface> {
        if self.fail_mount {
            return None;
        }
        let id = self.next_surface;
        self.next_surface += 1;
        self.mounted.push(id);
        self.styles.insert(id, style.clone());
        Some(FakeSurface(id))
    }

    fn scale_to_full(&mut self, surface: &FakeSurface) {
        assert!(self.mounted.contains(&surface.0), "scaled a removed surface");
        self.full_scale.insert(surface.0);
    }

    fn fade_out(&mut self, surface: &FakeSurface) {
        assert!(self.mounted.contains(&surface.0), "faded a removed surface");
        self.faded.insert(surface.0);
    }

    fn remove_surface(&mut self, surface: FakeSurface) {
        self.mounted.retain(|id| *id != surface.0);
        self.removed.push(surface.0);
    }

    fn listen_activation(&mut self, event_types: &[String]) {
        self.activation = event_types.to_vec();
    }

    fn unlisten_activation(&mut self) {
        self.activation.clear();
    }

    fn listen_deactivation(&mut self, ripple: RippleId, event_types: &[&str]) {
        self.root.borrow_mut().insert(
            (self.key, ripple),
            event_types.iter().map(|t| t.to_string()).collect(),
        );
    }

    fn unlisten_deactivation(&mut self, ripple: RippleId) {
        self.root.borrow_mut().remove(&(self.key, ripple));
    }
}

/// A bound element: the lifecycle object plus its fake host.
#[derive(Default)]
pub struct Harness {
    pub ripplify: Ripplify<FakeHost>,
    pub host: FakeHost,
    pub globals: GlobalDefaults,
}

impl Harness {
    pub fn attached(binding: &BindingValue) -> Self {
        let mut h = Harness::default();
        h.attach(binding);
        h
    }

    /// An element bound next to others under the same document root.
    pub fn attached_on_root(root: &SharedRoot, key: u32, binding: &BindingValue) -> Self {
        let mut h = Harness {
            host: FakeHost::on_root(root, key),
            ..Harness::default()
        };
        h.attach(binding);
        h
    }

    pub fn attach(&mut self, binding: &BindingValue) {
        self.ripplify.attach(&mut self.host, binding, &self.globals);
    }

    pub fn update(&mut self, binding: &BindingValue, old: &BindingValue) {
        self.ripplify.update(&mut self.host, binding, old, &self.globals);
    }

    pub fn detach(&mut self) {
        self.ripplify.detach(&mut self.host);
    }

    /// Activation event at client coordinates, if a listener is installed.
    pub fn press(&mut self, x: f64, y: f64) {
        if !self.host.activation.is_empty() {
            self.ripplify.activate(&mut self.host, DVec2::new(x, y));
        }
    }

    /// Deactivation event delivered to this host's root listeners.
    pub fn release(&mut self) {
        let listening: Vec<RippleId> = self.host.deactivation().keys().copied().collect();
        for ripple in listening {
            self.ripplify.interaction_ended(&mut self.host, ripple);
        }
    }

    pub fn flush_frames(&mut self) {
        let frames = std::mem::take(&mut self.host.frames);
        for task in frames {
            self.ripplify.run(&mut self.host, task);
        }
    }

    /// Advance the clock, flushing frames first and firing due timers in order.
    pub fn advance(&mut self, ms: f64) {
        self.flush_frames();
        let target = self.host.now + ms;
        loop {
            let due = self
                .host
                .timers
                .iter()
                .filter(|(_, (at, _))| *at <= target)
                .min_by(|a, b| a.1 .0.total_cmp(&b.1 .0).then(a.0.cmp(b.0)))
                .map(|(timer, (at, task))| (*timer, *at, *task));
            let Some((timer, at, task)) = due else {
                break;
            };
            self.host.timers.remove(&timer);
            self.host.now = at;
            self.ripplify.run(&mut self.host, task);
            self.flush_frames();
        }
        self.host.now = target;
    }

    pub fn phase(&self) -> RipplePhase {
        self.ripplify.phase()
    }
}

pub fn binding(json: &str) -> BindingValue {
    BindingValue::from_json(json).expect("valid binding json")
}
