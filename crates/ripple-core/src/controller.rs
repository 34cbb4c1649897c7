//! Per-element ripple state machine.
//!
//! ```text
//! Idle -> Growing -> AwaitingCompletion -> Fading -> Idle
//! ```
//!
//! A ripple starts fading only once its grow timer has elapsed *and* the user
//! interaction has ended, whichever comes second. Spawning while a surface is
//! still live cancels the old ripple's timers and frames and removes its
//! surface before the new one is mounted.

use crate::constants::{DEACTIVATION_EVENT_TYPES, RELATIVE_POSITION};
use crate::geometry::SurfaceStyle;
use crate::host::{RippleHost, RippleId, Task, TimerPhase};
use crate::settings::Settings;
use fnv::FnvHashMap;
use glam::DVec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RipplePhase {
    Idle,
    Growing,
    AwaitingCompletion,
    Fading,
}

struct LiveRipple<S> {
    id: RippleId,
    surface: S,
    duration_ms: f64,
    fade_duration_ms: f64,
}

/// Host position captured before the first ripple forced it to `relative`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct OriginalPosition {
    value: String,
    inline: bool,
}

pub struct RippleController<H: RippleHost> {
    is_animation_in_progress: bool,
    has_interaction_ended: bool,
    ripple: Option<LiveRipple<H::Surface>>,
    timeouts: FnvHashMap<TimerPhase, H::Timer>,
    el_original_position: OriginalPosition,
    next_id: RippleId,
}

impl<H: RippleHost> Default for RippleController<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: RippleHost> RippleController<H> {
    pub fn new() -> Self {
        Self {
            is_animation_in_progress: false,
            has_interaction_ended: false,
            ripple: None,
            timeouts: FnvHashMap::default(),
            el_original_position: OriginalPosition::default(),
            next_id: 1,
        }
    }

    pub fn phase(&self) -> RipplePhase {
        match self.ripple {
            None => RipplePhase::Idle,
            Some(_) if self.timeouts.contains_key(&TimerPhase::Destroy) => RipplePhase::Fading,
            Some(_) if self.is_animation_in_progress => RipplePhase::Growing,
            Some(_) => RipplePhase::AwaitingCompletion,
        }
    }

    pub fn is_animation_in_progress(&self) -> bool {
        self.is_animation_in_progress
    }

    pub fn has_interaction_ended(&self) -> bool {
        self.has_interaction_ended
    }

    /// Id of the live ripple, if any.
    pub fn current_ripple(&self) -> Option<RippleId> {
        self.ripple.as_ref().map(|r| r.id)
    }

    pub fn pending_timer(&self, phase: TimerPhase) -> Option<H::Timer> {
        self.timeouts.get(&phase).copied()
    }

    /// Start a new ripple from `client_point` (ignored when unbounded).
    pub fn spawn(&mut self, host: &mut H, settings: &Settings, client_point: DVec2) {
        let style = SurfaceStyle::new(settings, &host.host_box(), host.corner_radii(), client_point);

        if self.ripple.is_some() {
            // The stashed position still describes the host before any ripple
            self.interrupt(host);
        } else {
            self.save_position(host);
        }
        if host.computed_position() != RELATIVE_POSITION {
            host.set_inline_position(RELATIVE_POSITION);
        }

        let Some(surface) = host.mount_surface(&style) else {
            log::warn!("[ripple] surface could not be mounted; skipping ripple");
            self.restore_position(host);
            return;
        };

        let id = self.next_id;
        self.next_id += 1;
        log::debug!(
            "[ripple] spawn #{} unbounded={} scale0={:.3}",
            id,
            settings.is_unbounded,
            style.geometry.initial_scale
        );

        self.ripple = Some(LiveRipple {
            id,
            surface,
            duration_ms: settings.duration_ms,
            fade_duration_ms: settings.fade_duration_ms,
        });
        self.is_animation_in_progress = true;
        self.has_interaction_ended = false;

        host.listen_deactivation(id, DEACTIVATION_EVENT_TYPES);
        host.request_frame(Task::ScaleUp(id));
    }

    /// Deliver a scheduled task. Tasks for ripples that are gone are dropped.
    pub fn run(&mut self, host: &mut H, task: Task) {
        let Some(ripple) = self.ripple.as_ref().filter(|r| r.id == task.ripple()) else {
            log::trace!("[ripple] stale {:?} ignored", task);
            return;
        };

        match task {
            Task::ScaleUp(id) => {
                host.scale_to_full(&ripple.surface);
                let timer = host.set_timeout(ripple.duration_ms, Task::GrowElapsed(id));
                self.timeouts.insert(TimerPhase::Fade, timer);
            }
            Task::GrowElapsed(_) => {
                self.timeouts.remove(&TimerPhase::Fade);
                self.is_animation_in_progress = false;
                self.try_fade(host);
            }
            Task::FadeOut(_) => host.fade_out(&ripple.surface),
            Task::Destroy(id) => {
                self.timeouts.remove(&TimerPhase::Destroy);
                self.has_interaction_ended = false;
                // A throttled frame may still be queued behind the timer
                host.cancel_frames(id);
                if let Some(ripple) = self.ripple.take() {
                    host.remove_surface(ripple.surface);
                }
                self.restore_position(host);
                log::debug!("[ripple] #{} removed", id);
            }
        }
    }

    /// First deactivation signal for `ripple`; later ones are ignored.
    pub fn interaction_ended(&mut self, host: &mut H, ripple: RippleId) {
        if self.current_ripple() != Some(ripple) {
            host.unlisten_deactivation(ripple);
            return;
        }
        if self.has_interaction_ended {
            return;
        }
        self.has_interaction_ended = true;
        host.unlisten_deactivation(ripple);
        self.try_fade(host);
    }

    fn try_fade(&mut self, host: &mut H) {
        if self.is_animation_in_progress
            || !self.has_interaction_ended
            || self.timeouts.contains_key(&TimerPhase::Destroy)
        {
            return;
        }
        let Some(ripple) = self.ripple.as_ref() else {
            return;
        };
        log::debug!("[ripple] #{} fading", ripple.id);
        host.request_frame(Task::FadeOut(ripple.id));
        let timer = host.set_timeout(ripple.fade_duration_ms, Task::Destroy(ripple.id));
        self.timeouts.insert(TimerPhase::Destroy, timer);
    }

    /// Cancel everything belonging to the live ripple and drop its surface.
    /// The host position is left as is.
    fn interrupt(&mut self, host: &mut H) {
        for (_, timer) in self.timeouts.drain() {
            host.clear_timeout(timer);
        }
        self.is_animation_in_progress = false;
        self.has_interaction_ended = false;
        if let Some(ripple) = self.ripple.take() {
            log::debug!("[ripple] #{} interrupted", ripple.id);
            host.cancel_frames(ripple.id);
            host.unlisten_deactivation(ripple.id);
            host.remove_surface(ripple.surface);
        }
    }

    fn save_position(&mut self, host: &H) {
        let inline = host.inline_position();
        self.el_original_position = if inline.is_empty() {
            OriginalPosition {
                value: host.computed_position(),
                inline: false,
            }
        } else {
            OriginalPosition {
                value: inline,
                inline: true,
            }
        };
    }

    fn restore_position(&mut self, host: &mut H) {
        let original = &self.el_original_position;
        if original.value == host.computed_position() {
            return;
        }
        if original.inline {
            host.set_inline_position(&original.value);
        } else {
            // The value came from the stylesheet; dropping the override restores it
            host.set_inline_position("");
        }
    }
}
