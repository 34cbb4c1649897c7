//! Seams between the ripple state machine and the platform.
//!
//! The controller never touches a DOM or a clock directly. Deferred work is
//! described as a [`Task`] and handed to a [`Scheduler`]; when the platform
//! fires it, the task is passed back to the controller, which ignores tasks
//! for ripples that no longer exist.

use crate::geometry::{CornerRadii, HostBox, SurfaceStyle};
use std::fmt::Debug;

/// Identity of one ripple instance, unique per controller.
pub type RippleId = u64;

/// Named timer slots. `Fade` is the grow timer whose expiry may start the
/// fade; `Destroy` is the fade timer whose expiry removes the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerPhase {
    Fade,
    Destroy,
}

/// Deferred work for a specific ripple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    /// Next frame after mount: transition the disc to full scale.
    ScaleUp(RippleId),
    /// Grow duration elapsed.
    GrowElapsed(RippleId),
    /// Next frame after fade start: transition opacity to zero.
    FadeOut(RippleId),
    /// Fade duration elapsed: remove the surface.
    Destroy(RippleId),
}

impl Task {
    pub fn ripple(&self) -> RippleId {
        match *self {
            Task::ScaleUp(id) | Task::GrowElapsed(id) | Task::FadeOut(id) | Task::Destroy(id) => id,
        }
    }
}

/// Cooperative timers and next-frame callbacks.
///
/// Implementations call back into the controller with the task once it is
/// due. Cancelled work must never be delivered.
pub trait Scheduler {
    type Timer: Copy + Eq + Debug;

    fn set_timeout(&mut self, delay_ms: f64, task: Task) -> Self::Timer;
    fn clear_timeout(&mut self, timer: Self::Timer);

    /// Run `task` at the next render opportunity, after pending style changes
    /// have been committed.
    fn request_frame(&mut self, task: Task);
    /// Drop any frame callbacks still queued for `ripple`.
    fn cancel_frames(&mut self, ripple: RippleId);
}

/// The host element a controller is bound to, plus the shared root that
/// receives deactivation events.
pub trait RippleHost: Scheduler {
    /// Handle to a mounted wrapper + disc pair.
    type Surface;

    fn host_box(&self) -> HostBox;
    fn corner_radii(&self) -> CornerRadii;

    /// Inline `position` value; empty when unset.
    fn inline_position(&self) -> String;
    fn computed_position(&self) -> String;
    /// Set the inline `position`; an empty value clears it.
    fn set_inline_position(&mut self, position: &str);

    /// Append a new surface as the last child of the host. `None` when the
    /// platform could not build it.
    fn mount_surface(&mut self, style: &SurfaceStyle) -> Option<Self::Surface>;
    fn scale_to_full(&mut self, surface: &Self::Surface);
    fn fade_out(&mut self, surface: &Self::Surface);
    fn remove_surface(&mut self, surface: Self::Surface);

    /// Replace the host's activation listeners, one per event type.
    fn listen_activation(&mut self, event_types: &[String]);
    fn unlisten_activation(&mut self);

    /// Register listeners on the shared root owned by `ripple`. Listeners of
    /// other ripples, on this or any other host, are left alone.
    fn listen_deactivation(&mut self, ripple: RippleId, event_types: &[&str]);
    fn unlisten_deactivation(&mut self, ripple: RippleId);
}
