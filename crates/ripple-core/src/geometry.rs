//! Ripple surface geometry.
//!
//! Everything here is expressed relative to the host box: positions and sizes
//! are percentages of the host's width/height so the overlay tracks the host
//! without re-measuring. The only absolute input is the interaction point in
//! client coordinates.

use crate::constants::{SCALE_INITIAL, UNBOUNDED_OFFSET_PCT, UNBOUNDED_SIZE_PCT};
use crate::settings::Settings;
use glam::DVec2;

/// Host element box: client-space top-left corner and layout size in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostBox {
    pub origin: DVec2,
    pub size: DVec2,
}

impl HostBox {
    pub fn new(origin: DVec2, size: DVec2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        self.origin + self.size * 0.5
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.size.x > 0.0 && self.size.y > 0.0)
    }
}

/// Computed border radius of each host corner, copied verbatim as CSS values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CornerRadii {
    pub top_left: String,
    pub top_right: String,
    pub bottom_left: String,
    pub bottom_right: String,
}

/// Disc placement in percent of the host box, plus the starting scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleGeometry {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub top: f64,
    pub initial_scale: f64,
}

impl RippleGeometry {
    /// Slightly oversized surface centred on the host.
    pub fn unbounded() -> Self {
        Self {
            width: UNBOUNDED_SIZE_PCT,
            height: UNBOUNDED_SIZE_PCT,
            left: UNBOUNDED_OFFSET_PCT,
            top: UNBOUNDED_OFFSET_PCT,
            initial_scale: SCALE_INITIAL,
        }
    }

    /// Disc centred on `client_point` whose full-size extent covers the whole
    /// host from that origin.
    ///
    /// The width is a percentage of the host width and the height a
    /// percentage of the host height, so the height is stretched by the
    /// width/height ratio to stay circular on screen. A degenerate (zero-area)
    /// host falls back to [`RippleGeometry::unbounded`].
    pub fn bounded(host: &HostBox, client_point: DVec2) -> Self {
        if host.is_degenerate() {
            return Self::unbounded();
        }
        let size = host.size;
        let ratio = size.x / size.y;
        let event = (client_point - host.origin) * 100.0 / size;

        // Work in width-percent units on both axes
        let event_y_relative = event.y / ratio;
        let max_x = event.x.max(100.0 - event.x);
        let max_y = event_y_relative.max(100.0 / ratio - event_y_relative);
        let radius = (max_x.powi(2) + max_y.powi(2)).sqrt();
        let diameter = radius * 2.0;
        let max_dim = 100f64.max(100.0 * size.y / size.x);

        Self {
            width: diameter,
            height: diameter * ratio,
            left: event.x - radius,
            top: event.y - radius * ratio,
            initial_scale: (SCALE_INITIAL * max_dim) / diameter,
        }
    }

    pub fn compute(host: &HostBox, client_point: DVec2, is_unbounded: bool) -> Self {
        if is_unbounded {
            Self::unbounded()
        } else {
            Self::bounded(host, client_point)
        }
    }
}

/// Everything needed to mount one ripple surface.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceStyle {
    pub geometry: RippleGeometry,
    pub radii: CornerRadii,
    pub color: String,
    pub z_index: i32,
    pub duration_ms: f64,
    pub fade_duration_ms: f64,
}

impl SurfaceStyle {
    pub fn new(settings: &Settings, host: &HostBox, radii: CornerRadii, client_point: DVec2) -> Self {
        Self {
            geometry: RippleGeometry::compute(host, client_point, settings.is_unbounded),
            radii,
            color: settings.color.clone(),
            z_index: settings.z_index,
            duration_ms: settings.duration_ms,
            fade_duration_ms: settings.fade_duration_ms,
        }
    }
}
