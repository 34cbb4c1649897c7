// CSS declarations for a ripple surface.
// Kept free of web-sys so the formatting can be tested on the host.

use ripple_core::constants::GROW_EASING;
use ripple_core::SurfaceStyle;

pub type Declarations = Vec<(&'static str, String)>;

#[inline]
pub fn percent(value: f64) -> String {
    format!("{}%", value)
}

#[inline]
pub fn scale(value: f64) -> String {
    format!("scale({})", value)
}

pub fn transition(duration_ms: f64, fade_duration_ms: f64) -> String {
    format!(
        "opacity {}ms linear, transform {}ms {}",
        fade_duration_ms, duration_ms, GROW_EASING
    )
}

/// Wrapper: fills the host, clips to its rounded shape, ignores the pointer.
pub fn container_declarations(style: &SurfaceStyle) -> Declarations {
    vec![
        ("position", "absolute".into()),
        ("top", "0".into()),
        ("left", "0".into()),
        ("width", "100%".into()),
        ("height", "100%".into()),
        ("overflow", "hidden".into()),
        ("pointer-events", "none".into()),
        ("border-top-left-radius", style.radii.top_left.clone()),
        ("border-top-right-radius", style.radii.top_right.clone()),
        ("border-bottom-left-radius", style.radii.bottom_left.clone()),
        ("border-bottom-right-radius", style.radii.bottom_right.clone()),
    ]
}

/// Disc: placed per geometry, starting at its initial scale and full opacity.
pub fn ripple_declarations(style: &SurfaceStyle) -> Declarations {
    let g = &style.geometry;
    vec![
        ("position", "absolute".into()),
        ("border-radius", "50%".into()),
        ("top", percent(g.top)),
        ("left", percent(g.left)),
        ("width", percent(g.width)),
        ("height", percent(g.height)),
        ("z-index", style.z_index.to_string()),
        ("background-color", style.color.clone()),
        ("opacity", "1".into()),
        (
            "transition",
            transition(style.duration_ms, style.fade_duration_ms),
        ),
        ("transform", scale(g.initial_scale)),
    ]
}

/// Inline `style` attribute text for a declaration list.
pub fn css_text(declarations: &[(&'static str, String)]) -> String {
    declarations
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| format!("{}: {};", name, value))
        .collect::<Vec<_>>()
        .join(" ")
}
