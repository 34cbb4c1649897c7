// Built-in ripple defaults, used when neither the element binding nor the
// global defaults provide a usable value.

// Timing (milliseconds)
pub const DURATION_MS: f64 = 225.0; // grow phase
pub const DEACTIVATION_MS: f64 = 150.0; // fade phase

// Appearance
pub const COLOR: &str = "rgba(0, 0, 0, .26)";
pub const Z_INDEX: i32 = 20;
pub const SCALE_INITIAL: f64 = 0.6; // initial dot size as a fraction of the host's longer side

// Interaction
pub const ACTIVATION_EVENT_TYPES: &[&str] = &["mousedown"];
pub const DEACTIVATION_EVENT_TYPES: &[&str] = &["mouseup"];

// Unbounded surfaces overshoot the host by 1% on every side
pub const UNBOUNDED_SIZE_PCT: f64 = 102.0;
pub const UNBOUNDED_OFFSET_PCT: f64 = -1.0;

// Positioning mode forced on the host while a ripple is mounted
pub const RELATIVE_POSITION: &str = "relative";

// Class hooks for an optional stylesheet
pub const CONTAINER_CLASS: &str = "ripplify-container";
pub const RIPPLE_CLASS: &str = "ripplify-ripple";
pub const FULL_SCALE_CLASS: &str = "ripplify-full-scale";

// Grow easing (material "standard" curve)
pub const GROW_EASING: &str = "cubic-bezier(0.4, 0, 0.2, 1)";
