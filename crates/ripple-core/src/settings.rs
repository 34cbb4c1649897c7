//! Ripple configuration: the raw binding payload, the global default tier and
//! the fully-resolved [`Settings`] record a ripple is spawned with.
//!
//! Resolution is layered: an explicit per-element value wins, then the global
//! defaults, then the built-in constants. Invalid values (non-numeric or
//! non-positive durations, empty colors) are treated as absent at every tier.

use crate::constants::{ACTIVATION_EVENT_TYPES, COLOR, DEACTIVATION_MS, DURATION_MS, Z_INDEX};
use crate::error::ConfigError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use smallvec::SmallVec;

/// Event type identifiers, e.g. `"mousedown"`.
pub type EventTypes = SmallVec<[String; 2]>;

/// Per-element options as supplied by the host framework.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RippleOptions {
    #[serde(deserialize_with = "lenient_flag")]
    pub is_disabled: bool,
    #[serde(deserialize_with = "lenient_optional_flag")]
    pub is_unbounded: Option<bool>,
    #[serde(deserialize_with = "lenient_number")]
    pub duration: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub fade_duration: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub color: Option<String>,
    #[serde(deserialize_with = "lenient_integer")]
    pub z_index: Option<i32>,
}

impl RippleOptions {
    /// True when any field that affects how a ripple looks differs.
    pub fn visuals_differ(&self, other: &RippleOptions) -> bool {
        self.is_unbounded != other.is_unbounded
            || self.duration != other.duration
            || self.fade_duration != other.fade_duration
            || self.color != other.color
            || self.z_index != other.z_index
    }
}

/// Activation event types: either a single identifier or a list.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ActivationArg {
    One(String),
    Many(Vec<String>),
}

impl ActivationArg {
    /// Normalize to a sequence; a single value becomes a one-element sequence.
    pub fn event_types(&self) -> EventTypes {
        match self {
            ActivationArg::One(event_type) => SmallVec::from_elem(event_type.clone(), 1),
            ActivationArg::Many(event_types) => event_types.iter().cloned().collect(),
        }
    }
}

/// The whole binding payload: `{ value: {...}, arg: "mousedown" | [...] }`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BindingValue {
    #[serde(deserialize_with = "lenient_options")]
    pub value: Option<RippleOptions>,
    #[serde(deserialize_with = "lenient_arg")]
    pub arg: Option<ActivationArg>,
}

impl BindingValue {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn options(&self) -> RippleOptions {
        self.value.clone().unwrap_or_default()
    }

    pub fn is_disabled(&self) -> bool {
        self.value.as_ref().is_some_and(|v| v.is_disabled)
    }

    /// True when the activation event types differ after normalization.
    pub fn activation_differs(&self, other: &BindingValue) -> bool {
        self.arg.as_ref().map(ActivationArg::event_types)
            != other.arg.as_ref().map(ActivationArg::event_types)
    }
}

/// Component-level defaults, the second tier of resolution.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalDefaults {
    #[serde(deserialize_with = "lenient_optional_flag")]
    pub is_unbounded: Option<bool>,
    #[serde(deserialize_with = "lenient_number")]
    pub duration: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub fade_duration: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub color: Option<String>,
    #[serde(deserialize_with = "lenient_integer")]
    pub z_index: Option<i32>,
}

impl GlobalDefaults {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Fully-populated settings a ripple is spawned with.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub is_unbounded: bool,
    pub duration_ms: f64,
    pub fade_duration_ms: f64,
    pub color: String,
    pub z_index: i32,
    pub activation_event_types: EventTypes,
}

impl Default for Settings {
    fn default() -> Self {
        resolve_settings(&RippleOptions::default(), &GlobalDefaults::default(), None)
    }
}

/// Returns `None` for non-finite or non-positive values.
#[inline]
pub fn ensure_positive_number(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

// Colors end up inside inline style declarations
fn usable_color(value: Option<&String>) -> Option<&str> {
    value
        .map(|c| c.trim())
        .filter(|c| !c.is_empty() && !c.contains(&[';', '{', '}'][..]))
}

pub fn default_activation_event_types() -> EventTypes {
    ACTIVATION_EVENT_TYPES.iter().map(|t| t.to_string()).collect()
}

/// Layered resolution: element options, then globals, then constants.
pub fn resolve_settings(
    options: &RippleOptions,
    globals: &GlobalDefaults,
    arg: Option<&ActivationArg>,
) -> Settings {
    let color = usable_color(options.color.as_ref())
        .or_else(|| usable_color(globals.color.as_ref()))
        .unwrap_or(COLOR);

    Settings {
        is_unbounded: options
            .is_unbounded
            .or(globals.is_unbounded)
            .unwrap_or(false),
        duration_ms: ensure_positive_number(options.duration)
            .or_else(|| ensure_positive_number(globals.duration))
            .unwrap_or(DURATION_MS),
        fade_duration_ms: ensure_positive_number(options.fade_duration)
            .or_else(|| ensure_positive_number(globals.fade_duration))
            .unwrap_or(DEACTIVATION_MS),
        color: color.to_string(),
        // A zero global z-index counts as unset
        z_index: options
            .z_index
            .or(globals.z_index.filter(|z| *z != 0))
            .unwrap_or(Z_INDEX),
        activation_event_types: arg
            .map(ActivationArg::event_types)
            .filter(|types| !types.is_empty())
            .unwrap_or_else(default_activation_event_types),
    }
}

// ---------------- Lenient field decoding ----------------
// Payloads come from loosely-typed callers; anything that does not make sense
// for a field decodes as "absent" instead of failing the whole payload.

fn number_from_json(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn truthy(value: &Value) -> Option<bool> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => Some(!s.is_empty()),
        Value::Array(_) | Value::Object(_) => Some(true),
    }
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(number_from_json))
}

fn lenient_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(number_from_json)
        .filter(|n| *n >= i32::MIN as f64 && *n <= i32::MAX as f64)
        .map(|n| n.trunc() as i32))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(truthy).unwrap_or(false))
}

fn lenient_optional_flag<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<bool>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(truthy))
}

fn lenient_options<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<RippleOptions>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(object @ Value::Object(_)) => serde_json::from_value(object).ok(),
        _ => None,
    })
}

// Non-string entries are dropped; a list left empty resolves to the defaults
fn lenient_arg<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ActivationArg>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(event_type)) => Some(ActivationArg::One(event_type)),
        Some(Value::Array(entries)) => Some(ActivationArg::Many(
            entries
                .into_iter()
                .filter_map(|entry| match entry {
                    Value::String(event_type) => Some(event_type),
                    _ => None,
                })
                .collect(),
        )),
        _ => None,
    })
}
