use anyhow::anyhow;
use glam::DVec2;
use ripple_core::{ConfigError, CornerRadii, HostBox};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Shared root for deactivation listeners.
#[inline]
pub fn body() -> Option<web::HtmlElement> {
    window_document().and_then(|d| d.body())
}

pub fn create_div(class: &str) -> anyhow::Result<web::HtmlElement> {
    let document = window_document().ok_or_else(|| anyhow!("no document"))?;
    let el = document
        .create_element("div")
        .map_err(|e| anyhow!("{:?}", e))?
        .dyn_into::<web::HtmlElement>()
        .map_err(|e| anyhow!("{:?}", e))?;
    el.set_class_name(class);
    Ok(el)
}

pub fn host_box(el: &web::HtmlElement) -> HostBox {
    let rect = el.get_bounding_client_rect();
    HostBox::new(
        DVec2::new(rect.left(), rect.top()),
        DVec2::new(el.offset_width() as f64, el.offset_height() as f64),
    )
}

pub fn computed_property(el: &web::HtmlElement, name: &str) -> String {
    web::window()
        .and_then(|w| w.get_computed_style(el).ok().flatten())
        .and_then(|style| style.get_property_value(name).ok())
        .unwrap_or_default()
}

pub fn corner_radii(el: &web::HtmlElement) -> CornerRadii {
    CornerRadii {
        top_left: computed_property(el, "border-top-left-radius"),
        top_right: computed_property(el, "border-top-right-radius"),
        bottom_left: computed_property(el, "border-bottom-left-radius"),
        bottom_right: computed_property(el, "border-bottom-right-radius"),
    }
}

/// Client coordinates of a mouse or touch event.
pub fn event_client_point(ev: &web::Event) -> Option<DVec2> {
    if let Some(mouse) = ev.dyn_ref::<web::MouseEvent>() {
        return Some(DVec2::new(mouse.client_x() as f64, mouse.client_y() as f64));
    }
    let touch_event = ev.dyn_ref::<web::TouchEvent>()?;
    let touch = touch_event
        .touches()
        .get(0)
        .or_else(|| touch_event.changed_touches().get(0))?;
    Some(DVec2::new(touch.client_x() as f64, touch.client_y() as f64))
}

/// Decode a plain JS object through its JSON form. `undefined`/`null` decode
/// to the default value.
pub fn decode<T: Default>(
    value: &JsValue,
    parse: fn(&str) -> Result<T, ConfigError>,
) -> anyhow::Result<T> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    if !value.is_object() {
        return Err(anyhow!("expected an object, got {:?}", value));
    }
    let json: String = js_sys::JSON::stringify(value)
        .map_err(|e| anyhow!("{:?}", e))?
        .into();
    Ok(parse(&json)?)
}
