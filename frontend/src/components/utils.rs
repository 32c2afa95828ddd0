use gloo_file::File as GlooFile;
use shared::{ClientConfig, Size};
use web_sys::{HtmlImageElement, HtmlInputElement, UrlSearchParams};
use yew::prelude::*;

pub const CONFIG_ELEMENT_ID: &str = "facelens-config";
const CONFIG_QUERY_KEYS: [&str; 3] = ["endpoint", "detector", "race"];

pub fn image_element(image_ref: &NodeRef) -> Option<HtmlImageElement> {
    image_ref.cast::<HtmlImageElement>()
}

/// Decoded pixel size of the preview, zero until the browser knows it.
pub fn natural_size(image_ref: &NodeRef) -> Size {
    image_element(image_ref)
        .map(|image| Size::new(image.natural_width() as f64, image.natural_height() as f64))
        .unwrap_or_default()
}

/// Rendered size of the preview. Falls back to the wrapping element when
/// the image itself reports zero on an axis.
pub fn measure_display(image_ref: &NodeRef) -> Size {
    let Some(image) = image_element(image_ref) else {
        return Size::default();
    };
    let parent = image.parent_element();
    let fallback = |own: i32, from_parent: fn(&web_sys::Element) -> i32| {
        if own > 0 {
            own
        } else {
            parent.as_ref().map(from_parent).unwrap_or(0)
        }
    };

    Size::new(
        fallback(image.client_width(), web_sys::Element::client_width) as f64,
        fallback(image.client_height(), web_sys::Element::client_height) as f64,
    )
}

/// First file of a file input, if any.
pub fn selected_file(input: &HtmlInputElement) -> Option<GlooFile> {
    input
        .files()
        .and_then(|files| files.item(0))
        .map(GlooFile::from)
}

/// Embedded JSON config (if the page carries one) with query-string
/// overrides applied on top.
pub fn load_config() -> ClientConfig {
    let Some(window) = web_sys::window() else {
        return ClientConfig::default();
    };

    let embedded = window
        .document()
        .and_then(|document| document.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|element| element.text_content());

    let base = match embedded {
        Some(raw) => ClientConfig::from_json(&raw).unwrap_or_else(|e| {
            log::warn!("{}, using defaults", e);
            ClientConfig::default()
        }),
        None => ClientConfig::default(),
    };

    let overrides: Vec<(&str, String)> = window
        .location()
        .search()
        .ok()
        .and_then(|search| UrlSearchParams::new_with_str(&search).ok())
        .map(|params| {
            CONFIG_QUERY_KEYS
                .iter()
                .filter_map(|&key| params.get(key).map(|value| (key, value)))
                .collect()
        })
        .unwrap_or_default();

    base.with_overrides(overrides.iter().map(|(key, value)| (*key, value.as_str())))
}
