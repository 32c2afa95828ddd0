use super::super::Model;
use yew::prelude::*;

/// Preview image with the overlay canvas stacked on top.
///
/// Both elements are always mounted so the canvas keeps its drawing across
/// re-renders; the canvas size is managed imperatively by the overlay module.
pub fn render_preview_area(model: &Model) -> Html {
    let source = model.preview.source().map(|url| url.to_string());
    let style = if source.is_some() { "display: block;" } else { "display: none;" };

    html! {
        <div id="preview-container" class="preview-wrap">
            <img
                id="preview"
                ref={model.image_ref.clone()}
                src={source}
                alt="Image Preview"
                style={style}
            />
            <canvas id="overlay" class="overlay" ref={model.canvas_ref.clone()}></canvas>
        </div>
    }
}
