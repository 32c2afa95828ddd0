use shared::geometry::{OVERLAY_FONT, OVERLAY_LINE_WIDTH, OVERLAY_STROKE};
use shared::{OverlayBox, OverlayUpdate, Size};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

fn canvas_and_context(canvas_ref: &NodeRef) -> Option<(HtmlCanvasElement, CanvasRenderingContext2d)> {
    let canvas = canvas_ref.cast::<HtmlCanvasElement>()?;
    let context = canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()?;
    Some((canvas, context))
}

/// Matches the drawing surface to the preview's rendered size.
pub fn resize(canvas_ref: &NodeRef, size: Size) {
    if let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() {
        canvas.set_width(size.width.max(0.0).round() as u32);
        canvas.set_height(size.height.max(0.0).round() as u32);
    } else {
        log::warn!("Overlay canvas is not mounted");
    }
}

pub fn clear(canvas_ref: &NodeRef) {
    if let Some((canvas, context)) = canvas_and_context(canvas_ref) {
        context.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
    }
}

/// Clears the overlay and strokes every box with its caption.
pub fn draw_boxes(canvas_ref: &NodeRef, boxes: &[OverlayBox]) {
    let Some((canvas, context)) = canvas_and_context(canvas_ref) else {
        log::warn!("Overlay canvas has no 2d context");
        return;
    };

    context.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
    context.set_line_width(OVERLAY_LINE_WIDTH);
    context.set_stroke_style_str(OVERLAY_STROKE);
    context.set_fill_style_str(OVERLAY_STROKE);
    context.set_font(OVERLAY_FONT);

    for overlay_box in boxes {
        let rect = overlay_box.rect;
        context.stroke_rect(rect.x, rect.y, rect.w, rect.h);
        if let Err(e) = context.fill_text(&overlay_box.label, overlay_box.label_x, overlay_box.label_y) {
            log::warn!("Failed to draw label {}: {:?}", overlay_box.label, e);
        }
    }
}

pub fn apply(canvas_ref: &NodeRef, update: OverlayUpdate) {
    match update {
        OverlayUpdate::Untouched => {}
        OverlayUpdate::Clear => clear(canvas_ref),
        OverlayUpdate::Draw(boxes) => draw_boxes(canvas_ref, &boxes),
    }
}
