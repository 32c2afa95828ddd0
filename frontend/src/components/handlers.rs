use super::super::{Model, Msg};
use super::overlay;
use super::utils::{image_element, measure_display, natural_size};
use crate::api::request_analysis;
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_timers::callback::Timeout;
use shared::{AnalysisError, AnalysisResponse, Generation, PreviewError, RequestSeq};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use yew::prelude::*;

pub fn handle_file_selected(model: &mut Model, file: Option<GlooFile>) -> bool {
    let Some(file) = file else {
        // picker cancelled: nothing to analyze, the current preview stays
        log::debug!("File selection cleared");
        model.file = None;
        model.session.file_selected(false);
        return true;
    };

    log::info!("Selected {} ({} bytes)", file.name(), file.size());
    let generation = model.preview.select(Some(ObjectUrl::from(file.clone())));
    model.session.file_selected(true);
    model.file = Some(file);
    model.set_measure_timeout(None);

    if let Some(generation) = generation {
        model.schedule_decode(generation);
    }
    true
}

/// Waits for the browser to decode the freshly assigned preview image.
pub fn start_decode(model: &Model, ctx: &Context<Model>, generation: Generation) {
    let link = ctx.link().clone();

    let Some(image) = image_element(&model.image_ref) else {
        link.send_message(Msg::PreviewDecoded(
            generation,
            Err(PreviewError::Decode("preview element missing".into())),
        ));
        return;
    };

    spawn_local(async move {
        let result = JsFuture::from(image.decode())
            .await
            .map(|_| ())
            .map_err(|e| PreviewError::Decode(format!("{:?}", e)));
        link.send_message(Msg::PreviewDecoded(generation, result));
    });
}

pub fn handle_preview_decoded(
    model: &mut Model,
    ctx: &Context<Model>,
    generation: Generation,
    result: Result<(), PreviewError>,
) -> bool {
    let natural = natural_size(&model.image_ref);
    let accepted = match &result {
        Ok(()) => model.preview.decoded(generation, natural),
        Err(e) => {
            let accepted = model.preview.decode_failed(generation, natural);
            if accepted {
                gloo_console::warn!(format!("{} (generation {})", e, generation));
            }
            accepted
        }
    };
    if !accepted {
        return false;
    }

    // Layout for the new image settles after this turn; measure on the next.
    let link = ctx.link().clone();
    let timeout = Timeout::new(0, move || {
        link.send_message(Msg::LayoutSettled(generation));
    });
    model.set_measure_timeout(Some(timeout));

    model.session.clear_status();
    true
}

pub fn handle_layout_settled(model: &mut Model, generation: Generation) -> bool {
    let display = measure_display(&model.image_ref);
    if !model.preview.layout_settled(generation, display) {
        return false;
    }

    log::debug!(
        "Preview {} laid out at {}x{}",
        generation,
        display.width,
        display.height
    );
    // a response that beat the measurement is drawn now
    let geometry = model.preview.geometry();
    overlay::resize(&model.canvas_ref, display);
    overlay::draw_boxes(&model.canvas_ref, &model.session.overlay(geometry.as_ref()));
    false
}

pub fn handle_window_resized(model: &mut Model) -> bool {
    let display = measure_display(&model.image_ref);
    if !model.preview.remeasure(display) {
        return false;
    }

    let geometry = model.preview.geometry();
    overlay::resize(&model.canvas_ref, display);
    overlay::draw_boxes(&model.canvas_ref, &model.session.overlay(geometry.as_ref()));
    false
}

pub fn handle_analyze(model: &mut Model, ctx: &Context<Model>) -> bool {
    let Some(file) = model.file.clone() else {
        log::warn!("Analyze requested without a selected file");
        return false;
    };
    let Some(seq) = model.session.begin(&model.options) else {
        return false;
    };

    send_analysis_request(ctx, seq, model.config.endpoint.clone(), file, model.options);
    true
}

pub fn send_analysis_request(
    ctx: &Context<Model>,
    seq: RequestSeq,
    endpoint: String,
    file: GlooFile,
    options: shared::AnalysisOptions,
) {
    spawn_local({
        let link = ctx.link().clone();

        async move {
            log::info!(
                "Request {}: include_race={}, detector={}",
                seq,
                options.include_race,
                options.detector
            );
            let outcome = request_analysis(&endpoint, &file, &options).await;
            link.send_message(Msg::AnalysisFinished(seq, outcome));
        }
    });
}

pub fn handle_analysis_finished(
    model: &mut Model,
    seq: RequestSeq,
    outcome: Result<AnalysisResponse, AnalysisError>,
) -> bool {
    let geometry = model.preview.geometry();
    match model.session.complete(seq, outcome, geometry.as_ref()) {
        Some(update) => {
            overlay::apply(&model.canvas_ref, update);
            true
        }
        None => false,
    }
}
