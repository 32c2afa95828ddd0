use gloo_file::File as GlooFile;
use gloo_net::http::Request;
use shared::api::{FIELD_IMAGE, interpret_response};
use shared::{AnalysisError, AnalysisOptions, AnalysisResponse};
use wasm_bindgen::JsValue;
use web_sys::FormData;

fn network_error(err: impl std::fmt::Debug) -> AnalysisError {
    AnalysisError::Network(format!("{:?}", err))
}

fn build_form(file: &GlooFile, options: &AnalysisOptions) -> Result<FormData, JsValue> {
    let form_data = FormData::new()?;
    form_data.append_with_blob_and_filename(FIELD_IMAGE, file.as_ref(), &file.name())?;
    for (name, value) in options.form_fields() {
        form_data.append_with_str(name, &value)?;
    }
    Ok(form_data)
}

/// Posts the image and options to the analysis service.
pub async fn request_analysis(
    endpoint: &str,
    file: &GlooFile,
    options: &AnalysisOptions,
) -> Result<AnalysisResponse, AnalysisError> {
    let form_data = build_form(file, options).map_err(network_error)?;

    let response = Request::post(endpoint)
        .body(form_data)
        .map_err(network_error)?
        .send()
        .await
        .map_err(network_error)?;

    let body = response.text().await.map_err(network_error)?;
    let parsed = interpret_response(response.status(), response.ok(), &body)?;

    log::debug!(
        "Analysis response from {}: {} face(s)",
        endpoint,
        parsed.faces().len()
    );
    Ok(parsed)
}
