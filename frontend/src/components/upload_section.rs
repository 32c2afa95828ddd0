use super::super::{Model, Msg};
use super::utils::selected_file;
use shared::Detector;
use shared::config::parse_detector;
use strum::IntoEnumIterator;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    html! {
        <div class="upload-section">
            { render_file_input(ctx) }
            { render_options(model, ctx) }
            <button
                id="analyze-btn"
                class="analyze-btn"
                onclick={ctx.link().callback(|_| Msg::Analyze)}
                disabled={!model.session.trigger_enabled()}
            >
                { render_analyze_button_content(model) }
            </button>
            <p id="status" class="status">{ model.session.status() }</p>
        </div>
    }
}

fn render_file_input(ctx: &Context<Model>) -> Html {
    let handle_change = ctx.link().callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::FileSelected(selected_file(&input))
    });

    html! {
        <label class="file-picker">
            <i class="fa-solid fa-upload"></i>{" Choose an image"}
            <input
                type="file"
                id="file-input"
                accept="image/*"
                onchange={handle_change}
            />
        </label>
    }
}

fn render_options(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();

    let handle_race = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::SetIncludeRace(input.checked())
    });

    let handle_detector = link.batch_callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        match parse_detector(&select.value()) {
            Ok(detector) => Some(Msg::SetDetector(detector)),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        }
    });

    html! {
        <div class="options">
            <label>
                <input
                    type="checkbox"
                    id="toggle-race"
                    checked={model.options.include_race}
                    onchange={handle_race}
                />
                <span>{" Include race estimation"}</span>
            </label>
            <label>
                {"Detector "}
                <select id="detector" onchange={handle_detector}>
                    { for Detector::iter().map(|detector| html! {
                        <option
                            value={detector.to_string()}
                            selected={detector == model.options.detector}
                        >
                            { detector.as_ref() }
                        </option>
                    }) }
                </select>
            </label>
        </div>
    }
}

fn render_analyze_button_content(model: &Model) -> Html {
    if model.session.in_flight().is_some() {
        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Analyzing..."}</> }
    } else {
        let filename = model
            .file
            .as_ref()
            .map(|file| file.name())
            .unwrap_or_else(|| "Selected Image".to_string());

        let display_name = if filename.chars().count() > 20 {
            format!("{}...", filename.chars().take(17).collect::<String>())
        } else {
            filename
        };

        html! { <><i class="fa-solid fa-magnifying-glass"></i>{ format!(" Analyze \"{}\"", display_name) }</> }
    }
}
