use shared::widgets::{DistributionPanel, FacePanel, MetricTile, PercentageBar};
use yew::prelude::*;

pub fn render_metric_tile(tile: &MetricTile) -> Html {
    html! {
        <div class="metric">
            <strong>{ &tile.label }</strong>
            <span>{ &tile.value }</span>
        </div>
    }
}

pub fn render_percentage_bar(bar: &PercentageBar) -> Html {
    html! {
        <div class="result-item">
            <div class="result-label-row">
                <span class="result-label">{ &bar.label }</span>
                <span class="result-value">{ bar.text() }</span>
            </div>
            <div class="progress">
                <div class="progress-fill" style={bar.width_style()}></div>
            </div>
        </div>
    }
}

fn render_distribution(panel: &DistributionPanel, class: &'static str) -> Html {
    html! {
        <div class={classes!("distribution", class)}>
            <h4>{ panel.title }</h4>
            { for panel.bars.iter().map(render_percentage_bar) }
            <p><em>{"Dominant:"}</em>{" "}{ &panel.dominant }</p>
        </div>
    }
}

pub fn render_face_panel(panel: &FacePanel) -> Html {
    html! {
        <div class="face">
            <div class="face-header">
                <div class="badge">{ &panel.badge }</div>
                <div>
                    {"Age: "}<strong>{ &panel.age }</strong>
                    {", Gender: "}<strong>{ &panel.gender }</strong>
                </div>
            </div>
            <div class="row">
                { render_distribution(&panel.emotions, "emotions") }
                {
                    match &panel.race {
                        Some(race) => render_distribution(race, "race"),
                        None => html! {},
                    }
                }
            </div>
        </div>
    }
}
