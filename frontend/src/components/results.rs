use super::super::Model;
use super::widgets::{render_face_panel, render_metric_tile};
use shared::ResultsContent;
use shared::session::NO_FACES_MESSAGE;
use yew::prelude::*;

pub fn render_properties_panel(model: &Model) -> Html {
    let tiles = model.session.properties();

    html! {
        <section id="props" class={classes!("card", tiles.is_none().then_some("hidden"))}>
            {
                match tiles {
                    Some(tiles) => html! {
                        <>
                            <h2>{"Image Properties"}</h2>
                            <div class="grid">
                                { for tiles.iter().map(render_metric_tile) }
                            </div>
                        </>
                    },
                    None => html! {},
                }
            }
        </section>
    }
}

pub fn render_results_panel(model: &Model) -> Html {
    let visible = model.session.results_visible();

    html! {
        <section id="results" class={classes!("card", (!visible).then_some("hidden"))}>
            { render_results_content(model.session.results()) }
        </section>
    }
}

pub fn render_results_content(content: &ResultsContent) -> Html {
    match content {
        ResultsContent::Blank => html! {},
        ResultsContent::NoFaces => html! {
            <>
                <h2>{"Face Analysis"}</h2>
                <p class="no-results-message">{ NO_FACES_MESSAGE }</p>
            </>
        },
        ResultsContent::Faces(panels) => html! {
            <>
                <h2>{"Face Analysis"}</h2>
                { for panels.iter().map(render_face_panel) }
            </>
        },
    }
}
