use js_sys::Date;
use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-face-smile"></i> {" Face Analysis"}</h1>
            <p class="subtitle">{"Age, gender and emotion estimates for every face in a photo"}</p>
        </header>
    }
}

pub fn render_footer() -> Html {
    html! {
        <footer class="app-footer">
            <p>{ format!("© {} FaceLens | Rust WASM client", Date::new_0().get_full_year()) }</p>
        </footer>
    }
}
