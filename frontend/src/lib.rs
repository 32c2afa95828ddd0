pub mod api;
pub mod components;

use components::handlers;
use components::header::{render_footer, render_header};
use components::preview_area::render_preview_area;
use components::results::{render_properties_panel, render_results_panel};
use components::upload_section::render_upload_section;
use components::utils::load_config;
use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_timers::callback::Timeout;
use shared::{
    AnalysisError, AnalysisOptions, AnalysisResponse, AnalysisSession, ClientConfig, Detector,
    Generation, PreviewController, PreviewError, RequestSeq,
};
use yew::prelude::*;

pub enum Msg {
    // Preview lifecycle
    FileSelected(Option<GlooFile>),
    PreviewDecoded(Generation, Result<(), PreviewError>),
    LayoutSettled(Generation),
    WindowResized,

    // Analysis options
    SetIncludeRace(bool),
    SetDetector(Detector),

    // Analysis operations
    Analyze,
    AnalysisFinished(RequestSeq, Result<AnalysisResponse, AnalysisError>),
}

/// Single owner of every piece of UI state: the preview, the overlay canvas,
/// the status line and both result panels.
pub struct Model {
    pub file: Option<GlooFile>,
    pub preview: PreviewController<ObjectUrl>,
    pub session: AnalysisSession,
    pub options: AnalysisOptions,
    pub config: ClientConfig,
    pub image_ref: NodeRef,
    pub canvas_ref: NodeRef,
    pending_decode: Option<Generation>,
    measure_timeout: Option<Timeout>,
    _resize_listener: Option<EventListener>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let config = load_config();
        log::info!(
            "Analysis endpoint {} (default detector {})",
            config.endpoint,
            config.default_detector
        );

        let resize_listener = web_sys::window().map(|window| {
            let link = ctx.link().clone();
            EventListener::new(&window, "resize", move |_| {
                link.send_message(Msg::WindowResized);
            })
        });

        Self {
            file: None,
            preview: PreviewController::new(),
            session: AnalysisSession::new(),
            options: config.initial_options(),
            config,
            image_ref: NodeRef::default(),
            canvas_ref: NodeRef::default(),
            pending_decode: None,
            measure_timeout: None,
            _resize_listener: resize_listener,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::FileSelected(file) => handlers::handle_file_selected(self, file),
            Msg::PreviewDecoded(generation, result) => {
                handlers::handle_preview_decoded(self, ctx, generation, result)
            }
            Msg::LayoutSettled(generation) => handlers::handle_layout_settled(self, generation),
            Msg::WindowResized => handlers::handle_window_resized(self),

            Msg::SetIncludeRace(include_race) => {
                self.options.include_race = include_race;
                true
            }
            Msg::SetDetector(detector) => {
                self.options.detector = detector;
                true
            }

            Msg::Analyze => handlers::handle_analyze(self, ctx),
            Msg::AnalysisFinished(seq, outcome) => {
                handlers::handle_analysis_finished(self, seq, outcome)
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { render_header() }

                <main class="main-content">
                    { render_upload_section(self, ctx) }
                    { render_preview_area(self) }
                    { render_properties_panel(self) }
                    { render_results_panel(self) }
                </main>

                { render_footer() }
            </div>
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        // the new object URL is on the <img> only after this render
        if let Some(generation) = self.pending_decode.take() {
            handlers::start_decode(self, ctx, generation);
        }
    }
}

impl Model {
    pub(crate) fn schedule_decode(&mut self, generation: Generation) {
        self.pending_decode = Some(generation);
    }

    /// Replacing the handle drops (and cancels) the previous timeout.
    pub(crate) fn set_measure_timeout(&mut self, timeout: Option<Timeout>) {
        self.measure_timeout = timeout;
    }
}
