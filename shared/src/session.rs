//! State of the analyze action and the panels it feeds.
//!
//! Each dispatch is tagged with a [`RequestSeq`]. Only a completion carrying
//! the latest sequence number is applied; anything older is dropped without
//! touching the panels. A request also remembers which file selection it
//! was made for, so its boxes are never drawn over a newer image.

use derive_more::{Display, From};

use crate::api::{AnalysisOptions, AnalysisResponse};
use crate::error::AnalysisError;
use crate::geometry::{FaceMark, OverlayBox, PreviewGeometry, layout_overlay};
use crate::widgets::{FacePanel, MetricTile, PLACEHOLDER, face_panel, property_tiles};

pub const NO_FACES_MESSAGE: &str = "No faces detected. Try a clearer, front-facing photo.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, From)]
pub struct RequestSeq(u64);

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultsContent {
    #[default]
    Blank,
    NoFaces,
    Faces(Vec<FacePanel>),
}

/// What the overlay canvas should do after a completion.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayUpdate {
    Untouched,
    Clear,
    Draw(Vec<OverlayBox>),
}

#[derive(Debug, Default)]
pub struct AnalysisSession {
    latest: RequestSeq,
    in_flight: Option<RequestSeq>,
    selection: u64,
    request_selection: u64,
    trigger_enabled: bool,
    status: String,
    properties: Option<Vec<MetricTile>>,
    results_visible: bool,
    results: ResultsContent,
    marks: Vec<FaceMark>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new file (or none) was picked. Results stay on screen until the
    /// next analysis; only the boxes are forgotten because the overlay is
    /// being reset for the new image.
    pub fn file_selected(&mut self, present: bool) {
        self.trigger_enabled = present;
        if present {
            self.selection += 1;
            self.marks.clear();
        }
    }

    pub fn clear_status(&mut self) {
        self.status.clear();
    }

    /// Starts an attempt. Returns `None` while the trigger is disabled.
    pub fn begin(&mut self, options: &AnalysisOptions) -> Option<RequestSeq> {
        if !self.trigger_enabled {
            log::debug!("Analyze trigger is disabled, ignoring request");
            return None;
        }

        self.latest = RequestSeq(self.latest.0 + 1);
        self.in_flight = Some(self.latest);
        self.request_selection = self.selection;
        self.trigger_enabled = false;
        self.status = format!("Analyzing… (detector: {})", options.detector);
        Some(self.latest)
    }

    /// Applies the outcome of request `seq`.
    ///
    /// Returns `None` when a newer request has been dispatched since, in which
    /// case nothing changed.
    pub fn complete(
        &mut self,
        seq: RequestSeq,
        outcome: Result<AnalysisResponse, AnalysisError>,
        preview: Option<&PreviewGeometry>,
    ) -> Option<OverlayUpdate> {
        if seq != self.latest {
            log::debug!("Discarding response {} superseded by {}", seq, self.latest);
            return None;
        }
        self.in_flight = None;
        self.trigger_enabled = true;

        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                log::warn!("Analysis {} failed: {}", seq, err.detail());
                self.status = err.to_string();
                if matches!(err, AnalysisError::Rejected { .. }) {
                    self.results = ResultsContent::Blank;
                }
                return Some(OverlayUpdate::Untouched);
            }
        };

        self.status = format!(
            "Detector: {}",
            response.detector.as_deref().unwrap_or(PLACEHOLDER)
        );
        self.properties = Some(property_tiles(response.properties.as_ref()));
        self.results_visible = true;

        let faces = response.faces();
        if faces.is_empty() {
            self.results = ResultsContent::NoFaces;
            self.marks.clear();
            return Some(OverlayUpdate::Clear);
        }

        log::info!("Rendering {} face(s) from request {}", faces.len(), seq);
        self.results = ResultsContent::Faces(faces.iter().map(face_panel).collect());
        if self.request_selection != self.selection {
            log::debug!("Request {} was made for a previous image, not drawing boxes", seq);
            self.marks.clear();
            return Some(OverlayUpdate::Untouched);
        }
        self.marks = FaceMark::from_faces(faces);
        Some(OverlayUpdate::Draw(layout_overlay(&self.marks, preview)))
    }

    /// Boxes of the current analysis laid out for `preview`, for redraws
    /// after the preview changes size.
    pub fn overlay(&self, preview: Option<&PreviewGeometry>) -> Vec<OverlayBox> {
        layout_overlay(&self.marks, preview)
    }

    pub fn trigger_enabled(&self) -> bool {
        self.trigger_enabled
    }

    pub fn in_flight(&self) -> Option<RequestSeq> {
        self.in_flight
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Tiles of the properties panel; `None` while the panel is hidden.
    pub fn properties(&self) -> Option<&[MetricTile]> {
        self.properties.as_deref()
    }

    pub fn results_visible(&self) -> bool {
        self.results_visible
    }

    pub fn results(&self) -> &ResultsContent {
        &self.results
    }
}
