pub mod api;
pub mod config;
pub mod error;
pub mod geometry;
pub mod preview;
pub mod session;
pub mod widgets;

pub use api::{AnalysisOptions, AnalysisResponse, Detector, Face, ImageProperties, Scores};
pub use config::ClientConfig;
pub use error::{AnalysisError, ConfigError, PreviewError};
pub use geometry::{FaceBox, OverlayBox, PreviewGeometry, Size};
pub use preview::{Generation, PreviewController, PreviewPhase};
pub use session::{AnalysisSession, OverlayUpdate, RequestSeq, ResultsContent};
