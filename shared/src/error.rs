pub const GENERIC_ANALYSIS_ERROR: &str = "Error analyzing image.";
pub const NETWORK_ERROR: &str = "Network error while analyzing image.";

/// Terminal failure of a single analysis attempt.
///
/// `Display` yields the text shown in the status region, so the frontend never
/// has to pick a message itself.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// The service answered with a non-success status.
    #[error("{}", .message.as_deref().unwrap_or(GENERIC_ANALYSIS_ERROR))]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    /// The request never completed.
    #[error("Network error while analyzing image.")]
    Network(String),
    /// A response arrived but its body was not JSON.
    #[error("Network error while analyzing image.")]
    MalformedBody(String),
}

impl AnalysisError {
    pub fn detail(&self) -> String {
        match self {
            AnalysisError::Rejected { status, message } => {
                format!("HTTP {}: {}", status, message.as_deref().unwrap_or("<no message>"))
            }
            AnalysisError::Network(detail) => format!("transport: {}", detail),
            AnalysisError::MalformedBody(detail) => format!("unparseable body: {}", detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PreviewError {
    #[error("preview decode failed: {0}")]
    Decode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid client config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown detector: {0}")]
    UnknownDetector(String),
}
