use serde::Deserialize;
use std::str::FromStr;

use crate::api::{AnalysisOptions, Detector};
use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "/analyze";

/// Client settings, read once at page load.
///
/// The host page may embed a JSON object (see [`ClientConfig::from_json`]);
/// URL query parameters override it field by field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoint: String,
    pub default_detector: Detector,
    pub include_race: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            default_detector: Detector::default(),
            include_race: false,
        }
    }
}

impl ClientConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Applies `endpoint`, `detector` and `race` query parameters. Unknown
    /// keys are ignored; a bad value is logged and leaves the field as is.
    /// The endpoint may only be overridden with a path on the page's own
    /// origin.
    pub fn with_overrides<'a, I>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in params {
            match key {
                "endpoint" => match same_origin_path(value) {
                    Some(path) => self.endpoint = path.to_string(),
                    None => log::warn!("Ignoring endpoint override {:?}", value),
                },
                "detector" => match parse_detector(value) {
                    Ok(detector) => self.default_detector = detector,
                    Err(e) => log::warn!("{}", e),
                },
                "race" => self.include_race = matches!(value, "1" | "true" | "yes" | "on"),
                _ => {}
            }
        }
        self
    }

    pub fn initial_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            include_race: self.include_race,
            detector: self.default_detector,
        }
    }
}

/// `value` trimmed, if it is an absolute path on the current origin.
/// Protocol-relative `//host` forms and full URLs are refused.
pub fn same_origin_path(value: &str) -> Option<&str> {
    let path = value.trim();
    let rest = path.strip_prefix('/')?;
    if rest.starts_with('/') || rest.starts_with('\\') {
        return None;
    }
    Some(path)
}

pub fn parse_detector(value: &str) -> Result<Detector, ConfigError> {
    Detector::from_str(value.trim()).map_err(|_| ConfigError::UnknownDetector(value.to_string()))
}
