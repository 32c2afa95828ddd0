//! View models for the result widgets.
//!
//! Everything here is a pure function of its input: the frontend turns these
//! structs into markup, and rendering the same face twice yields equal values.

use serde_json::Value;
use std::fmt::Display;

use crate::api::{Face, ImageProperties, Scores};

pub const PLACEHOLDER: &str = "-";
pub const EMOTIONS_TITLE: &str = "Emotions";
pub const RACE_TITLE: &str = "Race (model output)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricTile {
    pub label: String,
    pub value: String,
}

pub fn metric_tile<T: Display>(label: &str, value: Option<T>) -> MetricTile {
    MetricTile {
        label: label.to_string(),
        value: value.map_or_else(|| PLACEHOLDER.to_string(), |v| v.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PercentageBar {
    pub label: String,
    /// Always within `0.0..=100.0`.
    pub percent: f64,
}

impl PercentageBar {
    pub fn text(&self) -> String {
        format!("{:.1}%", self.percent)
    }

    pub fn width_style(&self) -> String {
        format!("width: {}%", self.percent)
    }
}

pub fn percentage_bar(label: &str, value: &Value) -> PercentageBar {
    PercentageBar {
        label: label.to_string(),
        percent: clamp_percentage(coerce_number(value)),
    }
}

/// Numeric reading of a JSON score. Anything that is not a number or a
/// numeric string reads as NaN. Strings never read as infinite, so words
/// like `inf` do not fill a bar.
pub fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) if s.trim().is_empty() => 0.0,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .unwrap_or(f64::NAN),
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null => 0.0,
        _ => f64::NAN,
    }
}

pub fn clamp_percentage(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    // + 0.0 turns -0.0 into 0.0 so it never prints as "-0.0%"
    value.clamp(0.0, 100.0) + 0.0
}

fn score_bars(scores: &Scores) -> Vec<PercentageBar> {
    scores
        .iter()
        .map(|(label, value)| percentage_bar(label, value))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistributionPanel {
    pub title: &'static str,
    pub bars: Vec<PercentageBar>,
    pub dominant: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FacePanel {
    pub badge: String,
    pub age: String,
    pub gender: String,
    pub emotions: DistributionPanel,
    pub race: Option<DistributionPanel>,
}

pub fn face_panel(face: &Face) -> FacePanel {
    let gender = match (&face.gender, face.gender_confidence) {
        (Some(gender), Some(confidence)) => {
            format!("{} ({:.1}%)", gender, clamp_percentage(confidence))
        }
        (Some(gender), None) => gender.clone(),
        (None, _) => PLACEHOLDER.to_string(),
    };

    FacePanel {
        badge: format!(
            "Face #{}",
            face.face_id.map_or_else(|| PLACEHOLDER.to_string(), |id| id.to_string())
        ),
        age: face.age.map_or_else(|| PLACEHOLDER.to_string(), |age| age.to_string()),
        gender,
        emotions: DistributionPanel {
            title: EMOTIONS_TITLE,
            bars: face.emotions.as_ref().map(score_bars).unwrap_or_default(),
            dominant: or_placeholder(face.dominant_emotion.as_deref()),
        },
        race: face.race.as_ref().map(|race| DistributionPanel {
            title: RACE_TITLE,
            bars: score_bars(race),
            dominant: or_placeholder(face.dominant_race.as_deref()),
        }),
    }
}

pub fn property_tiles(properties: Option<&ImageProperties>) -> Vec<MetricTile> {
    let empty = ImageProperties::default();
    let p = properties.unwrap_or(&empty);

    vec![
        metric_tile("Dimensions", p.dimensions.as_deref()),
        metric_tile("Color Mode", p.color_mode.as_deref()),
        metric_tile("File Size", p.file_size_kb.map(|kb| format!("{} KB", kb))),
        metric_tile("Brightness", p.brightness.map(|v| format!("{}%", v))),
        metric_tile("Contrast", p.contrast.map(|v| format!("{}%", v))),
        metric_tile("Resolution", p.resolution_mp.map(|mp| format!("{} MP", mp))),
        metric_tile("Aspect Ratio", p.aspect_ratio),
    ]
}

fn or_placeholder(value: Option<&str>) -> String {
    value.unwrap_or(PLACEHOLDER).to_string()
}
