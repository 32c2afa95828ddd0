use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::error::AnalysisError;
use crate::geometry::FaceBox;

pub const FIELD_IMAGE: &str = "image";
pub const FIELD_INCLUDE_RACE: &str = "include_race";
pub const FIELD_DETECTOR: &str = "detector";

/// Label → percentage, in the order the service sent them.
pub type Scores = Map<String, Value>;

/// Face-detection backends the analysis service understands.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Detector {
    Opencv,
    Ssd,
    Dlib,
    Mtcnn,
    #[default]
    Retinaface,
    Mediapipe,
    Yolov8,
    Yunet,
    Centerface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalysisOptions {
    pub include_race: bool,
    pub detector: Detector,
}

impl AnalysisOptions {
    /// Text fields sent next to the image part, in wire order.
    pub fn form_fields(&self) -> [(&'static str, String); 2] {
        [
            (FIELD_INCLUDE_RACE, self.include_race.to_string()),
            (FIELD_DETECTOR, self.detector.to_string()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResponse {
    #[serde(deserialize_with = "lenient")]
    pub ok: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub detector: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub properties: Option<ImageProperties>,
    #[serde(deserialize_with = "lenient_seq")]
    pub faces: Option<Vec<Face>>,
    #[serde(deserialize_with = "lenient")]
    pub error: Option<String>,
}

impl AnalysisResponse {
    pub fn faces(&self) -> &[Face] {
        self.faces.as_deref().unwrap_or_default()
    }
}

/// Maps a completed HTTP exchange to the outcome of the attempt.
///
/// Error statuses still carry a JSON body whose `error` becomes the
/// rejection message. A body that is not JSON counts as a failed request,
/// whatever the status.
pub fn interpret_response(
    status: u16,
    ok: bool,
    body: &str,
) -> Result<AnalysisResponse, AnalysisError> {
    let parsed: AnalysisResponse = serde_json::from_str(body)
        .map_err(|e| AnalysisError::MalformedBody(format!("HTTP {}: {}", status, e)))?;

    if !ok {
        return Err(AnalysisError::Rejected {
            status,
            message: parsed.error,
        });
    }
    Ok(parsed)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageProperties {
    #[serde(deserialize_with = "lenient")]
    pub dimensions: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub color_mode: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub file_size_kb: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub brightness: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub contrast: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub resolution_mp: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub aspect_ratio: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Face {
    #[serde(deserialize_with = "lenient")]
    pub face_id: Option<i64>,
    #[serde(rename = "box", deserialize_with = "lenient")]
    pub bbox: Option<FaceBox>,
    #[serde(deserialize_with = "lenient")]
    pub age: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub gender: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub gender_confidence: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub emotions: Option<Scores>,
    #[serde(deserialize_with = "lenient")]
    pub dominant_emotion: Option<String>,
    /// Only sent when race analysis was requested; presence alone switches
    /// the race section on.
    #[serde(deserialize_with = "lenient")]
    pub race: Option<Scores>,
    #[serde(deserialize_with = "lenient")]
    pub dominant_race: Option<String>,
}

impl Face {
    pub fn label(&self) -> String {
        match self.face_id {
            Some(id) => format!("Face {}", id),
            None => "Face".to_string(),
        }
    }
}

/// A field of the wrong JSON type decodes as absent instead of failing the
/// whole payload.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            log::debug!("Ignoring malformed response field: {}", e);
            Ok(None)
        }
    }
}

fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| match serde_json::from_value(item) {
                    Ok(parsed) => Some(parsed),
                    Err(e) => {
                        log::warn!("Skipping malformed entry: {}", e);
                        None
                    }
                })
                .collect(),
        )),
        Value::Null => Ok(None),
        other => {
            log::debug!("Expected an array, got {}", other);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_full_service_payload() {
        let body = json!({
            "ok": true,
            "detector": "retinaface",
            "properties": {
                "dimensions": "640 × 480 px",
                "color_mode": "RGB",
                "file_size_kb": 900.0,
                "brightness": 48.12,
                "contrast": 21.5,
                "aspect_ratio": 1.3333,
                "resolution_mp": 0.307
            },
            "faces": [{
                "face_id": 1,
                "box": {"x": 10, "y": 20, "w": 100, "h": 120},
                "age": 31,
                "gender": "Woman",
                "gender_confidence": 97.3,
                "emotions": {"sad": 1.0, "happy": 90.0, "angry": 9.0},
                "dominant_emotion": "happy"
            }]
        });

        let response: AnalysisResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.detector.as_deref(), Some("retinaface"));
        assert_eq!(response.faces().len(), 1);

        let face = &response.faces()[0];
        assert_eq!(face.face_id, Some(1));
        assert_eq!(
            face.bbox,
            Some(FaceBox {
                x: 10.0,
                y: 20.0,
                w: 100.0,
                h: 120.0
            })
        );
        assert!(face.race.is_none());

        let keys: Vec<&str> = face
            .emotions
            .as_ref()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["sad", "happy", "angry"]);
    }

    #[test]
    fn wrong_types_degrade_to_absent() {
        let body = json!({
            "detector": 42,
            "properties": {"file_size_kb": "big", "color_mode": "L"},
            "faces": [
                {"face_id": "one", "age": "old", "race": "n/a"},
                17
            ]
        });

        let response: AnalysisResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.detector, None);

        let props = response.properties.as_ref().unwrap();
        assert_eq!(props.file_size_kb, None);
        assert_eq!(props.color_mode.as_deref(), Some("L"));

        assert_eq!(response.faces().len(), 1);
        let face = &response.faces()[0];
        assert_eq!(face.face_id, None);
        assert_eq!(face.age, None);
        assert_eq!(face.race, None);
    }

    #[test]
    fn null_race_is_absent_but_empty_race_is_present() {
        let absent: Face = serde_json::from_value(json!({"face_id": 1, "race": null})).unwrap();
        let empty: Face = serde_json::from_value(json!({"face_id": 2, "race": {}})).unwrap();

        assert!(absent.race.is_none());
        assert_eq!(empty.race, Some(Scores::new()));
    }

    #[test]
    fn error_body_only() {
        let response: AnalysisResponse =
            serde_json::from_str(r#"{"error": "No selected file."}"#).unwrap();
        assert_eq!(response.error.as_deref(), Some("No selected file."));
        assert!(response.faces().is_empty());
        assert!(response.properties.is_none());
    }

    #[test]
    fn rejection_carries_service_message() {
        let err = interpret_response(400, false, r#"{"error": "no face detected"}"#).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Rejected {
                status: 400,
                message: Some("no face detected".into())
            }
        );
        assert_eq!(err.to_string(), "no face detected");
    }

    #[test]
    fn rejection_without_message_uses_fallback() {
        let err = interpret_response(500, false, "{}").unwrap_err();
        assert!(matches!(err, AnalysisError::Rejected { status: 500, message: None }));
        assert_eq!(err.to_string(), crate::error::GENERIC_ANALYSIS_ERROR);
    }

    #[test]
    fn non_json_body_is_a_network_failure() {
        for (status, ok) in [(502, false), (200, true)] {
            let err = interpret_response(status, ok, "<html>Bad Gateway</html>").unwrap_err();
            assert!(matches!(err, AnalysisError::MalformedBody(_)));
            assert_eq!(err.to_string(), crate::error::NETWORK_ERROR);
        }
    }

    #[test]
    fn success_body_parses() {
        let body = r#"{"ok": true, "detector": "ssd", "faces": [{"face_id": 1, "age": 31}]}"#;
        let response = interpret_response(200, true, body).unwrap();
        assert_eq!(response.detector.as_deref(), Some("ssd"));
        assert_eq!(response.faces().len(), 1);
        assert_eq!(response.faces()[0].age, Some(31.0));
    }

    #[test]
    fn form_fields_use_literal_strings() {
        let options = AnalysisOptions {
            include_race: true,
            detector: Detector::Yolov8,
        };
        assert_eq!(
            options.form_fields(),
            [
                ("include_race", "true".to_string()),
                ("detector", "yolov8".to_string())
            ]
        );

        let defaults = AnalysisOptions::default();
        assert_eq!(defaults.form_fields()[0].1, "false");
        assert_eq!(defaults.form_fields()[1].1, "retinaface");
    }

    #[test]
    fn detector_names_round_trip_through_strum() {
        for detector in Detector::iter() {
            assert_eq!(Detector::from_str(detector.as_ref()).unwrap(), detector);
        }
        assert!(Detector::from_str("haar").is_err());
    }
}
