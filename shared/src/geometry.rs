use serde::{Deserialize, Serialize};

use crate::api::Face;

pub const OVERLAY_STROKE: &str = "#667eea";
pub const OVERLAY_LINE_WIDTH: f64 = 3.0;
pub const OVERLAY_FONT: &str = "14px Inter";
const LABEL_OFFSET: f64 = 6.0;
const LABEL_MIN_Y: f64 = 14.0;

/// Axis-aligned face rectangle. Natural pixels on the wire, display pixels
/// after [`map_box`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceBox {
    pub x: f64,
    pub y: f64,
    #[serde(alias = "width")]
    pub w: f64,
    #[serde(alias = "height")]
    pub h: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True unless both sides are finite and strictly positive.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }
}

/// Decoded size of the preview image next to its laid-out size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PreviewGeometry {
    pub natural: Size,
    pub display: Size,
}

impl PreviewGeometry {
    pub fn scale(&self) -> Option<(f64, f64)> {
        if self.natural.is_degenerate() {
            return None;
        }
        Some((
            self.display.width / self.natural.width,
            self.display.height / self.natural.height,
        ))
    }
}

pub fn map_box(natural: &FaceBox, preview: &PreviewGeometry) -> Option<FaceBox> {
    let (scale_x, scale_y) = preview.scale()?;
    Some(FaceBox {
        x: natural.x * scale_x,
        y: natural.y * scale_y,
        w: natural.w * scale_x,
        h: natural.h * scale_y,
    })
}

/// One rectangle plus caption, ready to stroke onto the overlay canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBox {
    pub rect: FaceBox,
    pub label: String,
    pub label_x: f64,
    pub label_y: f64,
}

impl OverlayBox {
    fn new(rect: FaceBox, label: String) -> Self {
        Self {
            label_x: rect.x + LABEL_OFFSET,
            label_y: (rect.y - LABEL_OFFSET).max(LABEL_MIN_Y),
            rect,
            label,
        }
    }
}

/// Natural-space box with its caption, kept so the overlay can be redrawn
/// when the preview is re-laid out.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceMark {
    pub label: String,
    pub bbox: FaceBox,
}

impl FaceMark {
    pub fn from_faces(faces: &[Face]) -> Vec<FaceMark> {
        faces
            .iter()
            .filter_map(|face| {
                face.bbox.map(|bbox| FaceMark {
                    label: face.label(),
                    bbox,
                })
            })
            .collect()
    }
}

/// Maps every mark into display space. Empty when the preview has no usable
/// natural size, so nothing is drawn.
pub fn layout_overlay(marks: &[FaceMark], preview: Option<&PreviewGeometry>) -> Vec<OverlayBox> {
    let Some(preview) = preview else {
        return Vec::new();
    };
    marks
        .iter()
        .filter_map(|mark| {
            map_box(&mark.bbox, preview).map(|rect| OverlayBox::new(rect, mark.label.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preview(nw: f64, nh: f64, dw: f64, dh: f64) -> PreviewGeometry {
        PreviewGeometry {
            natural: Size::new(nw, nh),
            display: Size::new(dw, dh),
        }
    }

    const BOX: FaceBox = FaceBox {
        x: 100.0,
        y: 40.0,
        w: 200.0,
        h: 80.0,
    };

    #[test]
    fn scales_each_axis_independently() {
        let mapped = map_box(&BOX, &preview(1000.0, 400.0, 500.0, 100.0)).unwrap();
        assert_eq!(
            mapped,
            FaceBox {
                x: 50.0,
                y: 10.0,
                w: 100.0,
                h: 20.0
            }
        );
    }

    #[test]
    fn scaling_display_scales_output() {
        let base = map_box(&BOX, &preview(800.0, 600.0, 400.0, 300.0)).unwrap();
        let k = 3.0;
        let scaled = map_box(&BOX, &preview(800.0, 600.0, 400.0 * k, 300.0 * k)).unwrap();

        assert!((scaled.x - base.x * k).abs() < 1e-9);
        assert!((scaled.y - base.y * k).abs() < 1e-9);
        assert!((scaled.w - base.w * k).abs() < 1e-9);
        assert!((scaled.h - base.h * k).abs() < 1e-9);
    }

    #[test]
    fn identity_when_not_scaled() {
        assert_eq!(map_box(&BOX, &preview(640.0, 480.0, 640.0, 480.0)), Some(BOX));
    }

    #[test]
    fn zero_natural_size_maps_nothing() {
        assert_eq!(map_box(&BOX, &preview(0.0, 480.0, 640.0, 480.0)), None);
        assert_eq!(map_box(&BOX, &preview(640.0, 0.0, 640.0, 480.0)), None);
        assert_eq!(map_box(&BOX, &preview(f64::NAN, 10.0, 640.0, 480.0)), None);

        let marks = vec![FaceMark {
            label: "Face 1".into(),
            bbox: BOX,
        }];
        assert!(layout_overlay(&marks, Some(&preview(0.0, 0.0, 320.0, 240.0))).is_empty());
        assert!(layout_overlay(&marks, None).is_empty());
    }

    #[test]
    fn label_sits_above_box_but_stays_on_canvas() {
        let marks = vec![
            FaceMark {
                label: "Face 1".into(),
                bbox: BOX,
            },
            FaceMark {
                label: "Face 2".into(),
                bbox: FaceBox {
                    x: 0.0,
                    y: 4.0,
                    w: 10.0,
                    h: 10.0,
                },
            },
        ];
        let boxes = layout_overlay(&marks, Some(&preview(100.0, 100.0, 100.0, 100.0)));

        assert_eq!(boxes.len(), 2);
        assert_eq!((boxes[0].label_x, boxes[0].label_y), (106.0, 34.0));
        assert_eq!((boxes[1].label_x, boxes[1].label_y), (6.0, 14.0));
        assert_eq!(boxes[1].label, "Face 2");
    }

    #[test]
    fn faces_without_box_are_not_marked() {
        let faces = vec![
            Face {
                face_id: Some(1),
                bbox: Some(BOX),
                ..Face::default()
            },
            Face {
                face_id: Some(2),
                ..Face::default()
            },
        ];
        let marks = FaceMark::from_faces(&faces);
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].label, "Face 1");
    }
}
