// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the facemood inference pipeline.

use serde::{Deserialize, Serialize};

/// Result string reported when the locator finds no face.
pub const NO_FACE_DETECTED: &str = "No face detected";

/// Coarse emotion classes produced by the classifier.
///
/// The discriminants are the classifier's output indices. The order is fixed
/// by the trained model and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmotionLabel {
    Angry = 0,
    Disgust = 1,
    Fear = 2,
    Happy = 3,
    Neutral = 4,
    Sad = 5,
    Surprise = 6,
}

impl EmotionLabel {
    /// All labels in classifier index order.
    pub const ALL: [EmotionLabel; 7] = [
        EmotionLabel::Angry,
        EmotionLabel::Disgust,
        EmotionLabel::Fear,
        EmotionLabel::Happy,
        EmotionLabel::Neutral,
        EmotionLabel::Sad,
        EmotionLabel::Surprise,
    ];

    /// Number of classes the classifier must score.
    pub const COUNT: usize = Self::ALL.len();

    /// Map a classifier output index to its label.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Classifier output index of this label.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label as returned over the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            EmotionLabel::Angry => "Angry",
            EmotionLabel::Disgust => "Disgust",
            EmotionLabel::Fear => "Fear",
            EmotionLabel::Happy => "Happy",
            EmotionLabel::Neutral => "Neutral",
            EmotionLabel::Sad => "Sad",
            EmotionLabel::Surprise => "Surprise",
        }
    }
}

impl std::fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axis-aligned face bounding box in grayscale image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FaceRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Clip a detector rectangle (which may start at negative coordinates or
    /// overhang the image) to an `image_width` x `image_height` image.
    ///
    /// Returns `None` when nothing of the rectangle remains inside the image.
    pub fn clipped(
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        image_width: u32,
        image_height: u32,
    ) -> Option<Self> {
        let left = x.max(0);
        let top = y.max(0);
        let right = x.saturating_add(width).min(i64::from(image_width));
        let bottom = y.saturating_add(height).min(i64::from(image_height));

        if right <= left || bottom <= top {
            return None;
        }

        Some(Self {
            x: u32::try_from(left).ok()?,
            y: u32::try_from(top).ok()?,
            width: u32::try_from(right - left).ok()?,
            height: u32::try_from(bottom - top).ok()?,
        })
    }

    /// Area in pixels.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Whether the region is non-empty and lies entirely inside an image of
    /// the given dimensions.
    pub fn fits_within(&self, image_width: u32, image_height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && u64::from(self.x) + u64::from(self.width) <= u64::from(image_width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(image_height)
    }
}

impl std::fmt::Display for FaceRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Which detected face the pipeline classifies when the locator returns
/// several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionSelection {
    /// The first region in the order the locator returned them. Detector
    /// output order is not guaranteed, so this is only as stable as the
    /// backend.
    #[default]
    First,
    /// The region with the largest area; equal areas resolve to the one
    /// returned earliest.
    Largest,
}

impl RegionSelection {
    /// Pick one region from the locator output, or `None` if it is empty.
    pub fn select(self, regions: &[FaceRegion]) -> Option<FaceRegion> {
        match self {
            RegionSelection::First => regions.first().copied(),
            RegionSelection::Largest => regions.iter().copied().reduce(|best, candidate| {
                if candidate.area() > best.area() {
                    candidate
                } else {
                    best
                }
            }),
        }
    }
}

/// Terminal outcome of a successful pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prediction {
    /// A face was found and classified.
    Emotion(EmotionLabel),
    /// The locator found no face; the classifier was not consulted.
    NoFace,
}

impl Prediction {
    /// Value reported in the `emotion` field of the response.
    pub fn as_str(&self) -> &'static str {
        match self {
            Prediction::Emotion(label) => label.as_str(),
            Prediction::NoFace => NO_FACE_DETECTED,
        }
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_table_order_is_fixed() {
        let names: Vec<&str> = EmotionLabel::ALL.iter().map(|l| l.as_str()).collect();
        assert_eq!(
            names,
            ["Angry", "Disgust", "Fear", "Happy", "Neutral", "Sad", "Surprise"]
        );
        for (i, label) in EmotionLabel::ALL.iter().enumerate() {
            assert_eq!(label.index(), i);
            assert_eq!(EmotionLabel::from_index(i), Some(*label));
        }
        assert_eq!(EmotionLabel::from_index(7), None);
    }

    #[test]
    fn clipped_region_inside_image_is_unchanged() {
        let region = FaceRegion::clipped(10, 20, 30, 40, 100, 100).unwrap();
        assert_eq!(region, FaceRegion::new(10, 20, 30, 40));
    }

    #[test]
    fn clipped_region_overhanging_edges() {
        let region = FaceRegion::clipped(-5, -10, 30, 30, 20, 15).unwrap();
        assert_eq!(region, FaceRegion::new(0, 0, 20, 15));
    }

    #[test]
    fn clipped_region_fully_outside_is_dropped() {
        assert_eq!(FaceRegion::clipped(200, 0, 10, 10, 100, 100), None);
        assert_eq!(FaceRegion::clipped(-20, 0, 10, 10, 100, 100), None);
        assert_eq!(FaceRegion::clipped(0, 0, 0, 10, 100, 100), None);
    }

    #[test]
    fn fits_within_checks_every_edge() {
        assert!(FaceRegion::new(0, 0, 10, 10).fits_within(10, 10));
        assert!(!FaceRegion::new(1, 0, 10, 10).fits_within(10, 10));
        assert!(!FaceRegion::new(0, 1, 10, 10).fits_within(10, 10));
        assert!(!FaceRegion::new(0, 0, 0, 10).fits_within(10, 10));
        assert!(!FaceRegion::new(u32::MAX, 0, 10, 10).fits_within(10, 10));
    }

    #[test]
    fn first_selection_keeps_locator_order() {
        let regions = [FaceRegion::new(0, 0, 5, 5), FaceRegion::new(0, 0, 50, 50)];
        assert_eq!(RegionSelection::First.select(&regions), Some(regions[0]));
    }

    #[test]
    fn largest_selection_prefers_area_then_earliest() {
        let regions = [
            FaceRegion::new(0, 0, 5, 5),
            FaceRegion::new(10, 10, 20, 10),
            FaceRegion::new(40, 40, 10, 20),
        ];
        assert_eq!(RegionSelection::Largest.select(&regions), Some(regions[1]));
    }

    #[test]
    fn selection_on_empty_is_none() {
        assert_eq!(RegionSelection::First.select(&[]), None);
        assert_eq!(RegionSelection::Largest.select(&[]), None);
    }

    #[test]
    fn prediction_strings() {
        assert_eq!(Prediction::NoFace.as_str(), "No face detected");
        assert_eq!(Prediction::Emotion(EmotionLabel::Happy).to_string(), "Happy");
    }

    #[test]
    fn region_selection_serde_names() {
        let json = serde_json::to_string(&RegionSelection::Largest).unwrap();
        assert_eq!(json, "\"largest\"");
        let parsed: RegionSelection = serde_json::from_str("\"first\"").unwrap();
        assert_eq!(parsed, RegionSelection::First);
    }
}
