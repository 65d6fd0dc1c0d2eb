// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Request orchestration: decode -> grayscale -> locate -> preprocess ->
// classify.
//
// Every stage returns a `Result`; the first failure ends the run and is
// handed back to the caller unchanged. A run with no detected face ends in
// `Prediction::NoFace` without touching the classifier.

use std::sync::Arc;

use facemood_core::error::Result;
use facemood_core::types::{Prediction, RegionSelection};
use tracing::{debug, info, instrument};

use crate::classify::{self, Classifier};
use crate::image::color::ColorImage;
use crate::image::decode;
use crate::locate::FaceLocator;
use crate::preprocess;

/// The inference pipeline with its injected capabilities.
///
/// Construct once at startup and share (it is cheap to clone). Runs are
/// synchronous and CPU-bound; async callers should move them onto a blocking
/// thread.
#[derive(Clone)]
pub struct EmotionPipeline {
    locator: Arc<dyn FaceLocator>,
    classifier: Arc<dyn Classifier>,
    selection: RegionSelection,
}

impl EmotionPipeline {
    /// Build a pipeline that classifies the first region the locator returns.
    pub fn new(locator: Arc<dyn FaceLocator>, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            locator,
            classifier,
            selection: RegionSelection::default(),
        }
    }

    /// Change which region is classified when several faces are found.
    pub fn with_selection(mut self, selection: RegionSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Run the full pipeline on a base64 (optionally `data:` URI) payload.
    #[instrument(skip_all, fields(payload_len = payload.len()))]
    pub fn run(&self, payload: &str) -> Result<Prediction> {
        let color = decode::decode(payload)?;
        self.run_image(&color)
    }

    /// Run the pipeline from an already-decoded color image.
    #[instrument(skip_all, fields(width = color.width(), height = color.height()))]
    pub fn run_image(&self, color: &ColorImage) -> Result<Prediction> {
        let gray = color.to_gray();

        let regions = self.locator.locate(&gray);
        debug!(faces = regions.len(), "Face search complete");

        let Some(region) = self.selection.select(&regions) else {
            info!("No face detected");
            return Ok(Prediction::NoFace);
        };
        if regions.len() > 1 {
            debug!(
                faces = regions.len(),
                selection = ?self.selection,
                region = %region,
                "Multiple faces found, classifying one"
            );
        }

        let tensor = preprocess::preprocess(&gray, region)?;
        let label = classify::classify(self.classifier.as_ref(), &tensor)?;

        info!(emotion = %label, region = %region, "Face classified");
        Ok(Prediction::Emotion(label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use facemood_core::FacemoodError;
    use facemood_core::types::{EmotionLabel, FaceRegion};
    use image::{DynamicImage, GrayImage, ImageFormat, Rgb, RgbImage};
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    use crate::preprocess::FaceTensor;

    /// Returns the same regions for every image.
    struct FixedLocator(Vec<FaceRegion>);

    impl FaceLocator for FixedLocator {
        fn locate(&self, _gray: &GrayImage) -> Vec<FaceRegion> {
            self.0.clone()
        }
    }

    /// Counts calls, remembers the mean of each tensor it sees, and answers
    /// with fixed scores.
    struct RecordingClassifier {
        calls: AtomicUsize,
        means: Mutex<Vec<f32>>,
        scores: Vec<f32>,
    }

    impl RecordingClassifier {
        fn new(scores: Vec<f32>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                means: Mutex::new(Vec::new()),
                scores,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Classifier for RecordingClassifier {
        fn predict(&self, tensor: &FaceTensor) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let values = tensor.as_slice();
            let mean = values.iter().sum::<f32>() / values.len() as f32;
            self.means.lock().unwrap().push(mean);
            Ok(self.scores.clone())
        }
    }

    const HAPPY: [f32; 7] = [0.0, 0.0, 0.0, 0.9, 0.1, 0.0, 0.0];

    fn encode_png(image: RgbImage) -> String {
        let mut buffer = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut std::io::Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        BASE64.encode(buffer)
    }

    /// 100x60 image: black left half, white right half.
    fn split_image() -> RgbImage {
        let mut img = RgbImage::from_pixel(100, 60, Rgb([0, 0, 0]));
        draw_filled_rect_mut(&mut img, Rect::at(50, 0).of_size(50, 60), Rgb([255, 255, 255]));
        img
    }

    fn pipeline(
        regions: Vec<FaceRegion>,
        scores: Vec<f32>,
    ) -> (EmotionPipeline, Arc<RecordingClassifier>) {
        let classifier = Arc::new(RecordingClassifier::new(scores));
        let pipeline = EmotionPipeline::new(Arc::new(FixedLocator(regions)), classifier.clone());
        (pipeline, classifier)
    }

    #[test]
    fn face_found_returns_label() {
        let (pipeline, classifier) = pipeline(vec![FaceRegion::new(10, 10, 30, 30)], HAPPY.to_vec());
        let prediction = pipeline.run(&encode_png(split_image())).unwrap();

        assert_eq!(prediction, Prediction::Emotion(EmotionLabel::Happy));
        assert_eq!(classifier.calls(), 1);
    }

    #[test]
    fn no_face_skips_classifier() {
        let (pipeline, classifier) = pipeline(Vec::new(), HAPPY.to_vec());
        let uniform = RgbImage::from_pixel(64, 64, Rgb([128, 128, 128]));
        let prediction = pipeline.run(&encode_png(uniform)).unwrap();

        assert_eq!(prediction, Prediction::NoFace);
        assert_eq!(prediction.as_str(), "No face detected");
        assert_eq!(classifier.calls(), 0);
    }

    #[test]
    fn first_region_is_classified_by_default() {
        let dark = FaceRegion::new(0, 0, 40, 40);
        let bright = FaceRegion::new(55, 5, 45, 50);
        let (pipeline, classifier) = pipeline(vec![dark, bright], HAPPY.to_vec());

        pipeline.run(&encode_png(split_image())).unwrap();

        let means = classifier.means.lock().unwrap();
        assert_eq!(means.len(), 1, "only one face is classified");
        assert!(means[0] < 0.01, "expected the dark region, mean {}", means[0]);
    }

    #[test]
    fn largest_selection_picks_biggest_region() {
        let dark = FaceRegion::new(0, 0, 40, 40);
        let bright = FaceRegion::new(55, 5, 45, 50);
        let (pipeline, classifier) = pipeline(vec![dark, bright], HAPPY.to_vec());
        let pipeline = pipeline.with_selection(RegionSelection::Largest);

        pipeline.run(&encode_png(split_image())).unwrap();

        let means = classifier.means.lock().unwrap();
        assert!(means[0] > 0.99, "expected the bright region, mean {}", means[0]);
    }

    #[test]
    fn data_uri_payload_is_accepted() {
        let (pipeline, _) = pipeline(vec![FaceRegion::new(0, 0, 20, 20)], HAPPY.to_vec());
        let payload = format!("data:image/png;base64,{}", encode_png(split_image()));
        assert_eq!(
            pipeline.run(&payload).unwrap(),
            Prediction::Emotion(EmotionLabel::Happy)
        );
    }

    #[test]
    fn malformed_payload_never_reaches_classifier() {
        let (pipeline, classifier) = pipeline(vec![FaceRegion::new(0, 0, 20, 20)], HAPPY.to_vec());
        let err = pipeline.run("not-base64!!").unwrap_err();

        assert!(matches!(err, FacemoodError::Decode(_)), "got {err:?}");
        assert_eq!(classifier.calls(), 0);
    }

    #[test]
    fn out_of_bounds_region_is_preprocess_error() {
        let (pipeline, classifier) =
            pipeline(vec![FaceRegion::new(90, 50, 20, 20)], HAPPY.to_vec());
        let err = pipeline.run(&encode_png(split_image())).unwrap_err();

        assert!(matches!(err, FacemoodError::Preprocess(_)), "got {err:?}");
        assert_eq!(classifier.calls(), 0);
    }

    #[test]
    fn bad_classifier_output_is_classification_error() {
        let (pipeline, _) = pipeline(vec![FaceRegion::new(0, 0, 20, 20)], vec![1.0, 0.0]);
        let err = pipeline.run(&encode_png(split_image())).unwrap_err();
        assert!(matches!(err, FacemoodError::Classification(_)), "got {err:?}");
    }
}
