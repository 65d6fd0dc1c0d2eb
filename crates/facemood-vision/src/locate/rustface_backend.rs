// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Face locator backed by the `rustface` crate (SeetaFace frontal cascade).

use std::path::Path;

use facemood_core::config::DetectorConfig;
use facemood_core::error::{FacemoodError, Result};
use facemood_core::types::FaceRegion;
use image::GrayImage;
use tracing::{debug, info, instrument};

use super::FaceLocator;

/// SeetaFace cascade detector.
///
/// The model is parsed once; each `locate` call builds a fresh detector from
/// a clone of it, because `rustface` detectors need `&mut self` to run and
/// are not shareable between threads.
pub struct RustfaceLocator {
    model: rustface::Model,
    config: DetectorConfig,
}

impl RustfaceLocator {
    /// Load a SeetaFace model file (e.g. `seeta_fd_frontal_v1.0.bin`).
    ///
    /// # Errors
    ///
    /// Returns [`FacemoodError::Config`] for detector settings `rustface`
    /// would reject, and [`FacemoodError::ModelLoad`] if the file is missing
    /// or not a SeetaFace model.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>, config: DetectorConfig) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|err| {
            FacemoodError::ModelLoad(format!(
                "failed to read face detector model {}: {}",
                path.display(),
                err
            ))
        })?;
        let locator = Self::from_bytes(&data, config)?;
        info!("Face detector model loaded");
        Ok(locator)
    }

    /// Parse a SeetaFace model from memory.
    pub fn from_bytes(data: &[u8], config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        let model = rustface::read_model(std::io::Cursor::new(data)).map_err(|err| {
            FacemoodError::ModelLoad(format!("invalid face detector model: {}", err))
        })?;
        Ok(Self { model, config })
    }
}

/// Whether an image is large enough to hold a face of the configured
/// minimum size. rustface panics on empty images, so smaller ones are never
/// handed to it.
fn can_hold_face(config: &DetectorConfig, width: u32, height: u32) -> bool {
    width >= config.min_face_size && height >= config.min_face_size
}

impl FaceLocator for RustfaceLocator {
    #[instrument(skip_all, fields(width = gray.width(), height = gray.height()))]
    fn locate(&self, gray: &GrayImage) -> Vec<FaceRegion> {
        let (width, height) = gray.dimensions();
        if !can_hold_face(&self.config, width, height) {
            debug!("Image smaller than minimum face size, skipping detection");
            return Vec::new();
        }

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(self.config.min_face_size);
        detector.set_score_thresh(self.config.score_threshold);
        detector.set_pyramid_scale_factor(self.config.pyramid_scale_factor);
        detector.set_slide_window_step(self.config.slide_window_step, self.config.slide_window_step);

        let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));

        let regions: Vec<FaceRegion> = faces
            .iter()
            .filter_map(|face| {
                let bbox = face.bbox();
                FaceRegion::clipped(
                    i64::from(bbox.x()),
                    i64::from(bbox.y()),
                    i64::from(bbox.width()),
                    i64::from(bbox.height()),
                    width,
                    height,
                )
            })
            .collect();

        debug!(
            raw = faces.len(),
            kept = regions.len(),
            "Face detection complete"
        );
        regions
    }
}
