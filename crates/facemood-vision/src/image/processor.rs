// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grayscale processor — strict crop, exact resize, and [0, 1] normalisation
// of single-channel images. Operates on in-memory images using the `image`
// crate.

use facemood_core::error::{FacemoodError, Result};
use facemood_core::types::FaceRegion;
use image::GrayImage;
use image::imageops::{self, FilterType};
use tracing::{debug, instrument};

/// Processing chain over a single grayscale image.
///
/// Each method consumes `self` and returns a new `GrayProcessor` wrapping the
/// transformed image, enabling method chaining.
///
/// ```ignore
/// let tile = GrayProcessor::new(gray)
///     .crop(region)?
///     .resize_exact(48, 48)
///     .normalized();
/// ```
pub struct GrayProcessor {
    /// The current working image.
    image: GrayImage,
}

impl GrayProcessor {
    // -- Construction ---------------------------------------------------------

    pub fn new(image: GrayImage) -> Self {
        Self { image }
    }

    /// Start a chain from `region` of a borrowed image, copying only the
    /// cropped pixels.
    ///
    /// Unlike a clamping crop, a region that is empty or reaches outside the
    /// image is an error: no padding, no silent shrinking.
    #[instrument(skip(source), fields(region = %region))]
    pub fn from_region(source: &GrayImage, region: FaceRegion) -> Result<Self> {
        let (img_w, img_h) = source.dimensions();
        if !region.fits_within(img_w, img_h) {
            return Err(FacemoodError::Preprocess(format!(
                "region {} does not fit inside {}x{} image",
                region, img_w, img_h
            )));
        }

        let cropped =
            imageops::crop_imm(source, region.x, region.y, region.width, region.height).to_image();
        debug!(
            width = cropped.width(),
            height = cropped.height(),
            "Crop complete"
        );
        Ok(Self { image: cropped })
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    // -- Transformations (consume self, return new Self) ----------------------

    /// Crop exactly to `region`. Same rules as [`from_region`](Self::from_region).
    pub fn crop(self, region: FaceRegion) -> Result<Self> {
        Self::from_region(&self.image, region)
    }

    /// Resize to exactly `width` x `height`, ignoring aspect ratio.
    ///
    /// Uses bilinear (triangle) filtering.
    pub fn resize_exact(self, width: u32, height: u32) -> Self {
        if self.image.dimensions() == (width, height) {
            return self;
        }
        let resized = imageops::resize(&self.image, width, height, FilterType::Triangle);
        Self { image: resized }
    }

    // -- Output ---------------------------------------------------------------

    /// Row-major intensities scaled from [0, 255] to [0.0, 1.0].
    pub fn normalized(&self) -> Vec<f32> {
        self.image
            .as_raw()
            .iter()
            .map(|&value| f32::from(value) / 255.0)
            .collect()
    }

    /// Consume the processor and return the underlying image.
    pub fn into_gray(self) -> GrayImage {
        self.image
    }
}
