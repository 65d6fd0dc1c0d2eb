// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Three-channel color image in BGR channel order, and its grayscale
// conversion.

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, RgbImage};
use tracing::{debug, instrument};

/// A decoded color image whose pixels are stored as `[B, G, R]`.
///
/// The `image` crate has no BGR pixel type, so the buffer reuses `RgbImage`
/// storage with the first and last channels swapped. Use
/// [`pixel`](Self::pixel) or [`as_raw`](Self::as_raw) to read it; never hand
/// the inner buffer to code that assumes RGB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorImage {
    bgr: RgbImage,
}

impl ColorImage {
    /// Force any decoded image into 3-channel color and reorder RGB -> BGR.
    ///
    /// Alpha is dropped and single-channel images are expanded.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        let mut bgr = image.into_rgb8();
        for pixel in bgr.pixels_mut() {
            pixel.0.swap(0, 2);
        }
        Self { bgr }
    }

    /// Build from raw interleaved BGR bytes. Returns `None` if `data` is not
    /// exactly `width * height * 3` bytes.
    pub fn from_bgr_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        RgbImage::from_raw(width, height, data).map(|bgr| Self { bgr })
    }

    pub fn width(&self) -> u32 {
        self.bgr.width()
    }

    pub fn height(&self) -> u32 {
        self.bgr.height()
    }

    /// `[B, G, R]` at `(x, y)`. Panics if out of bounds, like `ImageBuffer`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.bgr.get_pixel(x, y).0
    }

    /// Interleaved BGR bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.bgr.as_raw()
    }

    /// Convert to single-channel luma with BT.601 weights.
    ///
    /// Uses the same 14-bit fixed-point coefficients as OpenCV's
    /// `BGR2GRAY`, so results match a model trained on OpenCV grayscale
    /// input bit for bit.
    #[instrument(skip_all, fields(width = self.width(), height = self.height()))]
    pub fn to_gray(&self) -> GrayImage {
        const B_WEIGHT: u32 = 1868;
        const G_WEIGHT: u32 = 9617;
        const R_WEIGHT: u32 = 4899;
        const SHIFT: u32 = 14;
        const ROUND: u32 = 1 << (SHIFT - 1);

        let gray: GrayImage = ImageBuffer::from_fn(self.width(), self.height(), |x, y| {
            let [b, g, r] = self.bgr.get_pixel(x, y).0;
            let luma = (u32::from(b) * B_WEIGHT
                + u32::from(g) * G_WEIGHT
                + u32::from(r) * R_WEIGHT
                + ROUND)
                >> SHIFT;
            // Weights sum to 1 << SHIFT, so luma <= 255.
            Luma([luma as u8])
        });
        debug!("Grayscale conversion complete");
        gray
    }
}
