// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preprocessor — turns one face region of a grayscale image into the
// (1, 48, 48, 1) float tensor the emotion classifier consumes.

use facemood_core::error::Result;
use facemood_core::types::FaceRegion;
use image::GrayImage;
use tracing::instrument;

use crate::image::processor::GrayProcessor;

/// Edge length of the square face tile the classifier was trained on.
pub const FACE_SIZE: u32 = 48;

const TILE_LEN: usize = (FACE_SIZE * FACE_SIZE) as usize;

/// A normalised 48x48 single-channel face tile.
///
/// Values lie in [0.0, 1.0] and are stored row-major, which is also the
/// memory order of the NHWC shape `[1, 48, 48, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceTensor {
    data: Vec<f32>,
}

impl FaceTensor {
    /// Tensor layout: batch, height, width, channels.
    pub const SHAPE: [usize; 4] = [1, FACE_SIZE as usize, FACE_SIZE as usize, 1];

    /// Wrap row-major tile data. Returns `None` unless `data` holds exactly
    /// 48 * 48 values.
    pub fn from_vec(data: Vec<f32>) -> Option<Self> {
        (data.len() == TILE_LEN).then_some(Self { data })
    }

    pub fn shape(&self) -> [usize; 4] {
        Self::SHAPE
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Value at row `y`, column `x` of the tile.
    pub fn get(&self, y: usize, x: usize) -> Option<f32> {
        if y >= FACE_SIZE as usize || x >= FACE_SIZE as usize {
            return None;
        }
        self.data.get(y * FACE_SIZE as usize + x).copied()
    }
}

/// Crop `gray` to `region`, resize to 48x48, and scale intensities by 1/255.
///
/// # Errors
///
/// Returns [`FacemoodError::Preprocess`](facemood_core::FacemoodError::Preprocess)
/// if the region is empty or not fully inside the image.
#[instrument(skip(gray), fields(region = %region, width = gray.width(), height = gray.height()))]
pub fn preprocess(gray: &GrayImage, region: FaceRegion) -> Result<FaceTensor> {
    let tile = GrayProcessor::from_region(gray, region)?.resize_exact(FACE_SIZE, FACE_SIZE);
    Ok(FaceTensor {
        data: tile.normalized(),
    })
}
