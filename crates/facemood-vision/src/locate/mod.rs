// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Face location — the pluggable detector seam and its built-in backend.

#[cfg(feature = "rustface")]
pub mod rustface_backend;

use facemood_core::types::FaceRegion;
use image::GrayImage;

#[cfg(feature = "rustface")]
pub use rustface_backend::RustfaceLocator;

/// Pluggable face detection backend.
///
/// Implementations are built once at startup and shared read-only across
/// requests. `locate` must be deterministic for identical input and
/// configuration, but the order of the returned regions carries no meaning:
/// it is not sorted by size, score, or position.
///
/// Every returned region must be non-empty and lie inside `gray`.
pub trait FaceLocator: Send + Sync {
    /// Find candidate face rectangles in a grayscale image.
    fn locate(&self, gray: &GrayImage) -> Vec<FaceRegion>;
}
