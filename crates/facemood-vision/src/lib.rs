// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// facemood-vision — The request-to-result inference pipeline.
//
// Decodes a base64 image payload into a BGR color image, converts it to
// grayscale, asks a `FaceLocator` for face regions, crops and normalises one
// region into a 48x48 tensor, and maps the `Classifier` output to an
// `EmotionLabel`.

pub mod classify;
pub mod image;
pub mod locate;
pub mod pipeline;
pub mod preprocess;

// Re-export the primary types so callers can use `facemood_vision::EmotionPipeline` etc.
pub use classify::{Classifier, argmax, classify, label_for_scores};
pub use crate::image::color::ColorImage;
pub use crate::image::decode::{decode, strip_data_uri};
pub use locate::FaceLocator;
pub use pipeline::EmotionPipeline;
pub use preprocess::{FACE_SIZE, FaceTensor, preprocess};

#[cfg(feature = "rten")]
pub use classify::rten_backend::RtenClassifier;
#[cfg(feature = "rustface")]
pub use locate::rustface_backend::RustfaceLocator;
