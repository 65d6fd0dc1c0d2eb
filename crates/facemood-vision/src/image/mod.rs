// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — payload decoding, BGR color images, grayscale conversion,
// and the crop/resize/normalise chain used to build classifier input.

pub mod color;
pub mod decode;
pub mod processor;

pub use color::ColorImage;
pub use decode::decode;
pub use processor::GrayProcessor;
