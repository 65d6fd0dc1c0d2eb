// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Emotion classifier executed with the `rten` inference runtime.
//
// # Model Setup
//
// The classifier is a small CNN trained on 48x48 grayscale faces with seven
// output classes (FER-2013 layout). Export it to ONNX with NHWC input
// `[1, 48, 48, 1]` and a `[1, 7]` float output, then convert it once:
//
//   ```sh
//   pip install rten-convert
//   rten-convert emotion.onnx emotion.rten
//   ```
//
// Point `classifier_model_path` in the service config at the `.rten` file.

use std::path::Path;

use facemood_core::error::{FacemoodError, Result};
use rten::Model;
use rten_tensor::prelude::*;
use rten_tensor::{NdTensor, Tensor};
use tracing::{debug, info, instrument};

use super::Classifier;
use crate::preprocess::FaceTensor;

/// Emotion model loaded into `rten`.
///
/// Loading is the expensive step; keep the classifier around and share it
/// between requests. `Model::run_one` takes `&self`, so concurrent calls do
/// not need a lock.
pub struct RtenClassifier {
    model: Model,
}

impl RtenClassifier {
    /// Load a `.rten` model file.
    ///
    /// # Errors
    ///
    /// Returns [`FacemoodError::ModelLoad`] if the file is missing or corrupt.
    ///
    /// # Performance
    ///
    /// **Important:** `rten` must be compiled with optimisations. Debug
    /// builds are 10-100x slower; the workspace profile raises `rten` to
    /// `opt-level = 3` for that reason.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FacemoodError::ModelLoad(format!(
                "classifier model not found at {}",
                path.display()
            )));
        }

        info!("Loading emotion classifier model");
        let model = Model::load_file(path).map_err(|err| {
            FacemoodError::ModelLoad(format!(
                "failed to load classifier model from {}: {}",
                path.display(),
                err
            ))
        })?;

        info!("Emotion classifier initialised successfully");
        Ok(Self { model })
    }
}

impl Classifier for RtenClassifier {
    #[instrument(skip_all)]
    fn predict(&self, tensor: &FaceTensor) -> Result<Vec<f32>> {
        let input = NdTensor::from_data(tensor.shape(), tensor.as_slice().to_vec());

        let output = self
            .model
            .run_one(input.view().into(), None)
            .map_err(|err| FacemoodError::Classification(format!("model run failed: {}", err)))?;

        let scores: Tensor<f32> = output.try_into().map_err(|err| {
            FacemoodError::Classification(format!("model output is not a float tensor: {:?}", err))
        })?;

        debug!(shape = ?scores.shape(), "Model output received");
        Ok(scores.iter().copied().collect())
    }
}
