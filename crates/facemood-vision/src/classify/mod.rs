// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Classifier adapter — runs the emotion model and maps its score vector to
// an `EmotionLabel`.

#[cfg(feature = "rten")]
pub mod rten_backend;

use facemood_core::error::{FacemoodError, Result};
use facemood_core::types::EmotionLabel;
use tracing::{debug, instrument};

use crate::preprocess::FaceTensor;

#[cfg(feature = "rten")]
pub use rten_backend::RtenClassifier;

/// Pluggable emotion model.
///
/// Given a `[1, 48, 48, 1]` face tensor, returns one probability-like score
/// per [`EmotionLabel`], in label index order. Implementations are loaded
/// once at startup and shared read-only across requests.
pub trait Classifier: Send + Sync {
    /// Score a face tile.
    ///
    /// Runtime failures (bad shapes, uninitialised models, ...) must be
    /// reported as [`FacemoodError::Classification`].
    fn predict(&self, tensor: &FaceTensor) -> Result<Vec<f32>>;
}

/// Index of the largest value; the lowest index wins ties.
///
/// NaN entries are passed over unless every entry is NaN. Returns `None`
/// for an empty slice.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let (first, rest) = values.split_first()?;
    let mut best_index = 0;
    let mut best_value = *first;
    for (offset, &value) in rest.iter().enumerate() {
        if value > best_value || (best_value.is_nan() && !value.is_nan()) {
            best_index = offset + 1;
            best_value = value;
        }
    }
    Some(best_index)
}

/// Map a raw score vector to its label.
///
/// # Errors
///
/// Returns [`FacemoodError::Classification`] if the vector does not hold
/// exactly one score per label or contains NaN.
pub fn label_for_scores(scores: &[f32]) -> Result<EmotionLabel> {
    if scores.len() != EmotionLabel::COUNT {
        return Err(FacemoodError::Classification(format!(
            "expected {} scores, got {}",
            EmotionLabel::COUNT,
            scores.len()
        )));
    }
    if scores.iter().any(|score| score.is_nan()) {
        return Err(FacemoodError::Classification(
            "model returned NaN scores".into(),
        ));
    }

    argmax(scores)
        .and_then(EmotionLabel::from_index)
        .ok_or_else(|| FacemoodError::Classification("empty score vector".into()))
}

/// Run `classifier` on `tensor` and return the winning label.
#[instrument(skip_all)]
pub fn classify(classifier: &dyn Classifier, tensor: &FaceTensor) -> Result<EmotionLabel> {
    let scores = classifier.predict(tensor)?;
    let label = label_for_scores(&scores)?;
    debug!(label = %label, ?scores, "Classification complete");
    Ok(label)
}
