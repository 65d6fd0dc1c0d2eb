// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Startup wiring: load both models once and assemble the shared state.

use std::sync::Arc;

use facemood_core::config::ServiceConfig;
use facemood_core::error::Result;
use facemood_vision::{EmotionPipeline, RtenClassifier, RustfaceLocator};
use tracing::{info, instrument};

use crate::pool::InferencePool;
use crate::routes::AppState;

/// Load the detector and classifier named in `config` and build the pipeline.
///
/// # Errors
///
/// Returns [`FacemoodError::Config`](facemood_core::FacemoodError::Config)
/// for invalid settings and
/// [`FacemoodError::ModelLoad`](facemood_core::FacemoodError::ModelLoad)
/// if either model cannot be loaded. The service must not start in that case.
#[instrument(skip_all)]
pub fn build_pipeline(config: &ServiceConfig) -> Result<EmotionPipeline> {
    config.validate()?;

    let locator = RustfaceLocator::from_file(&config.detector_model_path, config.detector.clone())?;
    let classifier = RtenClassifier::from_file(&config.classifier_model_path)?;

    info!(
        detector = %config.detector_model_path.display(),
        classifier = %config.classifier_model_path.display(),
        selection = ?config.region_selection,
        "Models loaded"
    );

    Ok(EmotionPipeline::new(Arc::new(locator), Arc::new(classifier))
        .with_selection(config.region_selection))
}

/// Build everything a request handler needs.
pub fn build_state(config: &ServiceConfig) -> Result<AppState> {
    let pipeline = build_pipeline(config)?;
    let pool = InferencePool::from_config(config);
    info!(
        workers = config.workers,
        capacity = pool.capacity(),
        timeout_ms = config.request_timeout_ms,
        "Inference pool ready"
    );
    Ok(AppState::new(pipeline, pool))
}
