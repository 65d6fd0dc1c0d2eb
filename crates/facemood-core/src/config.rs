// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FacemoodError, Result};
use crate::types::RegionSelection;

/// Environment variable naming a JSON config file.
pub const CONFIG_PATH_ENV: &str = "FACEMOOD_CONFIG";

/// Environment variable overriding [`ServiceConfig::bind_addr`].
pub const BIND_ADDR_ENV: &str = "FACEMOOD_BIND";

/// Upper bound on `workers + queue_depth`.
pub const MAX_IN_FLIGHT: usize = 4096;

/// Tuning for the SeetaFace cascade detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Smallest face edge, in pixels, the detector searches for (>= 20).
    pub min_face_size: u32,
    /// Minimum cascade score for a window to count as a face (> 0).
    pub score_threshold: f64,
    /// Shrink factor between image pyramid levels, in (0.01, 0.99).
    pub pyramid_scale_factor: f32,
    /// Sliding window step in pixels, both axes.
    pub slide_window_step: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_face_size: 20,
            score_threshold: 2.0,
            // One level per 1.3x downscale.
            pyramid_scale_factor: 0.77,
            slide_window_step: 4,
        }
    }
}

impl DetectorConfig {
    /// Reject values the detector backend would panic on.
    pub fn validate(&self) -> Result<()> {
        if self.min_face_size < 20 {
            return Err(FacemoodError::Config(format!(
                "detector.min_face_size must be >= 20, got {}",
                self.min_face_size
            )));
        }
        if self.score_threshold.is_nan() || self.score_threshold <= 0.0 {
            return Err(FacemoodError::Config(format!(
                "detector.score_threshold must be > 0, got {}",
                self.score_threshold
            )));
        }
        if !(0.01..=0.99).contains(&self.pyramid_scale_factor) {
            return Err(FacemoodError::Config(format!(
                "detector.pyramid_scale_factor must be within [0.01, 0.99], got {}",
                self.pyramid_scale_factor
            )));
        }
        if self.slide_window_step == 0 {
            return Err(FacemoodError::Config(
                "detector.slide_window_step must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Settings read once at process start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,
    /// Path to the emotion classifier model (`.rten`).
    pub classifier_model_path: PathBuf,
    /// Path to the SeetaFace frontal face model.
    pub detector_model_path: PathBuf,
    /// Which face to classify when several are found.
    pub region_selection: RegionSelection,
    /// Face detector tuning.
    pub detector: DetectorConfig,
    /// Inferences allowed to run at once.
    pub workers: usize,
    /// Requests allowed to wait for a worker before new ones are rejected.
    pub queue_depth: usize,
    /// Upper bound on a single request's time in the pool.
    pub request_timeout_ms: u64,
    /// Largest accepted request body.
    pub max_body_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            classifier_model_path: PathBuf::from("model/emotion.rten"),
            detector_model_path: PathBuf::from("model/seeta_fd_frontal_v1.0.bin"),
            region_selection: RegionSelection::First,
            detector: DetectorConfig::default(),
            workers: 1,
            queue_depth: 16,
            request_timeout_ms: 10_000,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ServiceConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|err| {
            FacemoodError::Config(format!("failed to read {}: {}", path.display(), err))
        })?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Build the config from the process environment.
    ///
    /// Loads the file named by `FACEMOOD_CONFIG` if set, otherwise starts
    /// from defaults; then applies `FACEMOOD_BIND`.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::load(PathBuf::from(path))?,
            None => Self::default(),
        };

        if let Ok(bind) = std::env::var(BIND_ADDR_ENV) {
            config.bind_addr = bind.parse().map_err(|err| {
                FacemoodError::Config(format!("{BIND_ADDR_ENV}={bind:?} is not a socket address: {err}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(FacemoodError::Config("workers must be > 0".into()));
        }
        match self.workers.checked_add(self.queue_depth) {
            Some(total) if total <= MAX_IN_FLIGHT => {}
            _ => {
                return Err(FacemoodError::Config(format!(
                    "workers + queue_depth must be <= {MAX_IN_FLIGHT}"
                )));
            }
        }
        if self.request_timeout_ms == 0 {
            return Err(FacemoodError::Config("request_timeout_ms must be > 0".into()));
        }
        if self.max_body_bytes == 0 {
            return Err(FacemoodError::Config("max_body_bytes must be > 0".into()));
        }
        self.detector.validate()
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}
