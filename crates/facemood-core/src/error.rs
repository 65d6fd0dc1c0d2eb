// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for facemood.

use thiserror::Error;

/// Top-level error type for all facemood operations.
///
/// The `Display` output of each variant is what the HTTP layer returns to the
/// caller verbatim in `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum FacemoodError {
    // -- Request errors --
    #[error("No image provided")]
    MissingInput,

    #[error("invalid JSON body: {0}")]
    InvalidRequest(String),

    // -- Pipeline stage errors --
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("invalid face region: {0}")]
    Preprocess(String),

    #[error("classification failed: {0}")]
    Classification(String),

    // -- Startup errors --
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Scheduling --
    #[error("inference capacity exhausted, try again later")]
    Saturated,

    #[error("inference timed out after {0} ms")]
    Timeout(u64),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FacemoodError>;
