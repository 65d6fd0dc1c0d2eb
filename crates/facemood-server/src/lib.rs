// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// facemood Server — the HTTP surface of the emotion inference service.
//
// Parses `POST /predict` bodies, runs the `EmotionPipeline` from
// `facemood-vision` on a bounded blocking pool, and maps results and
// `FacemoodError`s onto JSON responses.

pub mod bootstrap;
pub mod error;
pub mod pool;
pub mod routes;

pub use bootstrap::build_state;
pub use error::{ApiError, status_for};
pub use pool::InferencePool;
pub use routes::{AppState, router};
