// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP mapping for `FacemoodError`.
//
// Client mistakes are 400, capacity problems are 503/504, everything else
// (including bad image data, as the service has always reported it) is 500.
// The body is always `{"error": "<Display of the error>"}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use facemood_core::error::FacemoodError;
use serde_json::json;

/// Response status for an error.
pub fn status_for(err: &FacemoodError) -> StatusCode {
    match err {
        // Client did not send a usable request
        FacemoodError::MissingInput => StatusCode::BAD_REQUEST,
        FacemoodError::InvalidRequest(_) => StatusCode::BAD_REQUEST,

        // Capacity
        FacemoodError::Saturated => StatusCode::SERVICE_UNAVAILABLE,
        FacemoodError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,

        // Pipeline and internal failures
        FacemoodError::Decode(_)
        | FacemoodError::Preprocess(_)
        | FacemoodError::Classification(_)
        | FacemoodError::ModelLoad(_)
        | FacemoodError::Config(_)
        | FacemoodError::Io(_)
        | FacemoodError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Wrapper that turns a [`FacemoodError`] into an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub FacemoodError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        status_for(&self.0)
    }
}

impl From<FacemoodError> for ApiError {
    fn from(err: FacemoodError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_bad_request() {
        assert_eq!(status_for(&FacemoodError::MissingInput), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&FacemoodError::InvalidRequest("eof".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn pipeline_failures_are_internal() {
        for err in [
            FacemoodError::Decode("bad".into()),
            FacemoodError::Preprocess("bad".into()),
            FacemoodError::Classification("bad".into()),
        ] {
            assert_eq!(status_for(&err), StatusCode::INTERNAL_SERVER_ERROR, "{err}");
        }
    }

    #[test]
    fn capacity_errors() {
        assert_eq!(
            status_for(&FacemoodError::Saturated),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&FacemoodError::Timeout(10_000)),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn response_carries_status() {
        let response = ApiError(FacemoodError::MissingInput).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
