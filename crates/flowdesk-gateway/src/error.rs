// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maps domain errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use flowdesk_core::FlowdeskError;
use serde::Serialize;
use tracing::error;

/// JSON body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable machine-readable error kind.
    pub kind: String,
    /// Human-readable description.
    pub error: String,
}

/// Wrapper turning [`FlowdeskError`] into an HTTP response.
///
/// Handlers return `Result<_, ApiError>` and propagate domain errors
/// with `?`; the conversion picks the status code and body shape.
#[derive(Debug)]
pub struct ApiError(pub FlowdeskError);

impl From<FlowdeskError> for ApiError {
    fn from(err: FlowdeskError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            FlowdeskError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            FlowdeskError::NotFound { .. } => StatusCode::NOT_FOUND,
            FlowdeskError::QuotaExceeded { .. } => StatusCode::FORBIDDEN,
            FlowdeskError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match &self.0 {
            FlowdeskError::InvalidInput(_) => "invalid_input",
            FlowdeskError::NotFound { .. } => "not_found",
            FlowdeskError::QuotaExceeded { .. } => "quota_exceeded",
            FlowdeskError::Unavailable { .. } => "unavailable",
            FlowdeskError::Integrity(_) => "integrity",
            FlowdeskError::Storage { .. } => "storage",
            FlowdeskError::Config(_) => "config",
            FlowdeskError::Channel { .. } => "channel",
            FlowdeskError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(kind = self.kind(), error = %self.0, "request failed");
        }
        let body = ErrorBody {
            kind: self.kind().to_string(),
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
