// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP error envelope and the mapping from pipeline errors to responses.
//!
//! Clients get stable, human-readable messages plus a machine code for the
//! two configuration errors they can act on. Upstream and storage detail
//! stays in the server logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use openclaw_core::error::RelayError;

/// A JSON error response: `{"error": "...", "code": "..."?}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub code: Option<&'static str>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            code: None,
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: &self.error,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::Validation(message) => ApiError::bad_request(message),
            RelayError::NotFound(what) => {
                ApiError::new(StatusCode::NOT_FOUND, format!("{what} not found"))
            }
            RelayError::InvalidModel { .. } => ApiError::bad_request("Invalid model selection"),
            RelayError::PlatformUnavailable => ApiError {
                status: StatusCode::SERVICE_UNAVAILABLE,
                error: "Platform models are coming soon! Add your own API key in Settings to \
                        start chatting."
                    .to_string(),
                code: Some("PLATFORM_UNAVAILABLE"),
            },
            RelayError::MissingCredential { .. } => ApiError {
                status: StatusCode::BAD_REQUEST,
                error: "No API key configured for this provider. Add one in Settings.".to_string(),
                code: Some("BYOK_KEY_MISSING"),
            },
            RelayError::UpstreamStatus { status, ref body } => {
                error!(status, body = %body, "upstream rejected completion request");
                ApiError::new(
                    StatusCode::BAD_GATEWAY,
                    "Failed to get response from AI model",
                )
            }
            RelayError::UpstreamEmptyBody | RelayError::Upstream { .. } => {
                error!(%err, "upstream completion failed before streaming");
                ApiError::new(
                    StatusCode::BAD_GATEWAY,
                    "Failed to get response from AI model",
                )
            }
            RelayError::Storage { .. }
            | RelayError::Vault(_)
            | RelayError::Config(_)
            | RelayError::Internal(_) => {
                error!(%err, "internal error handling request");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}
