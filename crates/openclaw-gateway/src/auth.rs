// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-token auth middleware and caller identity extraction.
//!
//! The shared bearer token gates service access; the end user behind a
//! request is named by the `x-openclaw-user` header, set by the fronting
//! platform after its own authentication. No configured token disables the
//! check entirely, for local development.

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use crate::error::ApiError;
use crate::server::GatewayState;

/// Header naming the end user a request acts for.
pub const USER_HEADER: &str = "x-openclaw-user";

/// Shared-secret configuration for the API route group.
#[derive(Clone)]
pub struct AuthConfig {
    bearer_token: Option<SecretString>,
}

impl AuthConfig {
    pub fn new(bearer_token: Option<SecretString>) -> Self {
        Self { bearer_token }
    }

    fn enabled(&self) -> bool {
        self.bearer_token.is_some()
    }

    fn accepts(&self, presented: &str) -> bool {
        match &self.bearer_token {
            Some(expected) => expected.expose_secret() == presented,
            None => true,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Rejects requests that do not present the configured bearer token.
pub async fn auth_middleware(
    State(state): State<GatewayState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if !state.auth.enabled() {
        return Ok(next.run(request).await);
    }

    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match presented {
        Some(token) if state.auth.accepts(token) => Ok(next.run(request).await),
        Some(_) => {
            warn!(path = %request.uri().path(), "rejected request with bad bearer token");
            Err(StatusCode::UNAUTHORIZED)
        }
        None => Err(StatusCode::UNAUTHORIZED),
    }
}

/// Extracts the caller identity from the request headers.
pub fn require_user(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized"))
}
