// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the OpenClaw relay.

use thiserror::Error;

/// The primary error type used across the relay pipeline and collaborator traits.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Request validation errors (bad input shape, size or length limits exceeded).
    /// Rejected synchronously with no side effects.
    #[error("{0}")]
    Validation(String),

    /// The task (or other owned resource) does not exist or does not belong
    /// to the caller. Deliberately indistinguishable from absence.
    #[error("{0} not found")]
    NotFound(String),

    /// The requested model is neither a platform model nor a known BYOK provider.
    #[error("invalid model selection: {model}")]
    InvalidModel { model: String },

    /// A platform model was requested but no server-held credential is configured.
    /// Signals the client to prompt for a BYOK key instead.
    #[error("platform models are not available")]
    PlatformUnavailable,

    /// A BYOK provider was requested but the user has no stored credential for it.
    #[error("no API key configured for {provider}")]
    MissingCredential { provider: String },

    /// The completion provider returned a non-success status before streaming
    /// began. Status and body are captured for logs, never surfaced verbatim
    /// to the client.
    #[error("upstream returned status {status}")]
    UpstreamStatus { status: u16, body: String },

    /// The completion provider returned a success status but no response body.
    #[error("upstream response had no body")]
    UpstreamEmptyBody,

    /// Transport or protocol failure talking to the completion provider.
    #[error("upstream error: {message}")]
    Upstream {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Credential vault errors (undecryptable ciphertext, missing key material).
    #[error("vault error: {0}")]
    Vault(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Returns the machine-readable code surfaced to clients for configuration
    /// errors, or `None` for every other category.
    pub fn client_code(&self) -> Option<&'static str> {
        match self {
            RelayError::PlatformUnavailable => Some("PLATFORM_UNAVAILABLE"),
            RelayError::MissingCredential { .. } => Some("BYOK_KEY_MISSING"),
            _ => None,
        }
    }
}
