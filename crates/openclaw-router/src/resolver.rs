// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential resolver: maps a requested model id to an upstream model id
//! plus the credential that funds the request.

use secrecy::SecretString;
use tracing::debug;

use openclaw_core::error::RelayError;
use openclaw_core::traits::{CredentialVault, TaskStore};

use crate::catalog;

/// A fully resolved route: what to ask the completion provider for, and with
/// whose key.
#[derive(Debug)]
pub struct ModelRoute {
    /// Model id sent upstream.
    pub upstream_model_id: String,
    /// Credential funding this request.
    pub api_key: SecretString,
}

/// Resolves the requested model id against the catalog and available
/// credentials. Fails fast before any streaming or store writes.
pub struct CredentialResolver {
    platform_key: Option<SecretString>,
}

impl CredentialResolver {
    /// `platform_key` is the server-held credential; `None` disables
    /// platform models entirely.
    pub fn new(platform_key: Option<SecretString>) -> Self {
        Self { platform_key }
    }

    /// Resolves `model_id` for `user_id`.
    ///
    /// Platform models require the server-held credential; BYOK providers
    /// require a stored, decryptable user credential. Anything else is an
    /// invalid model. Makes at most one store read per call.
    pub async fn resolve(
        &self,
        model_id: &str,
        user_id: &str,
        store: &dyn TaskStore,
        vault: &dyn CredentialVault,
    ) -> Result<ModelRoute, RelayError> {
        if let Some(model) = catalog::platform_model(model_id) {
            let key = self
                .platform_key
                .clone()
                .ok_or(RelayError::PlatformUnavailable)?;
            debug!(model = model_id, upstream = model.upstream_id, "resolved platform model");
            return Ok(ModelRoute {
                upstream_model_id: model.upstream_id.to_string(),
                api_key: key,
            });
        }

        if catalog::is_byok_provider(model_id) {
            let ciphertext = store
                .get_credential(user_id, model_id)
                .await?
                .ok_or_else(|| RelayError::MissingCredential {
                    provider: model_id.to_string(),
                })?;
            let api_key = vault.decrypt(&ciphertext).await?;
            debug!(provider = model_id, "resolved BYOK credential");
            return Ok(ModelRoute {
                // For BYOK the provider name is the upstream model id.
                upstream_model_id: model_id.to_string(),
                api_key,
            });
        }

        Err(RelayError::InvalidModel {
            model: model_id.to_string(),
        })
    }
}
