// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential vault trait -- decryption of stored BYOK provider keys.
//!
//! Encryption-at-rest is an external concern. The task store persists opaque
//! ciphertext; this trait is the single seam through which the resolver turns
//! ciphertext into usable key material.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::RelayError;

/// Decrypts stored credential ciphertext into usable key material.
#[async_trait]
pub trait CredentialVault: Send + Sync {
    async fn decrypt(&self, ciphertext: &str) -> Result<SecretString, RelayError>;
}

/// Vault that treats stored values as plaintext.
///
/// For deployments where at-rest encryption is provided by the platform
/// (encrypted volumes, managed database encryption). The stored value is the
/// key itself.
#[derive(Debug, Clone, Default)]
pub struct PassthroughVault;

#[async_trait]
impl CredentialVault for PassthroughVault {
    async fn decrypt(&self, ciphertext: &str) -> Result<SecretString, RelayError> {
        if ciphertext.is_empty() {
            return Err(RelayError::Vault("empty credential".into()));
        }
        Ok(SecretString::from(ciphertext.to_string()))
    }
}
