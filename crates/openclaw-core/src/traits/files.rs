// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! File store trait -- blob retrieval for attachment inlining.
//!
//! Upload and lifecycle of stored files are external concerns; the context
//! assembler only ever reads.

use async_trait::async_trait;

use crate::error::RelayError;

/// Read-side access to stored attachment blobs.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Fetches the extracted text content of a stored document.
    async fn get_text_content(&self, storage_key: &str) -> Result<String, RelayError>;

    /// Resolves a time-limited access URL for a stored object. Generated on
    /// read, never persisted.
    async fn get_signed_url(&self, storage_key: &str) -> Result<String, RelayError>;
}
