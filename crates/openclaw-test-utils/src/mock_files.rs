// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock `FileStore` with scripted contents and failure keys.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use openclaw_core::error::RelayError;
use openclaw_core::traits::FileStore;

/// A file store backed by an in-memory map.
///
/// Keys registered with [`fail_key`] error on read, letting tests exercise
/// the unreadable-attachment path.
///
/// [`fail_key`]: MockFileStore::fail_key
#[derive(Clone, Default)]
pub struct MockFileStore {
    contents: Arc<Mutex<HashMap<String, String>>>,
    failing: Arc<Mutex<Vec<String>>>,
}

impl MockFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers extracted text for a storage key.
    pub async fn put_text(&self, storage_key: &str, content: &str) {
        self.contents
            .lock()
            .await
            .insert(storage_key.to_string(), content.to_string());
    }

    /// Makes every read of this key fail.
    pub async fn fail_key(&self, storage_key: &str) {
        self.failing.lock().await.push(storage_key.to_string());
    }
}

#[async_trait]
impl FileStore for MockFileStore {
    async fn get_text_content(&self, storage_key: &str) -> Result<String, RelayError> {
        if self.failing.lock().await.iter().any(|k| k == storage_key) {
            return Err(RelayError::Internal(format!(
                "scripted read failure for {storage_key}"
            )));
        }
        self.contents
            .lock()
            .await
            .get(storage_key)
            .cloned()
            .ok_or_else(|| RelayError::NotFound(format!("file {storage_key}")))
    }

    async fn get_signed_url(&self, storage_key: &str) -> Result<String, RelayError> {
        if self.failing.lock().await.iter().any(|k| k == storage_key) {
            return Err(RelayError::Internal(format!(
                "scripted read failure for {storage_key}"
            )));
        }
        Ok(format!("https://files.test/signed/{storage_key}"))
    }
}
