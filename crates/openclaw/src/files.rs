// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local-disk `FileStore` backing the context assembler.
//!
//! Attachment upload and lifecycle belong to the fronting platform; this
//! store only reads blobs that something else placed under its root.
//! Storage keys are relative paths; access URLs are `file://` references
//! resolved at read time.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use openclaw_core::error::RelayError;
use openclaw_core::traits::FileStore;

pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default file root: a `files` directory next to the database.
    pub fn beside_database(database_path: &str) -> Self {
        let root = Path::new(database_path)
            .parent()
            .map(|p| p.join("files"))
            .unwrap_or_else(|| PathBuf::from("files"));
        Self::new(root)
    }

    fn resolve(&self, storage_key: &str) -> Result<PathBuf, RelayError> {
        let relative = Path::new(storage_key);
        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if storage_key.is_empty() || escapes {
            return Err(RelayError::Validation(format!(
                "invalid storage key: {storage_key}"
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn get_text_content(&self, storage_key: &str) -> Result<String, RelayError> {
        let path = self.resolve(storage_key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(RelayError::NotFound(format!("file {storage_key}")))
            }
            Err(err) => Err(RelayError::Storage {
                source: Box::new(err),
            }),
        }
    }

    async fn get_signed_url(&self, storage_key: &str) -> Result<String, RelayError> {
        let path = self.resolve(storage_key)?;
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(RelayError::NotFound(format!("file {storage_key}")));
        }
        let absolute = path.canonicalize().map_err(|err| RelayError::Storage {
            source: Box::new(err),
        })?;
        Ok(format!("file://{}", absolute.display()))
    }
}
