// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits consumed by the relay pipeline.
//!
//! The relay treats persistence, file storage, credential decryption, and the
//! completion provider as black boxes behind these seams. Production adapters
//! live in their own crates; tests use the mocks in `openclaw-test-utils`.

pub mod files;
pub mod store;
pub mod upstream;
pub mod vault;

pub use files::FileStore;
pub use store::TaskStore;
pub use upstream::{CompletionUpstream, UpstreamEventStream};
pub use vault::{CredentialVault, PassthroughVault};
