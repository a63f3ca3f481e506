// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the OpenClaw relay.
//!
//! This crate provides the error taxonomy, domain records, request limits,
//! and the collaborator traits the relay pipeline is built against. Adapter
//! implementations live in their own crates.

pub mod error;
pub mod limits;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::RelayError;
pub use types::{
    Attachment, AttachmentInput, ChatEvent, ChatTurn, ContentPart, Message, Role, Task,
    TaskStatus, TurnContent, UpstreamEvent,
};

pub use traits::{
    CompletionUpstream, CredentialVault, FileStore, PassthroughVault, TaskStore,
    UpstreamEventStream,
};
