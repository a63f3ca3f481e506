// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation context assembly.
//!
//! Builds the ordered turn list sent upstream: one system turn, capped
//! history in chronological order, then the current user turn with any
//! attachment content inlined (document text) or referenced (image URLs).

pub mod assembler;

pub use assembler::{ContextAssembler, DEFAULT_SYSTEM_PROMPT};
