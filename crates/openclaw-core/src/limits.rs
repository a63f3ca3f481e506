// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request limits enforced at the gateway boundary.

/// Maximum message length in characters. Exactly this length is accepted;
/// one more is rejected with a validation error.
pub const MESSAGE_CHAR_LIMIT: usize = 10_000;

/// Attachment batches larger than this are truncated, never rejected.
pub const MAX_ATTACHMENTS: usize = 5;

/// Maximum declared attachment size in bytes (10 MB).
pub const FILE_SIZE_LIMIT: i64 = 10 * 1024 * 1024;

/// Maximum stored task title length; longer titles are truncated.
pub const TITLE_CHAR_LIMIT: usize = 500;

/// Raw history window loaded for a continuing chat (most recent first).
pub const HISTORY_WINDOW: i64 = 50;
