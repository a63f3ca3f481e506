// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenRouter streaming completion client.
//!
//! Implements the `CompletionUpstream` seam over the OpenRouter
//! chat-completions API: one streaming POST per turn, SSE decoding into
//! typed events, and hard failure on non-2xx or empty-body responses.

pub mod client;
pub mod sse;
pub mod types;

pub use client::{OpenRouterClient, DEFAULT_BASE_URL};
