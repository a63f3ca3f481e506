// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for OpenClaw integration tests.
//!
//! In-memory and scripted implementations of the core collaborator traits,
//! used across the workspace's unit and integration tests.

pub mod memory_store;
pub mod mock_files;
pub mod scripted_upstream;

pub use memory_store::MemoryTaskStore;
pub use mock_files::MockFileStore;
pub use scripted_upstream::{RecordedCall, ScriptedItem, ScriptedUpstream};
