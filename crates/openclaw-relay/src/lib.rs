// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stream relay and persistence coordination.
//!
//! The heart of the pipeline: a small explicit state machine per in-flight
//! turn (`Streaming` → `Completing` | `Interrupted` → `Done`) that forwards
//! upstream deltas to the client, accumulates the full reply, and performs
//! the exactly-once final persist.

pub mod coordinator;

pub use coordinator::{TurnCoordinator, TurnOutcome, TurnState};
