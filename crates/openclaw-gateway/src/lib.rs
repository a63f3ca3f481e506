// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the OpenClaw relay.
//!
//! Axum server exposing the chat streaming endpoints plus the small
//! management surface around them (models, tasks, provider keys). All
//! conversation state lives behind the [`TaskStore`] trait; the gateway
//! owns validation, auth, and the HTTP/SSE framing only.
//!
//! [`TaskStore`]: openclaw_core::traits::TaskStore

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;
pub mod sse;

pub use auth::AuthConfig;
pub use error::ApiError;
pub use server::{router, serve, GatewayState};
