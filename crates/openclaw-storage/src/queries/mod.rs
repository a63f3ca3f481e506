// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules. Standalone operations accept `&Database` and run
//! through the single serialized connection; the insert/touch helpers take a
//! bare connection so the adapter can compose them inside transactions.

pub mod attachments;
pub mod credentials;
pub mod messages;
pub mod tasks;

/// RFC 3339 timestamp with millisecond precision, UTC.
pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
