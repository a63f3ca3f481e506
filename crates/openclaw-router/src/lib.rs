// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model catalog and credential resolution.
//!
//! Decides, per request, whether the chosen model is platform-funded or
//! BYOK, and produces the upstream model id plus the credential that pays
//! for the call.

pub mod catalog;
pub mod resolver;

pub use catalog::{is_byok_provider, platform_model, PlatformModel, BYOK_PROVIDERS, PLATFORM_MODELS};
pub use resolver::{CredentialResolver, ModelRoute};
