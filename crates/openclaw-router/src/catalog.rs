// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model catalog: platform-branded models and BYOK providers.

/// A platform-funded model entry, branded for the product but fulfilled by
/// the completion provider under its own model id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformModel {
    /// Client-facing model identifier.
    pub id: &'static str,
    /// Display name shown in model pickers.
    pub name: &'static str,
    /// Model id sent upstream.
    pub upstream_id: &'static str,
}

/// Platform models, fulfilled with the server-held credential.
pub const PLATFORM_MODELS: &[PlatformModel] = &[
    PlatformModel {
        id: "openclaw-pro",
        name: "OpenClaw Pro",
        upstream_id: "anthropic/claude-sonnet-4",
    },
    PlatformModel {
        id: "openclaw-fast",
        name: "OpenClaw Fast",
        upstream_id: "anthropic/claude-haiku-4",
    },
];

/// Providers users can configure with their own API keys. The provider name
/// doubles as the upstream model id for BYOK requests.
pub const BYOK_PROVIDERS: &[&str] = &["anthropic", "openai", "gemini"];

/// Look up a platform model by its client-facing id.
pub fn platform_model(id: &str) -> Option<&'static PlatformModel> {
    PLATFORM_MODELS.iter().find(|m| m.id == id)
}

/// Check whether a string names a known BYOK provider.
pub fn is_byok_provider(id: &str) -> bool {
    BYOK_PROVIDERS.contains(&id)
}
