// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./openclaw.toml` > `~/.config/openclaw/openclaw.toml`
//! > `/etc/openclaw/openclaw.toml` with environment variable overrides via
//! `OPENCLAW_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::OpenClawConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/openclaw/openclaw.toml` (system-wide)
/// 3. `~/.config/openclaw/openclaw.toml` (user XDG config)
/// 4. `./openclaw.toml` (local directory)
/// 5. `OPENCLAW_*` environment variables
pub fn load_config() -> Result<OpenClawConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OpenClawConfig::default()))
        .merge(Toml::file("/etc/openclaw/openclaw.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("openclaw/openclaw.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("openclaw.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and for callers that already hold the TOML text.
pub fn load_config_from_str(toml_content: &str) -> Result<OpenClawConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OpenClawConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<OpenClawConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OpenClawConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `OPENCLAW_PLATFORM_API_KEY`
/// must map to `platform.api_key`, not `platform.api.key`.
fn env_provider() -> Env {
    Env::prefixed("OPENCLAW_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: OPENCLAW_PLATFORM_API_KEY -> "platform_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("platform_", "platform.", 1)
            .replacen("upstream_", "upstream.", 1)
            .replacen("relay_", "relay.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("agent_", "agent.", 1);
        mapped.into()
    })
}
