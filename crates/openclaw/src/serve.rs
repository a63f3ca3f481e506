// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `openclaw serve` command implementation.
//!
//! Wires the configured collaborators together -- SQLite task store,
//! OpenRouter completion client, local file store, pass-through credential
//! vault -- and runs the gateway until a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use tokio::net::TcpListener;
use tracing::{info, warn};

use openclaw_config::model::{AgentConfig, OpenClawConfig};
use openclaw_context::{ContextAssembler, DEFAULT_SYSTEM_PROMPT};
use openclaw_core::error::RelayError;
use openclaw_core::traits::PassthroughVault;
use openclaw_gateway::{AuthConfig, GatewayState};
use openclaw_openrouter::OpenRouterClient;
use openclaw_router::CredentialResolver;
use openclaw_storage::SqliteTaskStore;

use crate::files::LocalFileStore;

/// Runs the `openclaw serve` command until interrupted.
pub async fn run_serve(config: OpenClawConfig) -> Result<(), RelayError> {
    init_tracing(&config.agent.log_level);
    info!(version = env!("CARGO_PKG_VERSION"), "starting openclaw serve");

    let store = Arc::new(
        SqliteTaskStore::open(&config.storage.database_path, config.storage.wal_mode).await?,
    );
    let files = Arc::new(LocalFileStore::beside_database(&config.storage.database_path));
    let upstream = Arc::new(OpenRouterClient::new(
        &config.upstream.base_url,
        &config.platform.referer,
        &config.platform.app_title,
        Duration::from_secs(config.upstream.connect_timeout_secs),
    )?);

    let platform_key = config
        .platform
        .api_key
        .clone()
        .map(SecretString::from);
    if platform_key.is_none() {
        info!("no platform API key configured; platform models are unavailable");
    }

    let bearer_token = config.server.bearer_token.clone().map(SecretString::from);
    if bearer_token.is_none() {
        warn!("no bearer token configured; API authentication is disabled");
    }

    let state = GatewayState::new(
        store,
        files,
        // At-rest encryption is the deployment's concern; stored keys are
        // used as-is.
        Arc::new(PassthroughVault),
        upstream,
        CredentialResolver::new(platform_key),
        ContextAssembler::new(system_prompt(&config.agent)?),
        Duration::from_secs(config.relay.read_timeout_secs),
        config.relay.channel_capacity,
        AuthConfig::new(bearer_token),
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| RelayError::Internal(format!("failed to bind {addr}: {e}")))?;

    openclaw_gateway::serve(listener, state, shutdown_signal())
        .await
        .map_err(|e| RelayError::Internal(format!("server error: {e}")))?;

    info!("openclaw serve stopped");
    Ok(())
}

/// Resolves the system prompt: file takes precedence over the inline
/// string, and the built-in default fills the gap.
fn system_prompt(agent: &AgentConfig) -> Result<String, RelayError> {
    if let Some(path) = &agent.system_prompt_file {
        return std::fs::read_to_string(path).map_err(|e| {
            RelayError::Config(format!("failed to read system prompt file {path}: {e}"))
        });
    }
    Ok(agent
        .system_prompt
        .clone()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()))
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("openclaw={log_level},warn")));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(%err, "failed to install ctrl-c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => warn!(%err, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
