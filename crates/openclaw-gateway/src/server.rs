// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router construction and server lifecycle.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use openclaw_context::ContextAssembler;
use openclaw_core::traits::{CompletionUpstream, CredentialVault, FileStore, TaskStore};
use openclaw_relay::TurnCoordinator;
use openclaw_router::CredentialResolver;

use crate::auth::{self, AuthConfig};
use crate::handlers;

/// Shared per-request state. All collaborators sit behind `Arc`ed traits so
/// tests can swap in scripted implementations.
#[derive(Clone)]
pub struct GatewayState {
    pub store: Arc<dyn TaskStore>,
    pub files: Arc<dyn FileStore>,
    pub vault: Arc<dyn CredentialVault>,
    pub upstream: Arc<dyn CompletionUpstream>,
    pub resolver: Arc<CredentialResolver>,
    pub assembler: Arc<ContextAssembler>,
    pub coordinator: TurnCoordinator,
    pub channel_capacity: usize,
    pub auth: AuthConfig,
}

impl GatewayState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn TaskStore>,
        files: Arc<dyn FileStore>,
        vault: Arc<dyn CredentialVault>,
        upstream: Arc<dyn CompletionUpstream>,
        resolver: CredentialResolver,
        assembler: ContextAssembler,
        read_timeout: Duration,
        channel_capacity: usize,
        auth: AuthConfig,
    ) -> Self {
        let coordinator = TurnCoordinator::new(store.clone(), read_timeout);
        Self {
            store,
            files,
            vault,
            upstream,
            resolver: Arc::new(resolver),
            assembler: Arc::new(assembler),
            coordinator,
            channel_capacity,
            auth,
        }
    }
}

/// Builds the full application router: a public health route plus the
/// bearer-gated API group.
pub fn router(state: GatewayState) -> Router {
    let api = Router::new()
        .route("/v1/chat/start", post(handlers::chat_start))
        .route("/v1/chat/send", post(handlers::chat_send))
        .route("/v1/models", get(handlers::list_models))
        .route("/v1/tasks", get(handlers::list_tasks))
        .route(
            "/v1/tasks/{task_id}",
            get(handlers::get_task)
                .patch(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/v1/keys", put(handlers::put_api_key).get(handlers::list_keys))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    let public = Router::new().route("/health", get(handlers::health));

    Router::new()
        .merge(public)
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the router on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: GatewayState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "gateway listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
