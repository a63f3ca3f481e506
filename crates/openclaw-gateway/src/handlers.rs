// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request handlers for the gateway surface.
//!
//! The two chat handlers share one shape: validate, resolve credentials,
//! persist the user turn, assemble context, open the upstream stream, then
//! hand the connection over to the relay coordinator and answer with SSE.
//! Everything before the stream opens fails as plain JSON.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use openclaw_core::limits::{
    FILE_SIZE_LIMIT, HISTORY_WINDOW, MAX_ATTACHMENTS, MESSAGE_CHAR_LIMIT, TITLE_CHAR_LIMIT,
};
use openclaw_core::traits::UpstreamEventStream;
use openclaw_core::types::{AttachmentInput, ChatEvent, Message, Role, Task, TaskStatus};
use openclaw_router::catalog;

use crate::auth::require_user;
use crate::error::ApiError;
use crate::server::GatewayState;
use crate::sse;

// --- Chat streaming ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatStartRequest {
    pub title: Option<String>,
    pub message: Option<String>,
    pub model: Option<String>,
    /// Raw values so malformed entries can be dropped instead of failing
    /// the whole request.
    #[serde(default)]
    pub attachments: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSendRequest {
    pub task_id: Option<String>,
    pub message: Option<String>,
    pub model: Option<String>,
    #[serde(default)]
    pub attachments: Vec<serde_json::Value>,
}

pub async fn chat_start(
    state: State<GatewayState>,
    headers: HeaderMap,
    Json(request): Json<ChatStartRequest>,
) -> Response {
    match start_turn(state, headers, request).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub async fn chat_send(
    state: State<GatewayState>,
    headers: HeaderMap,
    Json(request): Json<ChatSendRequest>,
) -> Response {
    match send_turn(state, headers, request).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn start_turn(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    request: ChatStartRequest,
) -> Result<Response, ApiError> {
    let user_id = require_user(&headers)?;
    let message = validate_message(request.message.as_deref())?;
    let model = request.model.as_deref().unwrap_or(DEFAULT_MODEL);

    // Resolve before any writes so configuration errors leave no trace.
    let route = state
        .resolver
        .resolve(model, &user_id, state.store.as_ref(), state.vault.as_ref())
        .await?;

    let attachments = sanitize_attachments(request.attachments);
    let metadata = (!attachments.is_empty()).then(|| json!({ "hasAttachments": true }));
    let title = derive_title(request.title.as_deref(), message);

    let (task, user_message) = state
        .store
        .create_task_with_message(&user_id, &title, message, metadata)
        .await?;
    info!(task_id = %task.id, model, "started task");

    spawn_attachment_insert(&state, &user_message.id, &attachments);

    // First turn: no history yet.
    let turns = state
        .assembler
        .assemble(state.files.as_ref(), &[], message, &attachments)
        .await?;
    let stream = state
        .upstream
        .stream_completion(&route.api_key, &route.upstream_model_id, &turns)
        .await?;

    Ok(stream_response(&state, &task.id, stream, Some(ChatEvent::task_created(&task))).await)
}

async fn send_turn(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    request: ChatSendRequest,
) -> Result<Response, ApiError> {
    let user_id = require_user(&headers)?;
    let task_id = request
        .task_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("Task ID is required"))?;
    let message = validate_message(request.message.as_deref())?;
    let model = request.model.as_deref().unwrap_or(DEFAULT_MODEL);

    let task = state
        .store
        .get_task(task_id, &user_id)
        .await?
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "Task not found"))?;

    let route = state
        .resolver
        .resolve(model, &user_id, state.store.as_ref(), state.vault.as_ref())
        .await?;

    let attachments = sanitize_attachments(request.attachments);
    let metadata = (!attachments.is_empty()).then(|| json!({ "hasAttachments": true }));

    let user_message = state
        .store
        .create_message(&task.id, Role::User, message, metadata)
        .await?;
    debug!(task_id = %task.id, message_id = %user_message.id, "persisted user turn");

    spawn_attachment_insert(&state, &user_message.id, &attachments);

    let history = state
        .store
        .load_recent_messages(&task.id, HISTORY_WINDOW)
        .await?;
    let turns = state
        .assembler
        .assemble(state.files.as_ref(), &history, message, &attachments)
        .await?;
    let stream = state
        .upstream
        .stream_completion(&route.api_key, &route.upstream_model_id, &turns)
        .await?;

    Ok(stream_response(&state, &task.id, stream, None).await)
}

/// Model requested when the client names none.
const DEFAULT_MODEL: &str = "openclaw-pro";

fn validate_message(message: Option<&str>) -> Result<&str, ApiError> {
    let message = message.unwrap_or_default();
    if message.trim().is_empty() {
        return Err(ApiError::bad_request("Message is required"));
    }
    if message.chars().count() > MESSAGE_CHAR_LIMIT {
        return Err(ApiError::bad_request(format!(
            "Message must be {MESSAGE_CHAR_LIMIT} characters or less"
        )));
    }
    Ok(message)
}

fn derive_title(title: Option<&str>, message: &str) -> String {
    match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => title.chars().take(TITLE_CHAR_LIMIT).collect(),
        None => message.chars().take(100).collect(),
    }
}

/// Clamps the batch to the first five entries, then drops any entry that is
/// malformed, has an empty field, or declares an out-of-range size.
fn sanitize_attachments(raw: Vec<serde_json::Value>) -> Vec<AttachmentInput> {
    raw.into_iter()
        .take(MAX_ATTACHMENTS)
        .filter_map(|value| serde_json::from_value::<AttachmentInput>(value).ok())
        .filter(|att| {
            !att.file_name.is_empty()
                && !att.file_type.is_empty()
                && !att.storage_key.is_empty()
                && att.file_size > 0
                && att.file_size <= FILE_SIZE_LIMIT
        })
        .collect()
}

/// Attachment rows are best-effort: the turn proceeds even if they fail.
fn spawn_attachment_insert(state: &GatewayState, message_id: &str, attachments: &[AttachmentInput]) {
    if attachments.is_empty() {
        return;
    }
    let store = state.store.clone();
    let message_id = message_id.to_string();
    let attachments = attachments.to_vec();
    tokio::spawn(async move {
        if let Err(err) = store.create_attachments(&message_id, &attachments).await {
            warn!(message_id, %err, "failed to persist attachment rows");
        }
    });
}

async fn stream_response(
    state: &GatewayState,
    task_id: &str,
    upstream: UpstreamEventStream,
    envelope: Option<ChatEvent>,
) -> Response {
    let (tx, rx) = mpsc::channel(state.channel_capacity);
    if let Some(event) = envelope {
        // Capacity is at least one; the receiver has not been polled yet.
        let _ = tx.send(event).await;
    }

    let coordinator = state.coordinator.clone();
    let task_id = task_id.to_string();
    tokio::spawn(async move {
        let outcome = coordinator.relay(&task_id, upstream, tx).await;
        debug!(
            task_id,
            interrupted = outcome.interrupted,
            persisted = outcome.persisted.is_some(),
            "turn finished"
        );
    });

    sse::event_stream(rx).into_response()
}

// --- Models ---

#[derive(Debug, Serialize)]
struct ModelEntry {
    id: &'static str,
    name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    models: Vec<ModelEntry>,
    providers: Vec<&'static str>,
}

pub async fn list_models() -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: catalog::PLATFORM_MODELS
            .iter()
            .map(|m| ModelEntry {
                id: m.id,
                name: m.name,
            })
            .collect(),
        providers: catalog::BYOK_PROVIDERS.to_vec(),
    })
}

// --- Tasks ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail {
    task: Task,
    messages: Vec<Message>,
}

pub async fn list_tasks(
    State(state): State<GatewayState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Task>>, ApiError> {
    let user_id = require_user(&headers)?;
    Ok(Json(state.store.list_tasks(&user_id).await?))
}

pub async fn get_task(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path(task_id): Path<String>,
) -> Result<Json<TaskDetail>, ApiError> {
    let user_id = require_user(&headers)?;
    let task = state
        .store
        .get_task(&task_id, &user_id)
        .await?
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "Task not found"))?;
    let mut messages = state
        .store
        .load_recent_messages(&task_id, HISTORY_WINDOW)
        .await?;
    messages.reverse();
    Ok(Json(TaskDetail { task, messages }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub status: String,
}

pub async fn update_task(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path(task_id): Path<String>,
    Json(request): Json<UpdateTaskRequest>,
) -> Result<StatusCode, ApiError> {
    let user_id = require_user(&headers)?;
    let status: TaskStatus = request
        .status
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid status"))?;
    state
        .store
        .update_task_status(&task_id, &user_id, status)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_task(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Path(task_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user_id = require_user(&headers)?;
    state.store.delete_task(&task_id, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Provider keys ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutKeyRequest {
    pub provider: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct KeysResponse {
    providers: Vec<&'static str>,
}

/// Lists the BYOK providers the caller has a stored key for.
pub async fn list_keys(
    State(state): State<GatewayState>,
    headers: HeaderMap,
) -> Result<Json<KeysResponse>, ApiError> {
    let user_id = require_user(&headers)?;
    let mut providers = Vec::new();
    for provider in catalog::BYOK_PROVIDERS {
        if state.store.has_credential(&user_id, provider).await? {
            providers.push(*provider);
        }
    }
    Ok(Json(KeysResponse { providers }))
}

pub async fn put_api_key(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(request): Json<PutKeyRequest>,
) -> Result<StatusCode, ApiError> {
    let user_id = require_user(&headers)?;
    let provider = request
        .provider
        .as_deref()
        .filter(|p| catalog::is_byok_provider(p))
        .ok_or_else(|| ApiError::bad_request("Invalid provider"))?;
    let api_key = request
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ApiError::bad_request("API key is required"))?;

    state.store.put_credential(&user_id, provider, api_key).await?;
    info!(provider, "stored provider key");
    Ok(StatusCode::NO_CONTENT)
}

// --- Health ---

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_boundary_is_inclusive() {
        let at_limit = "a".repeat(MESSAGE_CHAR_LIMIT);
        assert!(validate_message(Some(&at_limit)).is_ok());

        let over = "a".repeat(MESSAGE_CHAR_LIMIT + 1);
        let err = validate_message(Some(&over)).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn limit_counts_characters_not_bytes() {
        let at_limit = "ü".repeat(MESSAGE_CHAR_LIMIT);
        assert!(at_limit.len() > MESSAGE_CHAR_LIMIT);
        assert!(validate_message(Some(&at_limit)).is_ok());
    }

    #[test]
    fn whitespace_only_message_is_rejected() {
        assert!(validate_message(Some("   \n  ")).is_err());
        assert!(validate_message(None).is_err());
    }

    #[test]
    fn title_falls_back_to_message_prefix() {
        assert_eq!(derive_title(None, "hello world"), "hello world");
        assert_eq!(derive_title(Some("  "), "hi"), "hi");
        assert_eq!(derive_title(Some("My task"), "hi"), "My task");

        let long_message = "m".repeat(300);
        assert_eq!(derive_title(None, &long_message).chars().count(), 100);

        let long_title = "t".repeat(TITLE_CHAR_LIMIT + 10);
        assert_eq!(
            derive_title(Some(&long_title), "hi").chars().count(),
            TITLE_CHAR_LIMIT
        );
    }

    #[test]
    fn attachment_batch_is_clamped_then_filtered() {
        let valid = |n: usize| {
            json!({
                "fileName": format!("f{n}.png"),
                "fileType": "image/png",
                "fileSize": 100,
                "storageKey": format!("up/{n}")
            })
        };
        let raw: Vec<_> = (0..8).map(valid).collect();
        assert_eq!(sanitize_attachments(raw).len(), MAX_ATTACHMENTS);
    }

    #[test]
    fn malformed_attachments_are_dropped_not_fatal() {
        let raw = vec![
            json!({"fileName": "a.pdf", "fileType": "application/pdf", "fileSize": 10, "storageKey": "up/a"}),
            json!({"fileName": "", "fileType": "text/plain", "fileSize": 10, "storageKey": "up/b"}),
            json!({"fileType": "text/plain"}),
            json!({"fileName": "big.bin", "fileType": "application/octet-stream",
                   "fileSize": FILE_SIZE_LIMIT + 1, "storageKey": "up/c"}),
            json!("not an object"),
        ];
        let kept = sanitize_attachments(raw);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].file_name, "a.pdf");
    }
}
