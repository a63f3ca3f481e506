// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenRouter chat-completions API.
//!
//! One client instance serves every request; the bearer credential is
//! per-request because platform and BYOK turns use different keys.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error};

use openclaw_core::error::RelayError;
use openclaw_core::traits::{CompletionUpstream, UpstreamEventStream};
use openclaw_core::types::ChatTurn;

use crate::sse;
use crate::types::CompletionRequest;

/// Default base URL for the OpenRouter API.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Streaming completion client for OpenRouter.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    base_url: String,
    referer: String,
    app_title: String,
}

impl OpenRouterClient {
    /// Creates a new client.
    ///
    /// `referer` and `app_title` are sent as the `HTTP-Referer` and
    /// `X-Title` attribution headers on every request.
    pub fn new(
        base_url: &str,
        referer: &str,
        app_title: &str,
        connect_timeout: Duration,
    ) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| RelayError::Upstream {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            referer: referer.to_string(),
            app_title: app_title.to_string(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionUpstream for OpenRouterClient {
    /// Opens a single streaming request. No retry at this layer; retry
    /// policy, if any, belongs to the caller.
    async fn stream_completion(
        &self,
        api_key: &SecretString,
        model: &str,
        turns: &[ChatTurn],
    ) -> Result<UpstreamEventStream, RelayError> {
        let body = CompletionRequest::streaming(model, turns);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key.expose_secret())
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.app_title)
            .json(&body)
            .send()
            .await
            .map_err(|e| RelayError::Upstream {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, model, "completion response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Captured for logs; never surfaced verbatim to the client.
            error!(status = %status, body = %body, "upstream rejected completion request");
            return Err(RelayError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        if response.content_length() == Some(0) {
            return Err(RelayError::UpstreamEmptyBody);
        }

        Ok(sse::parse_sse_stream(response))
    }
}
