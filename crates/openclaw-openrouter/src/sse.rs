// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE stream parser for OpenRouter streaming completions.
//!
//! Converts a reqwest response byte stream into [`UpstreamEvent`]s using the
//! `eventsource-stream` crate for SSE protocol compliance. OpenRouter sends
//! data-only events: JSON chunks, then a literal `[DONE]` sentinel.

use eventsource_stream::Eventsource;
use futures::stream::StreamExt;
use tracing::trace;

use openclaw_core::error::RelayError;
use openclaw_core::traits::UpstreamEventStream;
use openclaw_core::types::UpstreamEvent;

use crate::types::StreamChunk;

/// Marker the provider sends when the turn is complete.
const DONE_SENTINEL: &str = "[DONE]";

/// Parses a streaming response into [`UpstreamEvent`]s.
///
/// Malformed JSON chunks and chunks without a content delta are silently
/// skipped; providers interleave keep-alives and metadata chunks freely.
/// Transport failures surface as `Err` items.
pub fn parse_sse_stream(response: reqwest::Response) -> UpstreamEventStream {
    let event_stream = response.bytes_stream().eventsource();

    let mapped = event_stream.filter_map(|result| async move {
        match result {
            Ok(event) => {
                if event.data == DONE_SENTINEL {
                    return Some(Ok(UpstreamEvent::Done));
                }
                match serde_json::from_str::<StreamChunk>(&event.data) {
                    Ok(chunk) => chunk
                        .delta_content()
                        .map(|delta| Ok(UpstreamEvent::Delta(delta.to_string()))),
                    Err(err) => {
                        trace!(%err, "skipping malformed stream chunk");
                        None
                    }
                }
            }
            Err(e) => Some(Err(RelayError::Upstream {
                message: format!("SSE stream error: {e}"),
                source: Some(Box::new(e)),
            })),
        }
    });

    Box::pin(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_sse_response(sse_text: &str) -> reqwest::Response {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(sse_text.to_string()),
            )
            .mount(&server)
            .await;
        reqwest::get(&server.uri()).await.unwrap()
    }

    async fn collect(sse_text: &str) -> Vec<UpstreamEvent> {
        let response = mock_sse_response(sse_text).await;
        let mut stream = parse_sse_stream(response);
        let mut events = Vec::new();
        while let Some(item) = stream.next().await {
            events.push(item.unwrap());
        }
        events
    }

    #[tokio::test]
    async fn deltas_then_sentinel() {
        let sse = "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n\
                   data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n\
                   data: [DONE]\n\n";
        let events = collect(sse).await;
        assert_eq!(
            events,
            vec![
                UpstreamEvent::Delta("Hel".into()),
                UpstreamEvent::Delta("lo".into()),
                UpstreamEvent::Done,
            ]
        );
    }

    #[tokio::test]
    async fn malformed_chunks_are_skipped() {
        let sse = "data: {not json at all\n\n\
                   data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n\n\
                   data: [DONE]\n\n";
        let events = collect(sse).await;
        assert_eq!(
            events,
            vec![UpstreamEvent::Delta("ok".into()), UpstreamEvent::Done]
        );
    }

    #[tokio::test]
    async fn empty_and_role_only_deltas_are_skipped() {
        let sse = "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n\
                   data: {\"choices\":[{\"delta\":{\"content\":\"\"}}]}\n\n\
                   data: {\"choices\":[]}\n\n\
                   data: [DONE]\n\n";
        let events = collect(sse).await;
        assert_eq!(events, vec![UpstreamEvent::Done]);
    }

    #[tokio::test]
    async fn comment_lines_are_ignored() {
        // OpenRouter sends processing comments as keep-alives.
        let sse = ": OPENROUTER PROCESSING\n\n\
                   data: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\n\n\
                   data: [DONE]\n\n";
        let events = collect(sse).await;
        assert_eq!(
            events,
            vec![UpstreamEvent::Delta("x".into()), UpstreamEvent::Done]
        );
    }

    #[tokio::test]
    async fn eof_without_sentinel_just_ends() {
        let sse = "data: {\"choices\":[{\"delta\":{\"content\":\"partial\"}}]}\n\n";
        let events = collect(sse).await;
        assert_eq!(events, vec![UpstreamEvent::Delta("partial".into())]);
    }
}
