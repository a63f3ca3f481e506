// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bridging the relay's event channel onto an SSE response body.

use std::convert::Infallible;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::error;

use openclaw_core::types::ChatEvent;

/// Turns the relay's channel into a `text/event-stream` response. Every
/// chat event becomes one `data: {json}` frame; the body ends when the
/// relay drops its sender.
pub fn event_stream(
    rx: mpsc::Receiver<ChatEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = ReceiverStream::new(rx).map(|event| {
        let frame = match Event::default().json_data(&event) {
            Ok(frame) => frame,
            Err(err) => {
                error!(%err, "failed to serialize chat event");
                Event::default().data(r#"{"error":"Stream interrupted"}"#)
            }
        };
        Ok(frame)
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
