// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-of-turn behavior of the stream relay coordinator across every way an
//! upstream stream can end: sentinel, silent EOF, mid-stream failure,
//! stall, and client disconnect.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use openclaw_core::traits::TaskStore;
use openclaw_core::types::ChatEvent;
use openclaw_relay::TurnCoordinator;
use openclaw_test_utils::{MemoryTaskStore, ScriptedItem, ScriptedUpstream};

use openclaw_core::traits::CompletionUpstream;
use secrecy::SecretString;

const TIMEOUT: Duration = Duration::from_secs(5);

async fn make_task(store: &MemoryTaskStore) -> String {
    let (task, _) = store
        .create_task_with_message("user-1", "test", "hello", None)
        .await
        .unwrap();
    task.id
}

async fn run_relay(
    store: MemoryTaskStore,
    task_id: &str,
    script: Vec<ScriptedItem>,
    read_timeout: Duration,
) -> (openclaw_relay::TurnOutcome, Vec<ChatEvent>) {
    let upstream = ScriptedUpstream::new(script);
    let stream = upstream
        .stream_completion(&SecretString::from("sk-test".to_string()), "model", &[])
        .await
        .unwrap();

    let coordinator = TurnCoordinator::new(Arc::new(store), read_timeout);
    let (tx, mut rx) = mpsc::channel(16);

    let outcome = coordinator.relay(task_id, stream, tx).await;

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    (outcome, events)
}

#[tokio::test]
async fn sentinel_completion_emits_deltas_then_done() {
    // Scenario: three deltas then the sentinel.
    let store = MemoryTaskStore::new();
    let task_id = make_task(&store).await;

    let (outcome, events) = run_relay(
        store.clone(),
        &task_id,
        vec![
            ScriptedItem::Delta("The "),
            ScriptedItem::Delta("quick "),
            ScriptedItem::Delta("fox"),
            ScriptedItem::Done,
        ],
        TIMEOUT,
    )
    .await;

    assert_eq!(events.len(), 4);
    for (event, expected) in events.iter().zip(["The ", "quick ", "fox"]) {
        assert_eq!(
            event,
            &ChatEvent::Content {
                content: expected.to_string()
            }
        );
    }
    let persisted = outcome.persisted.expect("reply should be persisted");
    assert_eq!(persisted.content, "The quick fox");
    assert_eq!(persisted.metadata, None);
    assert_eq!(
        events[3],
        ChatEvent::done(Some(persisted.id.clone())),
        "terminal event carries the persisted id"
    );
    assert!(!outcome.interrupted);
    assert_eq!(store.complete_turn_calls().await, 1);
}

#[tokio::test]
async fn silent_eof_still_persists_and_emits_done() {
    let store = MemoryTaskStore::new();
    let task_id = make_task(&store).await;

    let (outcome, events) = run_relay(
        store.clone(),
        &task_id,
        vec![ScriptedItem::Delta("partial but complete")],
        TIMEOUT,
    )
    .await;

    let persisted = outcome.persisted.expect("reply should be persisted");
    assert_eq!(persisted.content, "partial but complete");
    assert_eq!(events.last(), Some(&ChatEvent::done(Some(persisted.id))));
    assert_eq!(store.complete_turn_calls().await, 1);
}

#[tokio::test]
async fn mid_stream_error_flushes_partial_with_error_marker() {
    // Scenario: two deltas then the connection drops.
    let store = MemoryTaskStore::new();
    let task_id = make_task(&store).await;

    let (outcome, events) = run_relay(
        store.clone(),
        &task_id,
        vec![
            ScriptedItem::Delta("partial "),
            ScriptedItem::Delta("reply"),
            ScriptedItem::Error("connection reset"),
        ],
        TIMEOUT,
    )
    .await;

    assert_eq!(events.len(), 3);
    assert_eq!(
        events[2],
        ChatEvent::Error {
            error: "Stream interrupted".to_string()
        },
        "client sees a generic message, not upstream detail"
    );

    let persisted = outcome.persisted.expect("partial output must survive");
    assert_eq!(persisted.content, "partial reply");
    assert_eq!(persisted.metadata.as_deref(), Some(r#"{"error":true}"#));
    assert!(outcome.interrupted);
    assert_eq!(store.complete_turn_calls().await, 1);
}

#[tokio::test]
async fn sentinel_with_empty_accumulator_closes_without_persisting() {
    let store = MemoryTaskStore::new();
    let task_id = make_task(&store).await;

    let (outcome, events) =
        run_relay(store.clone(), &task_id, vec![ScriptedItem::Done], TIMEOUT).await;

    assert!(outcome.persisted.is_none());
    assert_eq!(store.complete_turn_calls().await, 0);
    // The sentinel still yields a terminal done event, with no id to carry.
    assert_eq!(events, vec![ChatEvent::done(None)]);
}

#[tokio::test]
async fn silent_eof_with_empty_accumulator_emits_nothing() {
    let store = MemoryTaskStore::new();
    let task_id = make_task(&store).await;

    let (outcome, events) = run_relay(store.clone(), &task_id, vec![], TIMEOUT).await;

    assert!(outcome.persisted.is_none());
    assert!(events.is_empty());
    assert_eq!(store.complete_turn_calls().await, 0);
}

#[tokio::test]
async fn error_with_empty_accumulator_emits_error_only() {
    let store = MemoryTaskStore::new();
    let task_id = make_task(&store).await;

    let (outcome, events) = run_relay(
        store.clone(),
        &task_id,
        vec![ScriptedItem::Error("refused")],
        TIMEOUT,
    )
    .await;

    assert!(outcome.persisted.is_none());
    assert_eq!(store.complete_turn_calls().await, 0);
    assert_eq!(
        events,
        vec![ChatEvent::Error {
            error: "Stream interrupted".to_string()
        }]
    );
}

#[tokio::test]
async fn stalled_upstream_times_out_as_interrupted() {
    let store = MemoryTaskStore::new();
    let task_id = make_task(&store).await;

    let (outcome, events) = run_relay(
        store.clone(),
        &task_id,
        vec![
            ScriptedItem::Delta("before the stall"),
            ScriptedItem::Pause(Duration::from_secs(60)),
            ScriptedItem::Delta("never delivered"),
        ],
        Duration::from_millis(50),
    )
    .await;

    assert!(outcome.interrupted);
    let persisted = outcome.persisted.expect("pre-stall output must survive");
    assert_eq!(persisted.content, "before the stall");
    assert_eq!(persisted.metadata.as_deref(), Some(r#"{"error":true}"#));
    assert_eq!(
        events.last(),
        Some(&ChatEvent::Error {
            error: "Stream interrupted".to_string()
        })
    );
}

#[tokio::test]
async fn client_disconnect_still_flushes_partial_reply() {
    let store = MemoryTaskStore::new();
    let task_id = make_task(&store).await;

    let upstream = ScriptedUpstream::new(vec![
        ScriptedItem::Delta("first"),
        ScriptedItem::Delta("second"),
        ScriptedItem::Done,
    ]);
    let stream = upstream
        .stream_completion(&SecretString::from("sk-test".to_string()), "model", &[])
        .await
        .unwrap();

    let coordinator = TurnCoordinator::new(Arc::new(store.clone()), TIMEOUT);
    let (tx, mut rx) = mpsc::channel(16);

    // Receive the first delta, then hang up.
    let receiver = tokio::spawn(async move {
        let first = rx.recv().await;
        drop(rx);
        first
    });

    let outcome = coordinator.relay(&task_id, stream, tx).await;
    let first = receiver.await.unwrap();
    assert_eq!(
        first,
        Some(ChatEvent::Content {
            content: "first".to_string()
        })
    );

    assert!(outcome.interrupted);
    let persisted = outcome.persisted.expect("partial reply must be flushed");
    assert!(persisted.content.starts_with("first"));
    assert_eq!(persisted.metadata.as_deref(), Some(r#"{"error":true}"#));
    assert_eq!(store.complete_turn_calls().await, 1);
}

#[tokio::test]
async fn terminal_event_is_always_last() {
    let store = MemoryTaskStore::new();
    let task_id = make_task(&store).await;

    let (_, events) = run_relay(
        store,
        &task_id,
        vec![
            ScriptedItem::Delta("a"),
            ScriptedItem::Delta("b"),
            ScriptedItem::Done,
        ],
        TIMEOUT,
    )
    .await;

    let terminal_positions: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e, ChatEvent::Done { .. } | ChatEvent::Error { .. }))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(terminal_positions, vec![events.len() - 1]);
}

mod roundtrip {
    use super::*;
    use proptest::prelude::*;

    // Deltas concatenated in order always equal the persisted content,
    // whether the stream ends with a sentinel or not.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn concatenated_deltas_equal_persisted_content(
            deltas in prop::collection::vec("[a-zA-Z0-9 .,!?]{1,16}", 1..12),
            with_sentinel in any::<bool>(),
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();
            runtime.block_on(async {
                let store = MemoryTaskStore::new();
                let task_id = make_task(&store).await;

                let leaked: Vec<&'static str> = deltas
                    .iter()
                    .map(|d| Box::leak(d.clone().into_boxed_str()) as &'static str)
                    .collect();
                let mut script: Vec<ScriptedItem> =
                    leaked.iter().map(|d| ScriptedItem::Delta(d)).collect();
                if with_sentinel {
                    script.push(ScriptedItem::Done);
                }

                let (outcome, events) =
                    run_relay(store.clone(), &task_id, script, TIMEOUT).await;

                let expected: String = deltas.concat();
                let persisted = outcome.persisted.expect("non-empty turn persists");
                assert_eq!(persisted.content, expected);
                assert_eq!(store.complete_turn_calls().await, 1);

                let streamed: String = events
                    .iter()
                    .filter_map(|e| match e {
                        ChatEvent::Content { content } => Some(content.as_str()),
                        _ => None,
                    })
                    .collect();
                assert_eq!(streamed, expected);
            });
        }
    }
}
