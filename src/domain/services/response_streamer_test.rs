use std::sync::atomic::Ordering;

use futures::StreamExt;

use super::ResponseStreamer;
use crate::domain::models::BackendBox;
use crate::domain::models::BackendError;
use crate::domain::models::BackendPrompt;
use crate::domain::models::MessageType;
use crate::domain::models::ResponseMode;
use crate::domain::models::StreamChunk;
use crate::infrastructure::backends::fake::FakeBackend;

fn prompt() -> BackendPrompt {
    return BackendPrompt::new("llama3", "User: hello".to_string());
}

async fn collect(fake: FakeBackend, mode: ResponseMode) -> Vec<StreamChunk> {
    let backend: BackendBox = Box::new(fake);
    return ResponseStreamer::generate(&backend, prompt(), mode)
        .await
        .collect::<Vec<StreamChunk>>()
        .await;
}

#[tokio::test]
async fn it_yields_one_chunk_in_batch_mode() {
    let fake = FakeBackend {
        reply: Ok("hi there".to_string()),
        ..FakeBackend::default()
    };
    let prompts = fake.clone();

    let chunks = collect(fake, ResponseMode::Batch).await;
    assert_eq!(chunks, vec![StreamChunk::new("hi there", true)]);
    assert_eq!(prompts.prompts(), vec![prompt()]);
}

#[tokio::test]
async fn it_reports_batch_timeouts() {
    let fake = FakeBackend {
        reply: Err(BackendError::Timeout),
        ..FakeBackend::default()
    };

    let chunks = collect(fake, ResponseMode::Batch).await;
    assert_eq!(
        chunks,
        vec![StreamChunk::error("Error: the model took too long to respond.")]
    );
}

#[tokio::test]
async fn it_stops_at_the_first_done_record() {
    let fake = FakeBackend {
        chunks: vec![
            Ok(StreamChunk::new("Hello", false)),
            Ok(StreamChunk::new(" world", true)),
            Ok(StreamChunk::new("ignored", false)),
        ],
        ..FakeBackend::default()
    };

    let chunks = collect(fake, ResponseMode::Incremental).await;
    assert_eq!(
        chunks,
        vec![
            StreamChunk::new("Hello", false),
            StreamChunk::new(" world", true),
        ]
    );
}

#[tokio::test]
async fn it_continues_past_malformed_records() {
    let fake = FakeBackend {
        chunks: vec![
            Ok(StreamChunk::new("Hello", false)),
            Err(BackendError::Protocol {
                line: "{\"response\": \"broken".to_string(),
                reason: "EOF while parsing a string".to_string(),
            }),
            Ok(StreamChunk::new("!", true)),
        ],
        ..FakeBackend::default()
    };

    let chunks = collect(fake, ResponseMode::Incremental).await;
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[1].mtype, MessageType::Warning);
    assert!(!chunks[1].done);
    assert_eq!(chunks[1].text, "Error decoding JSON: {\"response\": \"broken");
    assert_eq!(chunks[2], StreamChunk::new("!", true));
}

#[tokio::test]
async fn it_ends_with_an_error_on_transport_failure() {
    let fake = FakeBackend {
        chunks: vec![
            Ok(StreamChunk::new("Hel", false)),
            Err(BackendError::Transport("connection reset".to_string())),
            Ok(StreamChunk::new("lo", true)),
        ],
        ..FakeBackend::default()
    };

    let chunks = collect(fake, ResponseMode::Incremental).await;
    assert_eq!(
        chunks,
        vec![
            StreamChunk::new("Hel", false),
            StreamChunk::error(
                "Error: could not reach the inference service: connection reset"
            ),
        ]
    );
}

#[tokio::test]
async fn it_yields_exactly_one_error_when_unreachable() {
    for mode in [ResponseMode::Batch, ResponseMode::Incremental] {
        let fake = FakeBackend::default();
        fake.alive.store(false, Ordering::SeqCst);

        let chunks = collect(fake, mode).await;
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].done);
        assert_eq!(chunks[0].mtype, MessageType::Error);
    }
}

#[tokio::test]
async fn it_ends_with_an_error_when_the_stream_closes_early() {
    let fake = FakeBackend {
        chunks: vec![Ok(StreamChunk::new("Hello", false))],
        ..FakeBackend::default()
    };

    let chunks = collect(fake, ResponseMode::Incremental).await;
    assert_eq!(
        chunks,
        vec![
            StreamChunk::new("Hello", false),
            StreamChunk::error("Error: the response ended before the model finished."),
        ]
    );
}

#[tokio::test]
async fn it_reports_stalled_streams_as_too_slow() {
    let fake = FakeBackend {
        chunks: vec![
            Ok(StreamChunk::new("Hel", false)),
            Err(BackendError::Timeout),
            Ok(StreamChunk::new("lo", true)),
        ],
        ..FakeBackend::default()
    };

    let chunks = collect(fake, ResponseMode::Incremental).await;
    assert_eq!(
        chunks,
        vec![
            StreamChunk::new("Hel", false),
            StreamChunk::error("Error: the model took too long to respond."),
        ]
    );
}
