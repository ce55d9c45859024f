#[cfg(test)]
#[path = "response_streamer_test.rs"]
mod tests;

use futures::stream;
use futures::stream::BoxStream;
use futures::StreamExt;

use crate::domain::models::BackendBox;
use crate::domain::models::BackendError;
use crate::domain::models::BackendPrompt;
use crate::domain::models::CompletionStream;
use crate::domain::models::ResponseMode;
use crate::domain::models::StreamChunk;

fn error_chunk(err: &BackendError) -> StreamChunk {
    if *err == BackendError::Timeout {
        return StreamChunk::error("Error: the model took too long to respond.");
    }

    return StreamChunk::error(&format!("Error: {err}"));
}

fn next_chunk(
    res: Option<Result<StreamChunk, BackendError>>,
) -> (StreamChunk, bool) {
    match res {
        Some(Ok(chunk)) => {
            let done = chunk.done;
            return (chunk, done);
        }
        Some(Err(BackendError::Protocol { line, reason })) => {
            tracing::warn!(line = %line, reason = %reason, "Failed to decode response record");
            return (
                StreamChunk::warning(&format!("Error decoding JSON: {line}")),
                false,
            );
        }
        Some(Err(err)) => {
            tracing::error!(error = ?err, "Response stream failed");
            return (error_chunk(&err), true);
        }
        None => {
            tracing::warn!("Response stream closed before the final record");
            return (
                StreamChunk::error("Error: the response ended before the model finished."),
                true,
            );
        }
    }
}

fn incremental(records: CompletionStream) -> BoxStream<'static, StreamChunk> {
    return stream::unfold(Some(records), |state| {
        return async move {
            let mut records = match state {
                Some(records) => records,
                None => return None,
            };

            let (chunk, done) = next_chunk(records.next().await);
            if done {
                return Some((chunk, None));
            }

            return Some((chunk, Some(records)));
        };
    })
    .boxed();
}

pub struct ResponseStreamer {}

impl ResponseStreamer {
    /// Issues a generation request. The returned stream is finite and its
    /// last chunk is always `done`, failures included.
    pub async fn generate(
        backend: &BackendBox,
        prompt: BackendPrompt,
        mode: ResponseMode,
    ) -> BoxStream<'static, StreamChunk> {
        match mode {
            ResponseMode::Batch => {
                let chunk = match backend.get_completion(prompt).await {
                    Ok(text) => StreamChunk::new(&text, true),
                    Err(err) => {
                        tracing::error!(error = ?err, "Completion request failed");
                        error_chunk(&err)
                    }
                };
                return stream::iter(vec![chunk]).boxed();
            }
            ResponseMode::Incremental => match backend.stream_completion(prompt).await {
                Ok(records) => return incremental(records),
                Err(err) => {
                    tracing::error!(error = ?err, "Streaming completion request failed");
                    return stream::iter(vec![error_chunk(&err)]).boxed();
                }
            },
        }
    }
}
