#[cfg(test)]
#[path = "ollama_test.rs"]
mod tests;

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream;
use futures::stream::TryStreamExt;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use tokio::io::AsyncBufReadExt;
use tokio_util::io::StreamReader;

use crate::configuration::Settings;
use crate::domain::models::Backend;
use crate::domain::models::BackendError;
use crate::domain::models::BackendPrompt;
use crate::domain::models::CompletionStream;
use crate::domain::models::StreamChunk;

fn convert_err(err: reqwest::Error) -> io::Error {
    let kind = if err.is_timeout() {
        io::ErrorKind::TimedOut
    } else {
        io::ErrorKind::Interrupted
    };
    return io::Error::new(kind, err.to_string());
}

fn read_err(err: io::Error) -> BackendError {
    if err.kind() == io::ErrorKind::TimedOut {
        return BackendError::Timeout;
    }

    return BackendError::Transport(err.to_string());
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CompletionRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Model {
    name: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ModelListResponse {
    #[serde(default)]
    pub models: Vec<Model>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PullRequest {
    model_name: String,
}

fn parse_line(line: &str) -> Result<StreamChunk, BackendError> {
    match serde_json::from_str::<CompletionResponse>(line) {
        Ok(ores) => {
            tracing::debug!(body = ?ores, "Completion response");
            return Ok(StreamChunk::new(&ores.response, ores.done));
        }
        Err(err) => {
            return Err(BackendError::Protocol {
                line: line.to_string(),
                reason: err.to_string(),
            });
        }
    }
}

/// Decodes one raw body segment. Blank segments yield nothing, bytes that are
/// not UTF-8 are a protocol error for that record only.
fn parse_record(record: Vec<u8>) -> Option<Result<StreamChunk, BackendError>> {
    match String::from_utf8(record) {
        Ok(line) => {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            return Some(parse_line(line));
        }
        Err(err) => {
            let line = String::from_utf8_lossy(err.as_bytes()).trim().to_string();
            return Some(Err(BackendError::Protocol {
                line,
                reason: err.to_string(),
            }));
        }
    }
}

pub struct Ollama {
    url: String,
    health_check_timeout: Duration,
    generate_timeout: Duration,
    client: reqwest::Client,
}

impl Ollama {
    pub fn new(settings: &Settings) -> Ollama {
        return Ollama {
            url: settings.ollama_url.to_string(),
            health_check_timeout: settings.health_check_timeout,
            generate_timeout: settings.generate_timeout,
            client: reqwest::Client::new(),
        };
    }

    async fn send_completion(
        &self,
        prompt: BackendPrompt,
        stream: bool,
    ) -> Result<reqwest::Response, BackendError> {
        let req = CompletionRequest {
            model: prompt.model,
            prompt: prompt.text,
            stream,
        };

        // Streamed bodies are bounded per record instead of as a whole.
        let mut builder = self
            .client
            .post(format!("{url}/api/generate", url = self.url))
            .json(&req);
        if !stream {
            builder = builder.timeout(self.generate_timeout);
        }

        let res = match tokio::time::timeout(self.generate_timeout, builder.send()).await {
            Ok(res) => res?,
            Err(_) => {
                tracing::error!("Ollama did not answer the completion request in time");
                return Err(BackendError::Timeout);
            }
        };

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                "Failed to make completion request to Ollama"
            );
            return Err(BackendError::Status(res.status().as_u16()));
        }

        return Ok(res);
    }
}

#[async_trait]
impl Backend for Ollama {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<(), BackendError> {
        let res = self
            .client
            .get(format!("{url}/api/tags", url = self.url))
            .timeout(self.health_check_timeout)
            .send()
            .await;

        let res = match res {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = ?err, "Ollama is not running");
                return Err(err.into());
            }
        };

        if res.status() != 200 {
            tracing::error!(status = res.status().as_u16(), "Ollama health check failed");
            return Err(BackendError::Status(res.status().as_u16()));
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn list_models(&self) -> Result<Vec<String>, BackendError> {
        let res = self
            .client
            .get(format!("{url}/api/tags", url = self.url))
            .timeout(self.health_check_timeout)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "Failed to list Ollama models");
            return Err(BackendError::Status(res.status().as_u16()));
        }

        let body = res.text().await?;
        let list = serde_json::from_str::<ModelListResponse>(&body).map_err(|err| {
            return BackendError::Protocol {
                line: body.to_string(),
                reason: err.to_string(),
            };
        })?;

        let models: Vec<String> = list
            .models
            .iter()
            .map(|model| {
                return model.name.to_string();
            })
            .collect();

        return Ok(models);
    }

    #[allow(clippy::implicit_return)]
    async fn pull_model(&self, name: &str) -> Result<(), BackendError> {
        let req = PullRequest {
            model_name: name.to_string(),
        };

        let res = self
            .client
            .post(format!("{url}/api/models/pull", url = self.url))
            .timeout(self.generate_timeout)
            .json(&req)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                model = name,
                "Failed to pull model"
            );
            return Err(BackendError::Status(res.status().as_u16()));
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn get_completion(&self, prompt: BackendPrompt) -> Result<String, BackendError> {
        let res = self.send_completion(prompt, false).await?;
        let body = res.text().await?;
        let ores = serde_json::from_str::<CompletionResponse>(&body).map_err(|err| {
            return BackendError::Protocol {
                line: body.to_string(),
                reason: err.to_string(),
            };
        })?;

        return Ok(ores.response);
    }

    #[allow(clippy::implicit_return)]
    async fn stream_completion(
        &self,
        prompt: BackendPrompt,
    ) -> Result<CompletionStream, BackendError> {
        let res = self.send_completion(prompt, true).await?;

        let idle_timeout = self.generate_timeout;
        let stream = res.bytes_stream().map_err(convert_err);
        let records = StreamReader::new(stream).split(b'\n');

        let chunks = stream::unfold(Some(records), move |state| {
            return async move {
                let mut records = match state {
                    Some(records) => records,
                    None => return None,
                };
                loop {
                    let record =
                        match tokio::time::timeout(idle_timeout, records.next_segment()).await {
                            Ok(record) => record,
                            Err(_) => {
                                tracing::error!(
                                    idle_timeout_ms = idle_timeout.as_millis() as u64,
                                    "Ollama response stream stalled"
                                );
                                return Some((Err(BackendError::Timeout), None));
                            }
                        };

                    match record {
                        Ok(Some(record)) => {
                            if let Some(item) = parse_record(record) {
                                return Some((item, Some(records)));
                            }
                        }
                        Ok(None) => return None,
                        Err(err) => {
                            tracing::error!(error = ?err, "Ollama response stream failed");
                            return Some((Err(read_err(err)), None));
                        }
                    }
                }
            };
        });

        return Ok(Box::pin(chunks));
    }
}
