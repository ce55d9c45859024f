#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;

use async_trait::async_trait;
use futures::stream::BoxStream;
use strum::EnumString;
use strum::EnumVariantNames;

use super::BackendError;
use super::StreamChunk;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendPrompt {
    pub model: String,
    pub text: String,
}

impl BackendPrompt {
    pub fn new(model: &str, text: String) -> BackendPrompt {
        return BackendPrompt {
            model: model.to_string(),
            text,
        };
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumString, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ResponseMode {
    Batch,
    Incremental,
}

/// Records parsed from an incremental response body, one per non-empty line.
pub type CompletionStream = BoxStream<'static, Result<StreamChunk, BackendError>>;

#[async_trait]
pub trait Backend {
    /// Resolves when the service answers its model listing endpoint within the
    /// health check timeout.
    async fn health_check(&self) -> Result<(), BackendError>;

    /// Names of every model the service has available locally, in the order
    /// the service reports them.
    async fn list_models(&self) -> Result<Vec<String>, BackendError>;

    /// Asks the service to fetch a model by name. Resolves once the service
    /// acknowledges the request.
    async fn pull_model(&self, name: &str) -> Result<(), BackendError>;

    /// Requests a single, complete response.
    async fn get_completion(&self, prompt: BackendPrompt) -> Result<String, BackendError>;

    /// Opens an incremental response. A malformed record shows up as a
    /// `BackendError::Protocol` item and does not end the stream, a transport
    /// failure is the last item.
    async fn stream_completion(
        &self,
        prompt: BackendPrompt,
    ) -> Result<CompletionStream, BackendError>;
}

pub type BackendBox = Box<dyn Backend + Send + Sync>;
