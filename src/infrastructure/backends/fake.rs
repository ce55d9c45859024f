use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream;

use crate::domain::models::Backend;
use crate::domain::models::BackendError;
use crate::domain::models::BackendPrompt;
use crate::domain::models::CompletionStream;
use crate::domain::models::StreamChunk;

/// In-memory inference service. The `alive` flag is shared so a fake service
/// controller can bring it up.
#[derive(Clone)]
pub struct FakeBackend {
    pub alive: Arc<AtomicBool>,
    pub models: Vec<String>,
    pub reply: Result<String, BackendError>,
    pub chunks: Vec<Result<StreamChunk, BackendError>>,
    pub pull_fails: bool,
    pub pulled: Arc<Mutex<Vec<String>>>,
    pub prompts: Arc<Mutex<Vec<BackendPrompt>>>,
}

impl Default for FakeBackend {
    fn default() -> FakeBackend {
        return FakeBackend {
            alive: Arc::new(AtomicBool::new(true)),
            models: vec![],
            reply: Ok("".to_string()),
            chunks: vec![],
            pull_fails: false,
            pulled: Arc::new(Mutex::new(vec![])),
            prompts: Arc::new(Mutex::new(vec![])),
        };
    }
}

impl FakeBackend {
    fn check_alive(&self) -> Result<(), BackendError> {
        if !self.alive.load(Ordering::SeqCst) {
            return Err(BackendError::Transport("connection refused".to_string()));
        }

        return Ok(());
    }

    pub fn pulled(&self) -> Vec<String> {
        return self.pulled.lock().unwrap().clone();
    }

    pub fn prompts(&self) -> Vec<BackendPrompt> {
        return self.prompts.lock().unwrap().clone();
    }
}

#[async_trait]
impl Backend for FakeBackend {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<(), BackendError> {
        return self.check_alive();
    }

    #[allow(clippy::implicit_return)]
    async fn list_models(&self) -> Result<Vec<String>, BackendError> {
        self.check_alive()?;
        return Ok(self.models.clone());
    }

    #[allow(clippy::implicit_return)]
    async fn pull_model(&self, name: &str) -> Result<(), BackendError> {
        self.check_alive()?;
        if self.pull_fails {
            return Err(BackendError::Status(404));
        }
        self.pulled.lock().unwrap().push(name.to_string());
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn get_completion(&self, prompt: BackendPrompt) -> Result<String, BackendError> {
        self.check_alive()?;
        self.prompts.lock().unwrap().push(prompt);
        return self.reply.clone();
    }

    #[allow(clippy::implicit_return)]
    async fn stream_completion(
        &self,
        prompt: BackendPrompt,
    ) -> Result<CompletionStream, BackendError> {
        self.check_alive()?;
        self.prompts.lock().unwrap().push(prompt);
        return Ok(Box::pin(stream::iter(self.chunks.clone())));
    }
}
