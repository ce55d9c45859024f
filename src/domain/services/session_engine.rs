#[cfg(test)]
#[path = "session_engine_test.rs"]
mod tests;

use anyhow::Result;
use futures::StreamExt;

use super::CommandDispatcher;
use super::ConnectionProbe;
use super::DispatchOutcome;
use super::ModelRegistry;
use super::ProgressIndicator;
use super::ResponseStreamer;
use crate::configuration::Settings;
use crate::domain::models::BackendBox;
use crate::domain::models::BackendPrompt;
use crate::domain::models::ConnectionStatus;
use crate::domain::models::ConsoleBox;
use crate::domain::models::MessageType;
use crate::domain::models::ModelDescriptor;
use crate::domain::models::ResponseMode;
use crate::domain::models::ServiceBox;
use crate::domain::models::SessionState;
use crate::domain::models::Speaker;
use crate::domain::models::StartupError;

const HEADER_WIDTH: usize = 50;

#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
pub enum EnginePhase {
    Initializing,
    SelectingModel,
    Chatting,
    Terminated,
}

/// Drives a chat session against the inference service. Owns the session
/// state, all mutation goes through the methods below.
pub struct SessionEngine {
    settings: Settings,
    backend: BackendBox,
    service: ServiceBox,
    console: ConsoleBox,
    state: SessionState,
    phase: EnginePhase,
}

impl SessionEngine {
    pub fn new(
        settings: Settings,
        backend: BackendBox,
        service: ServiceBox,
        console: ConsoleBox,
    ) -> SessionEngine {
        return SessionEngine {
            settings,
            backend,
            service,
            console,
            state: SessionState::default(),
            phase: EnginePhase::Initializing,
        };
    }

    pub fn state(&self) -> &SessionState {
        return &self.state;
    }

    pub fn phase(&self) -> EnginePhase {
        return self.phase;
    }

    /// Runs until the user quits or input ends. Only a service that stays
    /// unreachable at startup returns an error.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            tracing::debug!(phase = %self.phase, "Session step");
            match self.phase {
                EnginePhase::Initializing => self.initialize().await?,
                EnginePhase::SelectingModel => self.select_model().await?,
                EnginePhase::Chatting => self.chat().await?,
                EnginePhase::Terminated => return Ok(()),
            }
        }
    }

    pub fn notify(&mut self, text: &str, mtype: MessageType) -> Result<()> {
        return self.console.write_line(text, mtype);
    }

    async fn probe(&mut self) -> bool {
        let alive = ConnectionProbe::is_alive(&self.backend).await;
        self.state.connection_status = ConnectionStatus::from(alive);
        return alive;
    }

    async fn initialize(&mut self) -> Result<()> {
        self.clear_screen()?;

        if !self.probe().await {
            self.notify(
                "The inference service is not reachable, starting it...",
                MessageType::Warning,
            )?;
            if let Err(err) = self.service.start().await {
                self.notify(&err.to_string(), MessageType::Error)?;
            }
            tokio::time::sleep(self.settings.settle_delay).await;

            if !self.probe().await {
                self.phase = EnginePhase::Terminated;
                return Err(StartupError::Unreachable {
                    url: self.settings.ollama_url.to_string(),
                }
                .into());
            }
            self.notify("Connected to the inference service.", MessageType::Info)?;
        }

        self.phase = EnginePhase::SelectingModel;
        return Ok(());
    }

    async fn select_model(&mut self) -> Result<()> {
        if let Some(name) = self.settings.model.clone() {
            self.set_model(ModelDescriptor::new(&name))?;
            self.phase = EnginePhase::Chatting;
            return Ok(());
        }

        let available = ModelRegistry::list(&self.backend, &mut self.console).await?;
        match ModelRegistry::select(&self.backend, &mut self.console, &available).await? {
            Some(model) => {
                self.set_model(model)?;
                self.phase = EnginePhase::Chatting;
            }
            None => {
                self.phase = EnginePhase::Terminated;
            }
        }

        return Ok(());
    }

    async fn chat(&mut self) -> Result<()> {
        let line = match self.console.read_line("\nYou: ").await? {
            Some(line) => line,
            None => {
                self.phase = EnginePhase::Terminated;
                return Ok(());
            }
        };

        let input = line.trim();
        if input.is_empty() {
            return Ok(());
        }

        match CommandDispatcher::dispatch(input, self).await? {
            DispatchOutcome::Exit => {
                self.notify("Goodbye!", MessageType::Normal)?;
                self.phase = EnginePhase::Terminated;
            }
            DispatchOutcome::Handled => {}
            DispatchOutcome::NotACommand => self.send_message(input).await?,
        }

        return Ok(());
    }

    async fn send_message(&mut self, text: &str) -> Result<()> {
        let current_model = self
            .state
            .current_model
            .as_ref()
            .map(|model| return model.name.to_string());
        let model = match current_model {
            Some(model) => model,
            None => {
                self.notify(
                    "No model selected. Use /change to pick one.",
                    MessageType::Warning,
                )?;
                return Ok(());
            }
        };

        self.state.history.push(Speaker::User, text);
        let prompt = BackendPrompt::new(&model, self.state.history.to_prompt());

        if !self.probe().await {
            self.notify(
                "Warning: the inference service is not reachable, trying anyway.",
                MessageType::Warning,
            )?;
        }

        let mode = self.settings.response_mode;
        let mut chunks = match mode {
            ResponseMode::Batch => {
                let indicator =
                    ProgressIndicator::start(self.console.progress_writer(), "Thinking ");
                let chunks = ResponseStreamer::generate(&self.backend, prompt, mode).await;
                indicator.stop().await;
                chunks
            }
            ResponseMode::Incremental => {
                ResponseStreamer::generate(&self.backend, prompt, mode).await
            }
        };

        self.console.write(&format!("\n{model}: "), MessageType::Info)?;

        let mut reply = String::new();
        while let Some(chunk) = chunks.next().await {
            if chunk.is_model_text() {
                self.console.render(&chunk.text).await?;
                reply.push_str(&chunk.text);
            } else {
                self.console.write(&format!("\n{}", chunk.text), chunk.mtype)?;
            }
        }
        self.console.write("\n", MessageType::Normal)?;

        if !reply.is_empty() {
            self.state.history.push(Speaker::Assistant, &reply);
        }
        tracing::debug!(turns = self.state.history.len(), "Completed chat turn");

        return self.notify(&"-".repeat(HEADER_WIDTH), MessageType::Normal);
    }

    fn set_model(&mut self, model: ModelDescriptor) -> Result<()> {
        let text = format!("{} has entered the chat.", model.name);
        self.state.current_model = Some(model);
        return self.notify(&text, MessageType::Info);
    }

    pub fn reset_history(&mut self) -> Result<()> {
        self.state.history.clear();
        return self.notify("Conversation history cleared.", MessageType::Info);
    }

    pub fn clear_screen(&mut self) -> Result<()> {
        self.console.clear_screen()?;
        let rule = "=".repeat(HEADER_WIDTH);
        self.notify(&rule, MessageType::Normal)?;
        self.notify("Belullama Chat", MessageType::Normal)?;
        self.notify(&rule, MessageType::Normal)?;
        return self.notify("Type /help for a list of commands.", MessageType::Info);
    }

    pub async fn refresh_status(&mut self) -> Result<()> {
        let url = self.settings.ollama_url.to_string();
        if self.probe().await {
            return self.notify(
                &format!("Connected to the inference service at {url}."),
                MessageType::Info,
            );
        }

        return self.notify(
            &format!("The inference service at {url} is not reachable."),
            MessageType::Warning,
        );
    }

    pub async fn start_service(&mut self) -> Result<()> {
        self.notify("Starting the inference service...", MessageType::Info)?;
        if let Err(err) = self.service.start().await {
            return self.notify(&err.to_string(), MessageType::Error);
        }

        tokio::time::sleep(self.settings.settle_delay).await;
        return self.refresh_status().await;
    }

    pub async fn stop_service(&mut self) -> Result<()> {
        self.notify("Stopping the inference service...", MessageType::Info)?;
        if let Err(err) = self.service.stop().await {
            return self.notify(&err.to_string(), MessageType::Error);
        }

        tokio::time::sleep(self.settings.settle_delay).await;
        return self.refresh_status().await;
    }

    pub async fn print_models(&mut self) -> Result<()> {
        let available = ModelRegistry::list(&self.backend, &mut self.console).await?;
        if available.is_empty() {
            return self.notify("No models available.", MessageType::Info);
        }

        let listing = ModelRegistry::format_listing(&available);
        return self.notify(&listing, MessageType::Normal);
    }

    /// Without an argument the interactive selection runs. An index resolves
    /// against a fresh listing, anything else is taken as a model name.
    pub async fn switch_model(&mut self, arg: Option<&str>) -> Result<()> {
        let arg = match arg {
            Some(arg) => arg,
            None => {
                let available = ModelRegistry::list(&self.backend, &mut self.console).await?;
                let selected =
                    ModelRegistry::select(&self.backend, &mut self.console, &available).await?;
                if let Some(model) = selected {
                    self.set_model(model)?;
                }
                return Ok(());
            }
        };

        let idx = match arg.parse::<usize>() {
            Ok(idx) => idx,
            Err(_) => return self.set_model(ModelDescriptor::new(arg)),
        };

        let available = ModelRegistry::list(&self.backend, &mut self.console).await?;
        if idx < 1 || idx > available.len() {
            return self.notify(
                &format!("{idx} is not a valid index from the model list."),
                MessageType::Error,
            );
        }

        return self.set_model(available[idx - 1].clone());
    }
}
