#[cfg(test)]
#[path = "model_registry_test.rs"]
mod tests;

use anyhow::Result;

use super::ConnectionProbe;
use super::ProgressIndicator;
use crate::domain::models::BackendBox;
use crate::domain::models::BackendError;
use crate::domain::models::ConsoleBox;
use crate::domain::models::MessageType;
use crate::domain::models::ModelDescriptor;

pub struct ModelRegistry {}

impl ModelRegistry {
    /// Fetches a fresh snapshot of the installed models. Failures are shown
    /// as warnings and produce an empty listing.
    pub async fn list(
        backend: &BackendBox,
        console: &mut ConsoleBox,
    ) -> Result<Vec<ModelDescriptor>> {
        if !ConnectionProbe::is_alive(backend).await {
            console.write_line(
                "Cannot list models, the inference service is not reachable.",
                MessageType::Warning,
            )?;
            return Ok(vec![]);
        }

        match backend.list_models().await {
            Ok(models) => {
                return Ok(models.into_iter().map(ModelDescriptor::from).collect());
            }
            Err(err) => {
                tracing::warn!(error = ?err, "Failed to list models");
                console.write_line(
                    &format!("Failed to list models: {err}"),
                    MessageType::Warning,
                )?;
                return Ok(vec![]);
            }
        }
    }

    pub fn format_listing(models: &[ModelDescriptor]) -> String {
        return models
            .iter()
            .enumerate()
            .map(|(idx, model)| {
                let n = idx + 1;
                return format!("- ({n}) {}", model.name);
            })
            .collect::<Vec<String>>()
            .join("\n");
    }

    /// Prompts until a model is chosen. `None` only when input runs out.
    pub async fn select(
        backend: &BackendBox,
        console: &mut ConsoleBox,
        available: &[ModelDescriptor],
    ) -> Result<Option<ModelDescriptor>> {
        let custom_idx = available.len() + 1;
        console.write_line("Available models:", MessageType::Info)?;
        if !available.is_empty() {
            console.write_line(&ModelRegistry::format_listing(available), MessageType::Normal)?;
        }
        console.write_line(
            &format!("- ({custom_idx}) Enter a custom model name"),
            MessageType::Normal,
        )?;

        loop {
            let input = match console.read_line("Select a model: ").await? {
                Some(input) => input,
                None => return Ok(None),
            };
            let input = input.trim();

            if input.is_empty() {
                console.write_line(
                    "Enter a model number or a model name.",
                    MessageType::Warning,
                )?;
                continue;
            }

            let idx = match input.parse::<usize>() {
                Ok(idx) => idx,
                Err(_) => return Ok(Some(ModelDescriptor::new(input))),
            };

            if idx >= 1 && idx <= available.len() {
                return Ok(Some(available[idx - 1].clone()));
            }

            if idx == custom_idx {
                return ModelRegistry::select_custom(backend, console).await;
            }

            console.write_line(
                &format!("{idx} is not a valid option."),
                MessageType::Warning,
            )?;
        }
    }

    async fn select_custom(
        backend: &BackendBox,
        console: &mut ConsoleBox,
    ) -> Result<Option<ModelDescriptor>> {
        loop {
            let name = match console.read_line("Model name: ").await? {
                Some(name) => name,
                None => return Ok(None),
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }

            match ModelRegistry::pull(backend, console, name).await {
                Ok(()) => {
                    console.write_line(&format!("Pulled {name}."), MessageType::Info)?;
                }
                Err(err) => {
                    console.write_line(
                        &format!("Failed to pull {name}: {err}"),
                        MessageType::Error,
                    )?;
                }
            }

            return Ok(Some(ModelDescriptor::new(name)));
        }
    }

    pub async fn pull(
        backend: &BackendBox,
        console: &ConsoleBox,
        name: &str,
    ) -> Result<(), BackendError> {
        let indicator =
            ProgressIndicator::start(console.progress_writer(), &format!("Pulling {name} "));
        let res = backend.pull_model(name).await;
        indicator.stop().await;

        if let Err(err) = &res {
            tracing::error!(error = ?err, model = name, "Failed to pull model");
        }

        return res;
    }
}
