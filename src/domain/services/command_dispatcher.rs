#[cfg(test)]
#[path = "command_dispatcher_test.rs"]
mod tests;

use anyhow::Result;

use super::SessionEngine;
use crate::domain::models::MessageType;
use crate::domain::models::SlashCommand;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /help - Provides this help menu.
- /models - Lists the models installed on the inference service.
- /change [MODEL_NAME,MODEL_INDEX] - Switches the active model. Pass a model name, or an index from /models. Without an argument, prompts for a selection.
- /reset - Clears the conversation history. The active model is kept.
- /clear - Clears the screen.
- /status - Checks whether the inference service is reachable.
- /start - Starts the inference service.
- /stop - Stops the inference service.
- /bye /exit /quit - Exits the chat.
        "#;

    return text.trim().to_string();
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    Handled,
    Exit,
    NotACommand,
}

pub struct CommandDispatcher {}

impl CommandDispatcher {
    pub async fn dispatch(input: &str, engine: &mut SessionEngine) -> Result<DispatchOutcome> {
        let command = match SlashCommand::parse(input) {
            Some(command) => command,
            None => return Ok(DispatchOutcome::NotACommand),
        };

        tracing::debug!(command = command.name(), args = ?command.args, "Dispatching command");

        if command.is_quit() {
            return Ok(DispatchOutcome::Exit);
        }

        if !command.is_known() {
            engine.notify(
                &format!(
                    "Unknown command: {}. Type /help for a list of commands.",
                    command.name()
                ),
                MessageType::Warning,
            )?;
        } else if command.is_help() {
            engine.notify(&help_text(), MessageType::Info)?;
        } else if command.is_model_list() {
            engine.print_models().await?;
        } else if command.is_reset() {
            engine.reset_history()?;
        } else if command.is_clear() {
            engine.clear_screen()?;
        } else if command.is_change() {
            let arg = command.args.first().map(|arg| return arg.as_str());
            engine.switch_model(arg).await?;
        } else if command.is_status() {
            engine.refresh_status().await?;
        } else if command.is_start() {
            engine.start_service().await?;
        } else if command.is_stop() {
            engine.stop_service().await?;
        }

        return Ok(DispatchOutcome::Handled);
    }
}
