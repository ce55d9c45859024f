#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

pub const COMMAND_MARKER: char = '/';

pub struct SlashCommand {
    command: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    /// Any input starting with the command marker parses, known or not.
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let text = text.trim();
        if !text.starts_with(COMMAND_MARKER) {
            return None;
        }

        let mut args = text
            .split_whitespace()
            .map(|e| return e.to_string())
            .collect::<Vec<String>>();
        let prefix = args.remove(0).to_lowercase();

        return Some(SlashCommand {
            command: prefix,
            args,
        });
    }

    pub fn name(&self) -> &str {
        return &self.command;
    }

    pub fn is_known(&self) -> bool {
        return self.is_help()
            || self.is_model_list()
            || self.is_reset()
            || self.is_clear()
            || self.is_change()
            || self.is_status()
            || self.is_start()
            || self.is_stop()
            || self.is_quit();
    }

    pub fn is_help(&self) -> bool {
        return self.command == "/help";
    }

    pub fn is_model_list(&self) -> bool {
        return self.command == "/models";
    }

    pub fn is_reset(&self) -> bool {
        return self.command == "/reset";
    }

    pub fn is_clear(&self) -> bool {
        return self.command == "/clear";
    }

    pub fn is_change(&self) -> bool {
        return self.command == "/change";
    }

    pub fn is_status(&self) -> bool {
        return self.command == "/status";
    }

    pub fn is_start(&self) -> bool {
        return self.command == "/start";
    }

    pub fn is_stop(&self) -> bool {
        return self.command == "/stop";
    }

    pub fn is_quit(&self) -> bool {
        return ["/bye", "/exit", "/quit"].contains(&self.command.as_str());
    }
}
