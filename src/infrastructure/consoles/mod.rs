#[cfg(test)]
pub mod scripted;
pub mod stdio;

use crate::configuration::Settings;
use crate::domain::models::ConsoleBox;

pub struct ConsoleManager {}

impl ConsoleManager {
    pub fn get(settings: &Settings) -> ConsoleBox {
        return Box::new(stdio::StdioConsole::new(settings.typing_delay));
    }
}
