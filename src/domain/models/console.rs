use std::io;

use anyhow::Result;
use async_trait::async_trait;

use super::MessageType;

/// Line-oriented terminal the session talks through.
#[async_trait]
pub trait Console {
    /// Shows `prompt` and waits for one line of input. `None` once input is
    /// exhausted.
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Writes text as-is, styled by its message type.
    fn write(&mut self, text: &str, mtype: MessageType) -> Result<()>;

    /// Writes model output. Implementations may pace it for a typing effect.
    async fn render(&mut self, text: &str) -> Result<()>;

    fn clear_screen(&mut self) -> Result<()>;

    /// An independent handle to the terminal for the progress indicator.
    fn progress_writer(&self) -> Box<dyn io::Write + Send>;

    fn write_line(&mut self, text: &str, mtype: MessageType) -> Result<()> {
        return self.write(&format!("{text}\n"), mtype);
    }
}

pub type ConsoleBox = Box<dyn Console + Send>;
