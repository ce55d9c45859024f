#[cfg(test)]
#[path = "stdio_test.rs"]
mod tests;

use std::io;
use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use crossterm::cursor;
use crossterm::execute;
use crossterm::terminal;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::io::Stdin;
use yansi::Paint;

use crate::domain::models::Console;
use crate::domain::models::MessageType;

pub struct StdioConsole {
    reader: BufReader<Stdin>,
    typing_delay: Duration,
}

impl StdioConsole {
    pub fn new(typing_delay: Duration) -> StdioConsole {
        return StdioConsole {
            reader: BufReader::new(tokio::io::stdin()),
            typing_delay,
        };
    }
}

/// Reads one line without its terminator. Bytes that are not UTF-8 are
/// replaced rather than failing the read. `None` at end of input.
async fn read_input_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> io::Result<Option<String>> {
    let mut buf = vec![];
    if reader.read_until(b'\n', &mut buf).await? == 0 {
        return Ok(None);
    }

    if buf.ends_with(b"\n") {
        buf.pop();
    }
    if buf.ends_with(b"\r") {
        buf.pop();
    }

    match String::from_utf8(buf) {
        Ok(line) => return Ok(Some(line)),
        Err(err) => {
            let line = String::from_utf8_lossy(err.as_bytes()).to_string();
            tracing::warn!(line = %line, "Input was not valid UTF-8");
            return Ok(Some(line));
        }
    }
}

fn paint(text: &str, mtype: MessageType) -> String {
    match mtype {
        MessageType::Normal => return text.to_string(),
        MessageType::Info => return Paint::cyan(text).to_string(),
        MessageType::Warning => return Paint::yellow(text).to_string(),
        MessageType::Error => return Paint::red(text).to_string(),
    }
}

#[async_trait]
impl Console for StdioConsole {
    #[allow(clippy::implicit_return)]
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", Paint::green(prompt).bold())?;
        stdout.flush()?;

        let line = read_input_line(&mut self.reader).await?;
        if line.is_none() {
            writeln!(stdout)?;
        }

        return Ok(line);
    }

    fn write(&mut self, text: &str, mtype: MessageType) -> Result<()> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", paint(text, mtype))?;
        stdout.flush()?;
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn render(&mut self, text: &str) -> Result<()> {
        if self.typing_delay.is_zero() {
            return self.write(text, MessageType::Normal);
        }

        let mut buf = [0; 4];
        for char in text.chars() {
            self.write(char.encode_utf8(&mut buf), MessageType::Normal)?;
            tokio::time::sleep(self.typing_delay).await;
        }

        return Ok(());
    }

    fn clear_screen(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        return Ok(());
    }

    fn progress_writer(&self) -> Box<dyn io::Write + Send> {
        return Box::new(io::stdout());
    }
}
