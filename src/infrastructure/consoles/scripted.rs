use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::Console;
use crate::domain::models::MessageType;

/// Console fed from a list of input lines. Everything written, prompts
/// included, lands in a shared transcript.
#[derive(Clone, Default)]
pub struct ScriptedConsole {
    inputs: Arc<Mutex<VecDeque<String>>>,
    transcript: Arc<Mutex<String>>,
    progress: Arc<Mutex<Vec<u8>>>,
}

impl ScriptedConsole {
    pub fn new(inputs: &[&str]) -> ScriptedConsole {
        return ScriptedConsole {
            inputs: Arc::new(Mutex::new(
                inputs.iter().map(|e| return e.to_string()).collect(),
            )),
            ..ScriptedConsole::default()
        };
    }

    pub fn transcript(&self) -> String {
        return self.transcript.lock().unwrap().to_string();
    }

    pub fn progress(&self) -> String {
        return String::from_utf8_lossy(&self.progress.lock().unwrap()).to_string();
    }

    pub fn remaining_inputs(&self) -> usize {
        return self.inputs.lock().unwrap().len();
    }
}

struct SharedWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        return Ok(buf.len());
    }

    fn flush(&mut self) -> io::Result<()> {
        return Ok(());
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    #[allow(clippy::implicit_return)]
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let line = self.inputs.lock().unwrap().pop_front();
        let mut transcript = self.transcript.lock().unwrap();
        transcript.push_str(prompt);
        if let Some(line) = &line {
            transcript.push_str(line);
        }
        transcript.push('\n');

        return Ok(line);
    }

    fn write(&mut self, text: &str, mtype: MessageType) -> Result<()> {
        let mut transcript = self.transcript.lock().unwrap();
        match mtype {
            MessageType::Normal => transcript.push_str(text),
            _ => transcript.push_str(&format!("[{mtype}] {text}")),
        }
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn render(&mut self, text: &str) -> Result<()> {
        return self.write(text, MessageType::Normal);
    }

    fn clear_screen(&mut self) -> Result<()> {
        self.transcript.lock().unwrap().push_str("[clear]\n");
        return Ok(());
    }

    fn progress_writer(&self) -> Box<dyn io::Write + Send> {
        return Box::new(SharedWriter(self.progress.clone()));
    }
}
