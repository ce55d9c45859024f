#[cfg(test)]
pub mod fake;
pub mod ollama;

use crate::configuration::Settings;
use crate::domain::models::BackendBox;

pub struct BackendManager {}

impl BackendManager {
    pub fn get(settings: &Settings) -> BackendBox {
        return Box::new(ollama::Ollama::new(settings));
    }
}
