use async_trait::async_trait;

use super::ServiceError;

/// Launches the inference service's own start/stop commands. Neither call
/// waits for the service to change state, callers re-probe afterwards.
#[async_trait]
pub trait ServiceController {
    async fn start(&self) -> Result<(), ServiceError>;
    async fn stop(&self) -> Result<(), ServiceError>;
}

pub type ServiceBox = Box<dyn ServiceController + Send + Sync>;
