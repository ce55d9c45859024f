use crate::domain::models::BackendBox;

pub struct ConnectionProbe {}

impl ConnectionProbe {
    /// Every failure collapses to `false`.
    pub async fn is_alive(backend: &BackendBox) -> bool {
        match backend.health_check().await {
            Ok(()) => return true,
            Err(err) => {
                tracing::debug!(error = ?err, "Inference service is not reachable");
                return false;
            }
        }
    }
}
