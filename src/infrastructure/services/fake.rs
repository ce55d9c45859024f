use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::models::ServiceController;
use crate::domain::models::ServiceError;

/// Service controller that flips a fake backend's liveness flag.
#[derive(Clone)]
pub struct FakeService {
    pub alive: Arc<AtomicBool>,
    pub brings_service_up: bool,
    pub spawn_fails: bool,
    pub starts: Arc<AtomicUsize>,
    pub stops: Arc<AtomicUsize>,
}

impl FakeService {
    pub fn new(alive: Arc<AtomicBool>) -> FakeService {
        return FakeService {
            alive,
            brings_service_up: true,
            spawn_fails: false,
            starts: Arc::new(AtomicUsize::new(0)),
            stops: Arc::new(AtomicUsize::new(0)),
        };
    }

    fn spawn_error(subcommand: &str) -> ServiceError {
        return ServiceError::Spawn {
            command: "belullama".to_string(),
            subcommand: subcommand.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
    }
}

#[async_trait]
impl ServiceController for FakeService {
    #[allow(clippy::implicit_return)]
    async fn start(&self) -> Result<(), ServiceError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if self.spawn_fails {
            return Err(FakeService::spawn_error("start"));
        }
        if self.brings_service_up {
            self.alive.store(true, Ordering::SeqCst);
        }
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn stop(&self) -> Result<(), ServiceError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        if self.spawn_fails {
            return Err(FakeService::spawn_error("stop"));
        }
        self.alive.store(false, Ordering::SeqCst);
        return Ok(());
    }
}
