#[cfg(test)]
pub mod fake;
pub mod process;

use crate::configuration::Settings;
use crate::domain::models::ServiceBox;

pub struct ServiceManager {}

impl ServiceManager {
    pub fn get(settings: &Settings) -> ServiceBox {
        return Box::new(process::ProcessService::new(
            &settings.service_command,
            &settings.service_log,
        ));
    }
}
