pub mod backends;
pub mod consoles;
pub mod services;
