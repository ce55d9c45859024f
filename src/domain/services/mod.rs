mod command_dispatcher;
mod connection_probe;
mod model_registry;
mod progress_indicator;
mod response_streamer;
mod session_engine;

pub use command_dispatcher::*;
pub use connection_probe::*;
pub use model_registry::*;
pub use progress_indicator::*;
pub use response_streamer::*;
pub use session_engine::*;
