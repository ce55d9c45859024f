mod backend;
mod console;
mod conversation;
mod errors;
mod message_type;
mod model;
mod service;
mod session;
mod slash_commands;
mod speaker;
mod stream_chunk;

pub use backend::*;
pub use console::*;
pub use conversation::*;
pub use errors::*;
pub use message_type::*;
pub use model::*;
pub use service::*;
pub use session::*;
pub use slash_commands::*;
pub use speaker::*;
pub use stream_chunk::*;
