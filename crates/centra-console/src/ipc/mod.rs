//! Request/response surface of the console backend.

mod backend;
pub mod bridge;
mod channel;
mod types;


pub use backend::ConsoleBackend;
pub use channel::{ChannelError, ConsoleHandle, spawn};
pub use types::*;
