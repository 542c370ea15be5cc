mod config;
mod server;

pub mod handlers;
pub mod lifecycle;

pub use config::*;
pub use lifecycle::Lifecycle;
pub use lifecycle::Phase;
pub use lifecycle::Shutdown;
pub use server::*;
