pub mod command;
pub mod config;
pub mod console;
pub mod engine;
pub mod front_end;
pub mod logging;
pub mod rendezvous;
pub mod sink;
pub mod types;
pub mod wire;

pub use console::ConsoleFrontEnd;
pub use engine::DebugEngine;
pub use front_end::FrontEnd;
pub use wire::WireFrontEnd;

/// Result type alias for the adapter layer
pub type Result<T> = anyhow::Result<T>;

/// Error types for the adapter layer
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// An interpreter-routed command was issued while a previous one had
    /// not flushed its result yet.
    #[error("an interpreter task is already pending")]
    Busy,

    #[error("connection lost: {0}")]
    Transport(#[from] std::io::Error),
}
