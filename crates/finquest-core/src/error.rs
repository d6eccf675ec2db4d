//! Error types for finquest-core

use thiserror::Error;

/// Result type alias for finquest-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type shared by agents and tool capabilities
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error message
    #[error("{0}")]
    Message(String),

    /// A component could not be constructed or configured
    #[error("initialization failed: {0}")]
    Initialization(String),

    /// A tool capability failed during execution
    #[error("tool failed: {0}")]
    Tool(String),

    /// An agent run failed or ended without an answer
    #[error("agent failed: {0}")]
    Agent(String),
}
