//! Error types for mathtex operations

use thiserror::Error;

/// Errors that can occur while transforming content or driving an editing session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathtexError {
    /// The markup could not be turned into a tree
    #[error("Parse error: {0}")]
    Parse(String),
    /// The tree could not be written back to markup
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// `open` was called while another session is still open
    #[error("An editing session is already open")]
    SessionAlreadyOpen,
    /// An input, commit or cancel event arrived with no open session
    #[error("No editing session is open")]
    NoOpenSession,
    /// A configured engine URL is not usable
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    /// The rendering engine reported a failure
    #[error("Rendering engine error: {0}")]
    Engine(String),
}
