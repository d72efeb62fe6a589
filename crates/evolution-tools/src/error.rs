//! Error types for the dispatch pipeline.

use std::fmt;
use thiserror::Error;

/// Main error type.
///
/// Only [`Error::UnknownOperation`] ever escapes [`crate::Dispatcher::dispatch`]; every other
/// variant is rendered into a result envelope.
#[derive(Debug, Error)]
pub enum Error {
    /// Arguments do not match the operation's input schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A required ambient value (API key, instance) is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The remote API rejected the call or could not be reached.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// No catalog entry with this name.
    #[error("unknown tool: {0}")]
    UnknownOperation(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A single schema violation at a dotted/indexed argument path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every violation found in one set of arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    #[must_use]
    pub fn paths(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.path.as_str()).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid arguments: ")?;
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Non-2xx response. `body` is the raw response text, relayed verbatim.
    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("http transport error: {0}")]
    Transport(String),
}
