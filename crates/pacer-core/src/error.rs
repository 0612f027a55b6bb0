//! Error types for Pacer

use crate::id::SystemId;
use thiserror::Error;

/// Which registry list an operation addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemList {
    Simulation,
    Presentation,
}

impl std::fmt::Display for SystemList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SystemList::Simulation => write!(f, "simulation"),
            SystemList::Presentation => write!(f, "presentation"),
        }
    }
}

/// The main error type for Pacer operations
///
/// Every variant is a programmer-facing failure. None of them is retried by
/// the scheduler; the host is expected to stop and report.
#[derive(Debug, Error)]
pub enum PacerError {
    /// Operation called in the wrong lifecycle state
    #[error("Sequencing error: {0}")]
    Sequencing(String),

    /// A unit was registered or removed through a path that does not match its capabilities
    #[error("Capability mismatch: {id} must go through the {expected} path")]
    CapabilityMismatch { id: SystemId, expected: SystemList },

    #[error("Not found: {id} is not in the {list} list")]
    NotFound { id: SystemId, list: SystemList },

    /// Structural mutation of the unit lists while they are being iterated
    #[error("Lock violation: {0}")]
    LockViolation(String),

    #[error("Argument error: {0}")]
    Argument(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(&'static str),

    /// A unit callback reported a failure
    #[error("System {id} failed: {message}")]
    System { id: SystemId, message: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Pacer operations
pub type Result<T> = std::result::Result<T, PacerError>;

impl From<toml::de::Error> for PacerError {
    fn from(err: toml::de::Error) -> Self {
        PacerError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for PacerError {
    fn from(err: toml::ser::Error) -> Self {
        PacerError::Config(err.to_string())
    }
}

impl PacerError {
    /// Wrap an arbitrary unit failure
    pub fn system(id: SystemId, message: impl Into<String>) -> Self {
        PacerError::System {
            id,
            message: message.into(),
        }
    }
}
