//! Widget construction and event errors

use thiserror::Error;

/// Errors raised while building or mutating a widget tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    /// Schema references a kind with no registered constructor
    #[error("Unknown parameter kind '{kind}' for field '{field}'")]
    UnknownKind { kind: String, field: String },

    /// `array`/`testcase` schema without an element template
    #[error("Parameter '{field}' has no subparameter")]
    MissingSubparameter { field: String },

    /// Event addressed a row or array that is not in the tree
    #[error("Target not found: {target}")]
    MissingTarget { target: String },
}

impl WidgetError {
    /// Whether the error aborts construction, as opposed to a stale event.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::MissingTarget { .. })
    }
}

pub type Result<T> = std::result::Result<T, WidgetError>;
