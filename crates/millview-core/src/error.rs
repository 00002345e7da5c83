//! Error handling for MillView
//!
//! Provides error types for the data layer:
//! - Move errors (decoding the externally supplied move list)
//! - Tool errors (tool diameter validation)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Move list error type
///
/// Represents errors raised while decoding a move list supplied by
/// an external producer (simulation output, saved file).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MoveError {
    /// The document is not valid JSON or does not have a recognised shape
    #[error("Malformed move list: {reason}")]
    Malformed {
        /// Description of the structural problem.
        reason: String,
    },

    /// A single entry could not be decoded
    #[error("Invalid move at index {index}: {reason}")]
    InvalidMove {
        /// Position of the offending entry in the list.
        index: usize,
        /// Why the entry was rejected.
        reason: String,
    },
}

/// Tool error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    /// Tool diameter must be a finite, strictly positive number of millimeters
    #[error("Invalid tool diameter: {value}")]
    InvalidDiameter {
        /// The rejected value.
        value: f32,
    },
}

/// Main error type for MillView core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Move list error
    #[error(transparent)]
    Move(#[from] MoveError),

    /// Tool error
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a move list error
    pub fn is_move_error(&self) -> bool {
        matches!(self, Error::Move(_))
    }

    /// Check if this is a tool error
    pub fn is_tool_error(&self) -> bool {
        matches!(self, Error::Tool(_))
    }
}

/// Result type for MillView core operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_display() {
        let err = MoveError::InvalidMove {
            index: 3,
            reason: "expected 3 or 4 elements, found 2".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid move at index 3: expected 3 or 4 elements, found 2"
        );

        let err = MoveError::Malformed {
            reason: "expected an array".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed move list: expected an array");
    }

    #[test]
    fn test_tool_error_display() {
        let err = ToolError::InvalidDiameter { value: -1.5 };
        assert_eq!(err.to_string(), "Invalid tool diameter: -1.5");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = MoveError::Malformed {
            reason: "x".to_string(),
        }
        .into();
        assert!(err.is_move_error());
        assert!(!err.is_tool_error());

        let err: Error = ToolError::InvalidDiameter { value: 0.0 }.into();
        assert!(err.is_tool_error());

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
