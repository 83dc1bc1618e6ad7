//! Error types for Vecino operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Vecino operations.
///
/// Covers the recoverable failure modes of loading, configuring, and
/// evaluating a classifier: malformed input records, invalid neighbor
/// counts, expired dataset references, and degenerate numeric inputs.
///
/// # Examples
///
/// ```
/// use vecino::error::VecinoError;
///
/// let err = VecinoError::InvalidHyperparameter {
///     param: "k".to_string(),
///     value: "0".to_string(),
///     constraint: "k >= 1".to_string(),
/// };
/// assert!(err.to_string().contains("Invalid hyperparameter"));
/// ```
#[derive(Debug)]
pub enum VecinoError {
    /// A raw input record could not be parsed into four numeric
    /// measurements plus a label.
    Validation {
        /// Zero-based index of the offending record
        row: usize,
        /// What failed to parse
        message: String,
    },

    /// Invalid hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// The training data behind a hyperparameter no longer exists.
    ExpiredReference {
        /// Name of the discarded dataset
        dataset: String,
    },

    /// A computation hit an undefined case (zero denominator, empty
    /// testing subset).
    DegenerateInput {
        /// What was degenerate
        message: String,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for VecinoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VecinoError::Validation { row, message } => {
                write!(f, "Invalid record at row {row}: {message}")
            }
            VecinoError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            VecinoError::ExpiredReference { dataset } => {
                write!(f, "Training data '{dataset}' no longer exists")
            }
            VecinoError::DegenerateInput { message } => {
                write!(f, "Degenerate input: {message}")
            }
            VecinoError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for VecinoError {}

impl From<&str> for VecinoError {
    fn from(msg: &str) -> Self {
        VecinoError::Other(msg.to_string())
    }
}

impl From<String> for VecinoError {
    fn from(msg: String) -> Self {
        VecinoError::Other(msg)
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, VecinoError>;
