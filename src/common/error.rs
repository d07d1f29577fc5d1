//! Error types for sketch operations

use std::fmt;

/// Errors that can occur during sketch operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SketchError {
    /// Invalid parameter provided to a constructor or operation. Also used
    /// for `InvalidConfiguration`: rejected epsilon/delta on the first add.
    InvalidParameter {
        /// Parameter name
        param: String,
        /// Invalid value provided
        value: String,
        /// Constraint that was violated
        constraint: String,
    },

    /// Error during serialization
    SerializationError(String),

    /// Error during deserialization
    DeserializationError(String),

    /// Attempted to merge or extend incompatible sketches
    IncompatibleSketches {
        /// Reason for incompatibility
        reason: String,
    },

    /// Combine or add saw an attribute arity or bucket geometry
    /// inconsistent with an existing sketch.
    ShapeMismatch {
        /// Human-readable description of the mismatching fields
        reason: String,
    },

    /// The operation is not supported by this sketch (e.g. text parsing,
    /// binary recv).
    UnsupportedOperation(String),

    /// The host could not produce an extended hash for an attribute's type.
    HashFunctionMissing {
        /// Index of the attribute that has no hash function
        attribute: usize,
    },
}

impl fmt::Display for SketchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SketchError::InvalidParameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid parameter '{}': value '{}' {}",
                    param, value, constraint
                )
            }
            SketchError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            SketchError::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            SketchError::IncompatibleSketches { reason } => {
                write!(f, "Incompatible sketches: {}", reason)
            }
            SketchError::ShapeMismatch { reason } => {
                write!(f, "Sketch shape mismatch: {}", reason)
            }
            SketchError::UnsupportedOperation(op) => {
                write!(f, "Unsupported operation: {}", op)
            }
            SketchError::HashFunctionMissing { attribute } => {
                write!(
                    f,
                    "Could not identify an extended hash function for attribute {}",
                    attribute
                )
            }
        }
    }
}

impl std::error::Error for SketchError {}

/// Result type alias for sketch operations
pub type Result<T> = std::result::Result<T, SketchError>;
