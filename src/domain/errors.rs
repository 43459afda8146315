// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the values crate.
//!
//! This module defines the error types that can occur when parsing strings, loading
//! properties or working with secrets. All errors use `thiserror` for proper error
//! handling and conversion.

use thiserror::Error;

/// The main error type for value operations.
///
/// The variants follow the kinds of failure callers have to tell apart: bad input
/// handed in directly, operations that are structurally disallowed in the current
/// state, malformed property text, and failures of the regular expression engine or
/// the type lookup. It is marked as `#[non_exhaustive]` to allow for future additions
/// without breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use hexvalues::domain::errors::ValuesError;
///
/// fn pick_backing(name: &str) -> Result<(), ValuesError> {
///     Err(ValuesError::InvalidArgument {
///         message: format!("Unknown backing {}", name),
///     })
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValuesError {
    /// Malformed or disallowed input supplied directly by the caller.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the argument
        message: String,
    },

    /// The operation is not allowed in the current state.
    #[error("Logic error: {message}")]
    Logic {
        /// Why the operation was refused
        message: String,
    },

    /// Failed to parse property text.
    #[error("Failed to parse properties: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A property file was readable but its content could not be parsed.
    #[error("Property file at {path} contains errors and can not be parsed: {message}")]
    FileFormat {
        /// Path of the offending file
        path: String,
        /// The parser's diagnostic
        message: String,
    },

    /// The regular expression engine failed to evaluate a pattern.
    #[error("Failure while matching \"{pattern}\", reason: {reason}.")]
    PatternMatchFailed {
        /// The pattern that failed
        pattern: String,
        /// Translated diagnostic
        reason: String,
    },

    /// A type handle was requested for a type that is not known.
    #[error("Class \"{name}\" does not exist")]
    Reflection {
        /// The requested type name
        name: String,
    },

    /// A fluent parser default does not fit the requested accessor.
    #[error("{accessor}() expects a default of type {expected}, got {found}")]
    TypeMismatch {
        /// The accessor that was called
        accessor: String,
        /// Type the accessor returns
        expected: String,
        /// Type of the configured default
        found: String,
    },

    /// A named check was invoked that is neither registered nor built in.
    #[error("Method {class}::{method}() does not exist.")]
    BadMethodCall {
        /// Name of the receiving type
        class: String,
        /// The unknown method
        method: String,
    },

    /// The secret backing failed to encrypt a payload.
    #[error("Encryption failed: {message}")]
    Encryption {
        /// The error message
        message: String,
    },

    /// The secret backing failed to decrypt a stored payload.
    #[error("Decryption failed: {message}")]
    Decryption {
        /// The error message
        message: String,
    },

    /// An I/O error occurred while reading properties.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ValuesError {
    /// Creates an `InvalidArgument` error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ValuesError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a `Logic` error.
    pub fn logic(message: impl Into<String>) -> Self {
        ValuesError::Logic {
            message: message.into(),
        }
    }
}

/// A specialized Result type for value operations.
pub type Result<T> = std::result::Result<T, ValuesError>;
