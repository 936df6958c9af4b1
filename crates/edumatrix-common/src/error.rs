//! Error types reported by the records store.
//!
//! Every failure a caller can observe is one of the variants below, and each
//! variant carries the field, value, or identifier needed to explain it.

use std::fmt;

/// Common error type for edumatrix.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A field violates one of the record invariants.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field (e.g. "gpa", "end_date").
        field: String,
        /// What is wrong with the supplied value.
        message: String,
    },

    /// A foreign key points at a row that does not exist.
    #[error("Referenced {entity} does not exist: {id}")]
    Reference {
        /// The kind of entity that was referenced.
        entity: String,
        /// The missing identifier.
        id: String,
    },

    /// The targeted row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "student", "enrollment").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The row already exists.
    #[error("{entity} already exists: {key}")]
    Duplicate {
        /// The kind of entity.
        entity: String,
        /// The conflicting key.
        key: String,
    },

    /// The database file could not be read, written, or understood.
    #[error("Storage error: {source}")]
    Storage {
        /// The underlying failure.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new Validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new Reference error.
    pub fn reference(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Self::Reference {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create a new NotFound error.
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create a new Duplicate error.
    pub fn duplicate(entity: impl Into<String>, key: impl fmt::Display) -> Self {
        Self::Duplicate {
            entity: entity.into(),
            key: key.to_string(),
        }
    }

    /// Create a new Storage error.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }

    /// Whether this error was caused by bad input rather than by the store.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Error::Storage { .. } | Error::Io(_))
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
