//! Error handling for Infokit
//!
//! Provides error types for every layer of the editing kernel:
//! - Address errors (role / indexes parsing at the scene boundary)
//! - State errors (data tree mutation)
//! - Command errors (apply / undo and batch execution)
//! - Interaction errors (exclusive gesture scheduling)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Address error type
///
/// Raised when a role tag or an indexes string read off a scene node
/// cannot be turned into a structured address.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// An indexes string contained a segment that is not a non-negative integer
    #[error("Malformed indexes path '{input}': segment '{segment}' is not an index")]
    MalformedIndexes {
        /// The full input string.
        input: String,
        /// The offending segment.
        segment: String,
    },

    /// The role tag is not one the kernel knows about
    #[error("Unknown element role '{0}'")]
    UnknownRole(String),

    /// An item-scoped role was given without an indexes path
    #[error("Role '{role}' is item-scoped and requires indexes")]
    MissingIndexes {
        /// The role tag.
        role: String,
    },
}

/// State error type
///
/// Represents failures while mutating the authoritative data tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// The patch could not be merged into the target (type mismatch)
    #[error("Invalid patch for {path}: {reason}")]
    InvalidPatch {
        /// Logical path the patch was aimed at.
        path: String,
        /// Why the merged value was rejected.
        reason: String,
    },

    /// The target value is not an object and cannot be merged into
    #[error("Cannot merge into non-object value at {path}")]
    NotAnObject {
        /// Logical path of the non-object value.
        path: String,
    },
}

/// Command error type
///
/// Represents failures while applying or reverting a command.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    /// The target scene node was destroyed (not merely detached)
    #[error("Scene node {0} no longer exists")]
    NodeDestroyed(u64),

    /// The underlying state mutation failed
    #[error(transparent)]
    State(#[from] StateError),

    /// A command inside a batch failed; earlier commands were reverted
    #[error("Batch command {index} ('{name}') failed: {source}")]
    BatchFailed {
        /// Position of the failing command in the batch.
        index: usize,
        /// Display name of the failing command.
        name: String,
        /// The underlying failure.
        #[source]
        source: Box<CommandError>,
    },

    /// Reverting a failed batch failed as well; state may be inconsistent
    #[error("Rollback of batch failed at command {index}: {source}")]
    RollbackFailed {
        /// Position of the command whose undo failed.
        index: usize,
        /// The underlying failure.
        #[source]
        source: Box<CommandError>,
    },
}

/// Interaction error type
///
/// Represents failures of the exclusive gesture scheduler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InteractionError {
    /// Another gesture holds the interaction lock
    #[error("Interaction lock is held by '{owner}'")]
    Busy {
        /// Name of the interaction holding the lock.
        owner: String,
    },

    /// The gesture was cancelled before it completed
    #[error("Gesture '{owner}' was cancelled")]
    Cancelled {
        /// Name of the cancelled interaction.
        owner: String,
    },
}

/// Main error type for Infokit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Address error
    #[error(transparent)]
    Address(#[from] AddressError),

    /// State error
    #[error(transparent)]
    State(#[from] StateError),

    /// Command error
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Interaction error
    #[error(transparent)]
    Interaction(#[from] InteractionError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a lock contention error
    pub fn is_busy(&self) -> bool {
        matches!(self, Error::Interaction(InteractionError::Busy { .. }))
    }

    /// Check if this is a command error
    pub fn is_command_error(&self) -> bool {
        matches!(self, Error::Command(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
