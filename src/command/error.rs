//! Command Errors
//!
//! Only caller mistakes end up here. Misbehavior by the host (for example an
//! unknown phase tag) is logged at the callback boundary instead, since there
//! is nobody to return an error to.

use thiserror::Error;

/// Errors returned by [`Command`](super::Command) operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// A command with this name already exists
    #[error("the command `{name}` already exists; it cannot be created")]
    DuplicateCommand { name: String },

    /// The name cannot be passed to the host
    #[error("invalid command name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// The description cannot be passed to the host
    #[error("the description of `{name}` contains a NUL byte")]
    InvalidDescription { name: String },
}

impl CommandError {
    /// The command name the error refers to.
    pub fn name(&self) -> &str {
        match self {
            CommandError::DuplicateCommand { name }
            | CommandError::InvalidName { name, .. }
            | CommandError::InvalidDescription { name } => name,
        }
    }
}

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, CommandError>;
