//! Error types for selectmirror.

use thiserror::Error;

/// Errors raised at the dropdown's boundary.
///
/// Only programmer misuse is an error. Looking up an option that does not
/// exist is an ordinary query and yields `None` instead.
#[derive(Debug, Error)]
pub enum DropdownError {
    /// A handle or argument of the wrong kind was supplied.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A declarative select description could not be parsed.
    #[error("Invalid select description: {0}")]
    Description(#[from] serde_json::Error),
}

impl DropdownError {
    /// Shorthand for [`DropdownError::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, DropdownError>;
