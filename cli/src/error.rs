//! Errors raised while running a resolved command.

use medtrack_db::DatabaseError;
use thiserror::Error;

/// Errors that can occur while executing a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A medication rule or value conversion failed.
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Writing command output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// `help <command>` named a command that is not registered.
    #[error("unknown command: {0}")]
    UnknownTopic(String),

    /// `list -t` named neither `all` nor `today`.
    #[error("invalid list type '{0}': expected all or today")]
    InvalidListKind(String),

    /// `modify` was given an index but no field to change.
    #[error("nothing to modify: supply at least one field")]
    NothingToModify,
}
