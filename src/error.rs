use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything a canvas operation can fail with.
///
/// None of these are fatal: the interactive loop reports them and keeps the
/// session alive.
#[derive(Debug, Error)]
pub enum Error {
    /// A shape was requested from a canvas that holds none.
    #[error("the canvas is empty, there is no shape to remove")]
    EmptyCanvas,

    /// A command was asked to revert work it never performed.
    #[error("`{command}` cannot be undone before it has been executed")]
    NotApplied { command: &'static str },

    #[error("invalid destination {}: {problem}", path.display())]
    InvalidDestination {
        path: PathBuf,
        problem: DestinationProblem,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Why an export destination was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DestinationProblem {
    #[error("no file name given")]
    MissingFileName,
    #[error("must be a plain file name inside the output directory")]
    NotAFileName,
    #[error("extension must be `.{expected}`")]
    WrongExtension { expected: String },
    #[error("file already exists")]
    AlreadyExists,
}

impl Error {
    /// True for errors caused by what the user asked for rather than by the
    /// environment.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyCanvas | Error::NotApplied { .. } | Error::InvalidDestination { .. }
        )
    }
}
