use super::source::FastqError;
use std::path::PathBuf;
use thiserror::Error;

/// Rejected user input. Leaves the prior shell state untouched.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("unsupported file type: {}", path.display())]
    UnrecognizedExtension { path: PathBuf },
    #[error("no file selected")]
    NoSelection,
    #[error("a load is already in progress")]
    LoadInFlight,
}

/// A load that did not complete. Forces a full reset to the empty state.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] FastqError),
    #[error("file contains no sequences")]
    NoSequences,
}

/// A plot that could not be produced. The loaded session survives.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no file loaded")]
    NoSession,
    #[error(transparent)]
    Source(#[from] FastqError),
}

/// Typed outcome of every shell transition; the dispatcher's caller owns
/// all user-facing reporting.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Render(#[from] RenderError),
}
