use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to rename '{from}' to '{to}': {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    #[error("'{path}' does not exist")]
    NotFound { path: PathBuf },

    #[error("'{path}' already exists")]
    AlreadyExists { path: PathBuf },

    #[error("'{path}' is not a directory")]
    NotADirectory { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, Error>;
