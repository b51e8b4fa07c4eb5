use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to open archive '{path}': {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("unsupported archive format: '{path}' is not gzip compressed")]
    UnsupportedFormat { path: PathBuf },

    #[error("zip-slip attack detected: entry '{entry}' resolves to '{resolved}'")]
    ZipSlip { entry: PathBuf, resolved: PathBuf },

    #[error("symlink target escapes base directory: '{target}' -> '{resolved}'")]
    SymlinkEscape { target: PathBuf, resolved: PathBuf },

    #[error("symlink target is absolute path: '{target}' in '{symlink}'")]
    AbsoluteSymlinkTarget { target: PathBuf, symlink: PathBuf },

    #[error("entry path is not valid")]
    InvalidPath,

    #[error("archive is corrupted: {source}")]
    Corrupted { source: io::Error },

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("failed to create directory: {path}: {source}")]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    #[error("failed to create link '{link}' -> '{target}': {source}")]
    LinkCreationFailed {
        target: PathBuf,
        link: PathBuf,
        source: io::Error,
    },

    #[error("archive does not unpack to a single top-level directory (found: {roots})")]
    NoSingleRoot { roots: String },

    #[error("server directory '{path}' does not exist, nothing to merge the shell into")]
    MergeTargetMissing { path: PathBuf },

    #[error("shell tarball did not unpack to '{barename}' (found: {found})")]
    MissingShellRoot { barename: String, found: String },

    #[error("shell tarball would overwrite existing paths in '{destination}': {paths}")]
    MergeCollision { destination: PathBuf, paths: PathList },

    #[error("failed to create staging directory in '{path}': {source}")]
    Staging { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Fs(#[from] dbsandbox_fs::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Paths rendered as a comma separated list in error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathList(pub Vec<PathBuf>);

impl fmt::Display for PathList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, path) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", path.display())?;
        }
        Ok(())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
