use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// How chatty extraction is: 0 silent, 1 progress, 2 every entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("verbosity must be 0, 1 or 2, got {0}")]
pub struct InvalidVerbosity(pub u8);

impl TryFrom<u8> for Verbosity {
    type Error = InvalidVerbosity;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Self::Quiet),
            1 => Ok(Self::Normal),
            2 => Ok(Self::Verbose),
            other => Err(InvalidVerbosity(other)),
        }
    }
}

impl From<Verbosity> for u8 {
    fn from(v: Verbosity) -> Self {
        match v {
            Verbosity::Quiet => 0,
            Verbosity::Normal => 1,
            Verbosity::Verbose => 2,
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// Progress snapshot handed to [`ExtractOptions::on_progress`] after each entry.
#[derive(Clone, Debug)]
pub struct Progress {
    pub entries: u64,
    pub bytes_processed: u64,
    pub current_file: PathBuf,
}

#[derive(Clone, Default)]
pub struct ExtractOptions {
    pub verbosity: Verbosity,
    pub on_progress: Option<Arc<dyn Fn(&Progress) + Send + Sync>>,
}

impl ExtractOptions {
    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn on_progress(mut self, callback: Arc<dyn Fn(&Progress) + Send + Sync>) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub(crate) fn report(&self, progress: &Progress) {
        if let Some(callback) = &self.on_progress {
            callback(progress);
        }
    }
}

impl fmt::Debug for ExtractOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractOptions")
            .field("verbosity", &self.verbosity)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}
