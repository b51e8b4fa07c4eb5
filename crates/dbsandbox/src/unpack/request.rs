use std::path::{Path, PathBuf};

use dbsandbox_archive::Verbosity;
use dbsandbox_version::detect_version;

use crate::config::ARCHIVE_SUFFIX;

/// The tarball named on the command line, with everything its name tells us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReference {
    path: PathBuf,
    filename: String,
    detected_version: Option<String>,
    barename: String,
    recognized_extension: bool,
}

impl ArchiveReference {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let detected_version = detect_version(&filename).map(str::to_string);
        let recognized_extension = filename.ends_with(ARCHIVE_SUFFIX);
        let barename = filename
            .strip_suffix(ARCHIVE_SUFFIX)
            .unwrap_or(&filename)
            .to_string();

        Self {
            path,
            filename,
            detected_version,
            barename,
            recognized_extension,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn detected_version(&self) -> Option<&str> {
        self.detected_version.as_deref()
    }

    /// File name without the archive suffix; only meaningful when
    /// [`recognized_extension`](Self::recognized_extension) holds.
    pub fn barename(&self) -> &str {
        &self.barename
    }

    pub fn recognized_extension(&self) -> bool {
        self.recognized_extension
    }
}

/// Everything the user asked for, gathered once at the command line boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackRequest {
    pub base_dir: PathBuf,
    pub prefix: String,
    pub explicit_version: Option<String>,
    pub target_override: Option<String>,
    pub shell: bool,
    pub verbosity: Verbosity,
}

impl UnpackRequest {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            prefix: String::new(),
            explicit_version: None,
            target_override: None,
            shell: false,
            verbosity: Verbosity::default(),
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// An empty version counts as not given.
    pub fn explicit_version(mut self, version: Option<impl Into<String>>) -> Self {
        self.explicit_version = non_empty(version);
        self
    }

    /// An empty target counts as not given.
    pub fn target_override(mut self, target: Option<impl Into<String>>) -> Self {
        self.target_override = non_empty(target);
        self
    }

    pub fn shell(mut self, shell: bool) -> Self {
        self.shell = shell;
        self
    }

    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
}

fn non_empty(value: Option<impl Into<String>>) -> Option<String> {
    value.map(Into::into).filter(|s| !s.is_empty())
}
