//! The I/O the coordinator delegates: existence checks, extraction, merging,
//! renaming and version validation.

use std::path::Path;
use std::sync::Arc;

use dbsandbox_archive::{ArchiveReport, ExtractOptions, Progress, Verbosity};
use dbsandbox_version::VersionError;

/// Result of unpacking a tarball into the base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Top-level directory the tarball created inside the base directory.
    pub produced: String,
    pub report: ArchiveReport,
}

pub trait Collaborators {
    fn dir_exists(&self, path: &Path) -> bool;

    fn extract_archive(
        &self,
        archive: &Path,
        base_dir: &Path,
        verbosity: Verbosity,
    ) -> dbsandbox_archive::Result<Extraction>;

    fn merge_shell_archive(
        &self,
        archive: &Path,
        base_dir: &Path,
        destination: &Path,
        barename: &str,
        verbosity: Verbosity,
    ) -> dbsandbox_archive::Result<ArchiveReport>;

    fn rename_dir(&self, from: &Path, to: &Path) -> dbsandbox_fs::Result<()>;

    fn version_to_port(&self, version: &str) -> Result<u16, VersionError> {
        dbsandbox_version::version_to_port(version)
    }
}

/// Collaborators backed by the real filesystem.
#[derive(Clone, Default)]
pub struct SystemCollaborators {
    on_progress: Option<Arc<dyn Fn(&Progress) + Send + Sync>>,
}

impl SystemCollaborators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(mut self, callback: Arc<dyn Fn(&Progress) + Send + Sync>) -> Self {
        self.on_progress = Some(callback);
        self
    }

    fn options(&self, verbosity: Verbosity) -> ExtractOptions {
        let options = ExtractOptions::default().verbosity(verbosity);
        match &self.on_progress {
            Some(callback) => options.on_progress(callback.clone()),
            None => options,
        }
    }
}

impl Collaborators for SystemCollaborators {
    fn dir_exists(&self, path: &Path) -> bool {
        dbsandbox_fs::dir_exists(path)
    }

    fn extract_archive(
        &self,
        archive: &Path,
        base_dir: &Path,
        verbosity: Verbosity,
    ) -> dbsandbox_archive::Result<Extraction> {
        let report = dbsandbox_archive::extract_archive(archive, base_dir, &self.options(verbosity))?;
        let produced = report.produced_root()?.to_string();
        Ok(Extraction { produced, report })
    }

    fn merge_shell_archive(
        &self,
        archive: &Path,
        base_dir: &Path,
        destination: &Path,
        barename: &str,
        verbosity: Verbosity,
    ) -> dbsandbox_archive::Result<ArchiveReport> {
        dbsandbox_archive::merge_shell(
            archive,
            base_dir,
            destination,
            barename,
            &self.options(verbosity),
        )
    }

    fn rename_dir(&self, from: &Path, to: &Path) -> dbsandbox_fs::Result<()> {
        dbsandbox_fs::rename_dir(from, to)
    }
}
