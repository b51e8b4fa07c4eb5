//! Merging a shell tarball into an already unpacked server directory.

use std::path::Path;

use dbsandbox_fs::{dir_exists, merge_collisions, merge_tree};

use crate::error::{Error, PathList, Result};
use crate::extract::extract_archive;
use crate::options::ExtractOptions;
use crate::report::ArchiveReport;

/// Unpack the shell tarball `archive` and move its tree into `destination`.
///
/// The tarball is staged in a private directory inside `base_dir`, so an
/// existing `base_dir/<barename>` is left alone. Every file collision is
/// reported before anything is moved.
pub fn merge_shell(
    archive: impl AsRef<Path>,
    base_dir: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    barename: &str,
    options: &ExtractOptions,
) -> Result<ArchiveReport> {
    let archive = archive.as_ref();
    let base_dir = base_dir.as_ref();
    let destination = destination.as_ref();

    if !dir_exists(destination) {
        return Err(Error::MergeTargetMissing {
            path: destination.to_path_buf(),
        });
    }

    let staging = tempfile::Builder::new()
        .prefix(".dbsandbox-shell-")
        .tempdir_in(base_dir)
        .map_err(|e| Error::Staging {
            path: base_dir.to_path_buf(),
            source: e,
        })?;

    let report = extract_archive(archive, staging.path(), options)?;

    let shell_root = staging.path().join(barename);
    if !dir_exists(&shell_root) {
        return Err(Error::MissingShellRoot {
            barename: barename.to_string(),
            found: report.roots_display(),
        });
    }

    let collisions = merge_collisions(&shell_root, destination)?;
    if !collisions.is_empty() {
        return Err(Error::MergeCollision {
            destination: destination.to_path_buf(),
            paths: PathList(collisions),
        });
    }

    tracing::debug!(from = %shell_root.display(), into = %destination.display(), "merging shell tree");
    merge_tree(&shell_root, destination)?;

    Ok(report)
}
