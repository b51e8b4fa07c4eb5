//! Streaming `.tar.gz` extraction.
//!
//! # Platform Behavior
//!
//! **Unix**: file and directory mode bits from the archive are applied.
//! Directory modes are applied once every entry is written, so a read-only
//! directory in the archive does not block its own contents.
//!
//! **Windows (non-Unix)**: modes are ignored and symlinks are created as
//! file or directory links depending on what the target looks like.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::EntryType;

use crate::detect::detect_gzip;
use crate::error::{Error, Result};
use crate::options::{ExtractOptions, Progress, Verbosity};
use crate::report::ArchiveReport;
use crate::sanitize::{SanitizedPath, resolves_within, sanitize_path, sanitize_symlink_target};

/// Extract the gzip compressed tarball at `archive` below `destination`.
pub fn extract_archive(
    archive: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<ArchiveReport> {
    let archive = archive.as_ref();
    let file = File::open(archive).map_err(|e| Error::Open {
        path: archive.to_path_buf(),
        source: e,
    })?;
    let mut reader = BufReader::new(file);

    if !detect_gzip(&mut reader)? {
        return Err(Error::UnsupportedFormat {
            path: archive.to_path_buf(),
        });
    }

    tracing::debug!(archive = %archive.display(), destination = %destination.as_ref().display(), "extracting");
    extract_from_reader(reader, destination, options)
}

/// Main extraction pipeline over an already opened gzip stream.
///
/// Sanitizes every entry path, writes files, directories and links, applies
/// permissions and reports progress.
pub fn extract_from_reader<R: Read>(
    reader: R,
    destination: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<ArchiveReport> {
    let destination = destination.as_ref();
    let root = destination.canonicalize().map_err(|e| Error::ExtractionFailed {
        path: destination.to_path_buf(),
        source: e,
    })?;
    let mut archive = tar::Archive::new(GzDecoder::new(reader));

    let mut report = ArchiveReport::default();
    let mut deferred_dirs: Vec<(PathBuf, Option<u32>)> = Vec::new();

    for entry in archive.entries().map_err(|e| Error::Corrupted { source: e })? {
        let mut entry = entry.map_err(|e| Error::Corrupted { source: e })?;

        let raw_path = entry.path().map_err(|_| Error::InvalidPath)?.into_owned();
        let Some(sanitized) = sanitize_path(&raw_path, destination)? else {
            continue;
        };

        let (size, mode, entry_type) = {
            let header = entry.header();
            (header.size().unwrap_or(0), header.mode().ok(), header.entry_type())
        };
        let target = &sanitized.resolved;

        match entry_type {
            EntryType::Directory => {
                check_contained(&root, &sanitized.relative, &sanitized)?;
                ensure_directory(target)?;
                deferred_dirs.push((target.clone(), mode));
            }
            EntryType::Regular | EntryType::Continuous => {
                check_contained(&root, parent_of(&sanitized.relative), &sanitized)?;
                ensure_parent(target)?;
                write_file(&mut entry, target)?;
                apply_mode(target, mode)?;
            }
            EntryType::Symlink => {
                let link_target = entry
                    .link_name()
                    .map_err(|_| Error::InvalidPath)?
                    .ok_or(Error::InvalidPath)?
                    .into_owned();
                let link_target =
                    sanitize_symlink_target(&link_target, &sanitized.relative, destination)?;
                check_contained(&root, parent_of(&sanitized.relative), &sanitized)?;
                ensure_parent(target)?;
                check_link_on_disk(&root, target, &link_target)?;
                write_symlink(&link_target, target)?;
            }
            EntryType::Link => {
                let link_name = entry
                    .link_name()
                    .map_err(|_| Error::InvalidPath)?
                    .ok_or(Error::InvalidPath)?
                    .into_owned();
                let source = sanitize_path(&link_name, destination)?.ok_or(Error::InvalidPath)?;
                check_contained(&root, parent_of(&source.relative), &source)?;
                check_contained(&root, parent_of(&sanitized.relative), &sanitized)?;
                ensure_parent(target)?;
                write_hardlink(&source.resolved, target)?;
            }
            other => {
                tracing::debug!(entry = %raw_path.display(), kind = ?other, "skipping entry");
                continue;
            }
        }

        if let Some(top) = sanitized.root() {
            report.roots.insert(top);
        }
        report.entry_count += 1;
        report.total_bytes += size;

        if options.verbosity == Verbosity::Verbose {
            tracing::info!("{}", sanitized.relative.display());
        }
        options.report(&Progress {
            entries: report.entry_count as u64,
            bytes_processed: report.total_bytes,
            current_file: sanitized.relative.clone(),
        });
    }

    // Deepest directories first so a read-only parent is locked last
    for (dir, mode) in deferred_dirs.iter().rev() {
        apply_mode(dir, *mode)?;
    }

    tracing::debug!(
        entries = report.entry_count,
        bytes = report.total_bytes,
        roots = %report.roots_display(),
        "extraction finished"
    );
    Ok(report)
}

fn parent_of(relative: &Path) -> &Path {
    relative.parent().unwrap_or(Path::new(""))
}

/// Resolves the deepest part of `dir` already on disk, following links written
/// by earlier entries, and requires it to stay below `root`.
fn check_contained(root: &Path, dir: &Path, entry: &SanitizedPath) -> Result<()> {
    let mut existing = root.to_path_buf();
    for component in dir.components() {
        let next = existing.join(component);
        if fs::symlink_metadata(&next).is_err() {
            break;
        }
        existing = next;
    }

    match existing.canonicalize() {
        Ok(resolved) if resolved.starts_with(root) => Ok(()),
        Ok(resolved) => Err(Error::ZipSlip {
            entry: entry.original.clone(),
            resolved,
        }),
        Err(_) => Err(Error::ZipSlip {
            entry: entry.original.clone(),
            resolved: existing,
        }),
    }
}

/// The link's directory is resolved on disk before its target is checked.
fn check_link_on_disk(root: &Path, link: &Path, target: &Path) -> Result<()> {
    let dir = link
        .parent()
        .ok_or(Error::InvalidPath)?
        .canonicalize()
        .map_err(|e| Error::ExtractionFailed {
            path: link.to_path_buf(),
            source: e,
        })?;
    if !resolves_within(root, &dir, target) {
        return Err(Error::SymlinkEscape {
            target: target.to_path_buf(),
            resolved: dir.join(target),
        });
    }
    Ok(())
}

fn ensure_directory(path: &Path) -> Result<()> {
    if !path.is_dir() {
        fs::create_dir_all(path).map_err(|e| Error::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) => ensure_directory(parent),
        None => Ok(()),
    }
}

fn write_file(reader: &mut impl Read, target: &Path) -> Result<()> {
    remove_existing_link(target)?;
    let mut file = File::create(target).map_err(|e| Error::ExtractionFailed {
        path: target.to_path_buf(),
        source: e,
    })?;
    std::io::copy(reader, &mut file).map_err(|e| Error::ExtractionFailed {
        path: target.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

/// Links are never followed when writing over them.
fn remove_existing_link(target: &Path) -> Result<()> {
    if let Ok(meta) = fs::symlink_metadata(target) {
        if !meta.is_dir() {
            fs::remove_file(target).map_err(|e| Error::ExtractionFailed {
                path: target.to_path_buf(),
                source: e,
            })?;
        }
    }
    Ok(())
}

fn write_hardlink(source: &Path, link: &Path) -> Result<()> {
    remove_existing_link(link)?;
    fs::hard_link(source, link).map_err(|e| Error::LinkCreationFailed {
        target: source.to_path_buf(),
        link: link.to_path_buf(),
        source: e,
    })
}

#[cfg(unix)]
fn write_symlink(target: &Path, link: &Path) -> Result<()> {
    remove_existing_link(link)?;
    std::os::unix::fs::symlink(target, link).map_err(|e| Error::LinkCreationFailed {
        target: target.to_path_buf(),
        link: link.to_path_buf(),
        source: e,
    })
}

#[cfg(windows)]
fn write_symlink(target: &Path, link: &Path) -> Result<()> {
    use std::os::windows::fs;
    remove_existing_link(link)?;
    let resolved = link.parent().map(|p| p.join(target)).unwrap_or_default();
    let is_dir_target = resolved.is_dir() || target.to_string_lossy().ends_with('/');
    let result = if is_dir_target {
        fs::symlink_dir(target, link)
    } else {
        fs::symlink_file(target, link)
    };
    result.map_err(|e| Error::LinkCreationFailed {
        target: target.to_path_buf(),
        link: link.to_path_buf(),
        source: e,
    })
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: Option<u32>) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    if let Some(mode) = mode {
        fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777)).map_err(|e| {
            Error::ExtractionFailed {
                path: path.to_path_buf(),
                source: e,
            }
        })?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: Option<u32>) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn extract_from_reader_invalid_stream() {
        let dir = tempfile::tempdir().unwrap();
        let cursor = Cursor::new([0xDE, 0xAD, 0xBE, 0xEF]);
        let result = extract_from_reader(cursor, dir.path(), &ExtractOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn extract_archive_rejects_non_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("mysql-8.0.4.tar.gz");
        std::fs::write(&archive, b"PK\x03\x04 not really a tarball").unwrap();

        let err = extract_archive(&archive, dir.path(), &ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn extract_archive_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_archive(
            dir.path().join("missing.tar.gz"),
            dir.path(),
            &ExtractOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
    }
}
