use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Result of sanitizing an archive entry path.
#[derive(Clone, Debug)]
pub struct SanitizedPath {
    /// Entry path as stored in the archive.
    pub original: PathBuf,
    /// Normalized path relative to the extraction base, never empty.
    pub relative: PathBuf,
    pub resolved: PathBuf,
}

impl SanitizedPath {
    /// First component of the entry, i.e. the top-level name it unpacks under.
    pub fn root(&self) -> Option<String> {
        self.relative
            .components()
            .next()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
    }
}

/// Sanitize an archive entry path for extraction below `base`.
///
/// Returns `Ok(None)` for entries that name the base itself (`./`).
pub fn sanitize_path<P: AsRef<Path>, B: AsRef<Path>>(
    entry_path: P,
    base: B,
) -> Result<Option<SanitizedPath>> {
    let entry_path = entry_path.as_ref();
    let base = base.as_ref();

    if entry_path.as_os_str().is_empty() {
        return Err(Error::InvalidPath);
    }

    // Reject absolute paths and anything climbing above the base
    let relative = normalize_relative(entry_path).ok_or_else(|| Error::ZipSlip {
        entry: entry_path.to_path_buf(),
        resolved: base.join(entry_path),
    })?;

    if relative.as_os_str().is_empty() {
        return Ok(None);
    }

    let resolved = base.join(&relative);
    Ok(Some(SanitizedPath {
        original: entry_path.to_path_buf(),
        relative,
        resolved,
    }))
}

/// Check that a symlink stored at `link_relative` (relative to `base`) and
/// pointing to `target` stays inside `base`.
///
/// The validated target is returned unchanged so relative links keep working
/// once the unpacked tree is moved elsewhere.
pub fn sanitize_symlink_target<P: AsRef<Path>, L: AsRef<Path>, B: AsRef<Path>>(
    target: P,
    link_relative: L,
    base: B,
) -> Result<PathBuf> {
    let target = target.as_ref();
    let link_relative = link_relative.as_ref();
    let base = base.as_ref();

    if target.has_root() || matches!(target.components().next(), Some(Component::Prefix(_))) {
        return Err(Error::AbsoluteSymlinkTarget {
            target: target.to_path_buf(),
            symlink: base.join(link_relative),
        });
    }

    let combined = link_relative
        .parent()
        .map(|p| p.join(target))
        .unwrap_or_else(|| target.to_path_buf());

    if normalize_relative(&combined).is_none() {
        return Err(Error::SymlinkEscape {
            target: target.to_path_buf(),
            resolved: base.join(combined),
        });
    }

    Ok(target.to_path_buf())
}

/// Whether `target`, taken relative to the absolute directory `dir`, stays
/// below `root` at every step.
pub(crate) fn resolves_within(root: &Path, dir: &Path, target: &Path) -> bool {
    let mut resolved = dir.to_path_buf();
    for component in target.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::ParentDir => {
                resolved.pop();
            }
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return false,
        }
        if !resolved.starts_with(root) {
            return false;
        }
    }
    resolved.starts_with(root)
}

/// Resolve `.` and `..` lexically. `None` when the path is absolute or
/// climbs above its starting point.
fn normalize_relative(path: &Path) -> Option<PathBuf> {
    let mut result = PathBuf::new();
    let mut depth = 0usize;

    for component in path.components() {
        match component {
            Component::Normal(part) => {
                result.push(part);
                depth += 1;
            }
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                result.pop();
                depth -= 1;
            }
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(result)
}
