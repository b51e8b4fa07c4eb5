use crate::{Error, Result};
use std::fs;
use std::path::Path;

/// True when `path` exists and is a directory (symlinks are followed).
pub fn dir_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_dir()
}

/// Moves the directory `from` to `to` without clobbering.
///
/// `to` must not exist yet; an existing target is reported instead of being
/// replaced, so a finished installation is never overwritten.
pub fn rename_dir(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
    let from = from.as_ref();
    let to = to.as_ref();

    let meta = fs::symlink_metadata(from).map_err(|_| Error::NotFound {
        path: from.to_path_buf(),
    })?;
    if !meta.is_dir() {
        return Err(Error::NotADirectory {
            path: from.to_path_buf(),
        });
    }
    if fs::symlink_metadata(to).is_ok() {
        return Err(Error::AlreadyExists {
            path: to.to_path_buf(),
        });
    }

    tracing::debug!(from = %from.display(), to = %to.display(), "renaming directory");
    fs::rename(from, to).map_err(|e| Error::Rename {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_rename_dir() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("file.txt"), "data").unwrap();

        rename_dir(&src, &dest).unwrap();
        assert!(!src.exists());
        assert!(dest.join("file.txt").exists());
    }

    #[test]
    fn test_rename_dir_refuses_existing_target() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::create_dir_all(&dest).unwrap();

        let err = rename_dir(&src, &dest).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { .. }));
        assert!(src.exists());
    }

    #[test]
    fn test_rename_dir_missing_source() {
        let dir = tempdir().unwrap();
        let err = rename_dir(dir.path().join("nope"), dir.path().join("dest")).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_rename_dir_rejects_file_source() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "data").unwrap();
        let err = rename_dir(&file, dir.path().join("dest")).unwrap_err();
        assert!(matches!(err, Error::NotADirectory { .. }));
    }

    #[test]
    fn test_dir_exists() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "data").unwrap();

        assert!(dir_exists(dir.path()));
        assert!(!dir_exists(&file));
        assert!(!dir_exists(dir.path().join("missing")));
    }
}
