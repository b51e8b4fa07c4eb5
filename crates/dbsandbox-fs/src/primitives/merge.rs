use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Lists the paths under `into` that `merge_tree(from, into)` would refuse to overwrite.
///
/// Directories present on both sides are descended into; any other pair of
/// existing entries is a collision.
pub fn merge_collisions(from: impl AsRef<Path>, into: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut collisions = Vec::new();
    collect_collisions(from.as_ref(), into.as_ref(), &mut collisions)?;
    collisions.sort();
    Ok(collisions)
}

fn collect_collisions(from: &Path, into: &Path, collisions: &mut Vec<PathBuf>) -> Result<()> {
    for entry in read_dir(from)? {
        let (src_path, is_dir) = entry;
        let Some(name) = src_path.file_name() else {
            continue;
        };
        let dest_path = into.join(name);

        match fs::symlink_metadata(&dest_path) {
            Err(_) => {}
            Ok(meta) if meta.is_dir() && is_dir => {
                collect_collisions(&src_path, &dest_path, collisions)?;
            }
            Ok(_) => collisions.push(dest_path),
        }
    }
    Ok(())
}

/// Moves every entry of `from` into `into`, consuming `from`.
///
/// Entries missing from `into` are renamed whole, directories present on both
/// sides are merged recursively. An existing non-directory target aborts with
/// [`Error::AlreadyExists`]; run [`merge_collisions`] first to fail before
/// anything moves.
pub fn merge_tree(from: impl AsRef<Path>, into: impl AsRef<Path>) -> Result<()> {
    let from = from.as_ref();
    let into = into.as_ref();

    if !into.is_dir() {
        return Err(Error::NotADirectory {
            path: into.to_path_buf(),
        });
    }

    for (src_path, is_dir) in read_dir(from)? {
        let Some(name) = src_path.file_name() else {
            continue;
        };
        let dest_path = into.join(name);

        match fs::symlink_metadata(&dest_path) {
            Err(_) => {
                tracing::trace!(from = %src_path.display(), to = %dest_path.display(), "moving");
                fs::rename(&src_path, &dest_path).map_err(|e| Error::Rename {
                    from: src_path.clone(),
                    to: dest_path.clone(),
                    source: e,
                })?;
            }
            Ok(meta) if meta.is_dir() && is_dir => merge_tree(&src_path, &dest_path)?,
            Ok(_) => return Err(Error::AlreadyExists { path: dest_path }),
        }
    }

    fs::remove_dir(from).map_err(|e| Error::Write {
        path: from.to_path_buf(),
        source: e,
    })
}

/// Directory entries of `dir` as `(path, is_real_directory)`, symlinks not followed.
fn read_dir(dir: &Path) -> Result<Vec<(PathBuf, bool)>> {
    let read_err = |e| Error::Read {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let file_type = entry.file_type().map_err(|e| Error::Read {
            path: entry.path(),
            source: e,
        })?;
        entries.push((entry.path(), file_type.is_dir()));
    }
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn layout(root: &Path, files: &[&str]) {
        for file in files {
            let path = root.join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, file).unwrap();
        }
    }

    #[test]
    fn test_merge_tree_moves_new_entries() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("shell");
        let dest = dir.path().join("server");
        layout(&src, &["bin/mysqlsh", "lib/mysqlsh/libpython.so", "share/mysqlsh/prompt.json"]);
        layout(&dest, &["bin/mysqld", "lib/plugin/auth.so"]);

        assert!(merge_collisions(&src, &dest).unwrap().is_empty());
        merge_tree(&src, &dest).unwrap();

        assert!(dest.join("bin/mysqlsh").exists());
        assert!(dest.join("bin/mysqld").exists());
        assert!(dest.join("lib/mysqlsh/libpython.so").exists());
        assert!(dest.join("lib/plugin/auth.so").exists());
        assert!(dest.join("share/mysqlsh/prompt.json").exists());
        assert!(!src.exists());
    }

    #[test]
    fn test_merge_collisions_reports_existing_files() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("shell");
        let dest = dir.path().join("server");
        layout(&src, &["bin/mysqlsh", "bin/mysql", "LICENSE"]);
        layout(&dest, &["bin/mysql", "LICENSE", "bin/mysqld"]);

        let collisions = merge_collisions(&src, &dest).unwrap();
        assert_eq!(collisions, vec![dest.join("LICENSE"), dest.join("bin/mysql")]);
    }

    #[test]
    fn test_merge_tree_stops_on_collision() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("shell");
        let dest = dir.path().join("server");
        layout(&src, &["README"]);
        layout(&dest, &["README"]);

        let err = merge_tree(&src, &dest).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { .. }));
        assert_eq!(std::fs::read_to_string(dest.join("README")).unwrap(), "README");
    }

    #[test]
    fn test_merge_tree_requires_target_dir() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("shell");
        layout(&src, &["bin/mysqlsh"]);

        let err = merge_tree(&src, dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, Error::NotADirectory { .. }));
    }
}
