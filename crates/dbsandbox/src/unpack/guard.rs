use std::path::Path;

use crate::error::UnpackError;

/// Non-clobbering rules: the base directory must exist, and the destination
/// must not, unless a shell tarball is merged into it.
pub fn check_conflicts<F>(
    base_dir: &Path,
    destination: &Path,
    shell: bool,
    dir_exists: F,
) -> Result<(), UnpackError>
where
    F: Fn(&Path) -> bool,
{
    if !dir_exists(base_dir) {
        return Err(UnpackError::MissingBaseDir(base_dir.to_path_buf()));
    }

    if dir_exists(destination) {
        if !shell {
            return Err(UnpackError::DestinationExists(destination.to_path_buf()));
        }
        tracing::debug!(destination = %destination.display(), "merging into existing directory");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;

    #[test]
    fn missing_base_dir_checked_first() {
        let probed = RefCell::new(Vec::new());
        let err = check_conflicts(
            Path::new("/opt/mysql"),
            Path::new("/opt/mysql/8.0.4"),
            false,
            |p| {
                probed.borrow_mut().push(p.to_path_buf());
                false
            },
        )
        .unwrap_err();

        assert!(matches!(err, UnpackError::MissingBaseDir(_)));
        assert_eq!(*probed.borrow(), vec![PathBuf::from("/opt/mysql")]);
    }

    #[test]
    fn existing_destination_conflicts() {
        let err = check_conflicts(
            Path::new("/opt/mysql"),
            Path::new("/opt/mysql/8.0.4"),
            false,
            |_| true,
        )
        .unwrap_err();
        assert!(matches!(err, UnpackError::DestinationExists(ref p) if p == Path::new("/opt/mysql/8.0.4")));
    }

    #[test]
    fn shell_mode_accepts_existing_destination() {
        check_conflicts(Path::new("/opt/mysql"), Path::new("/opt/mysql/8.0.4"), true, |_| true)
            .unwrap();
    }

    #[test]
    fn fresh_destination_passes() {
        check_conflicts(
            Path::new("/opt/mysql"),
            Path::new("/opt/mysql/8.0.4"),
            false,
            |p| p == Path::new("/opt/mysql"),
        )
        .unwrap();
    }
}
