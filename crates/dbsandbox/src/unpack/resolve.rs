//! Pure resolution steps: version, destination and bare name.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use dbsandbox_version::VersionError;

use crate::error::UnpackError;
use crate::unpack::request::ArchiveReference;

/// Where and under which version a tarball gets installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlan {
    pub effective_version: String,
    pub destination: PathBuf,
    pub barename: String,
}

/// Pick the version: an explicit one wins over the one sniffed from the file
/// name. The result must map to a port number.
pub fn resolve_version<F>(
    archive: &ArchiveReference,
    explicit: Option<&str>,
    version_to_port: F,
) -> Result<String, UnpackError>
where
    F: FnOnce(&str) -> Result<u16, VersionError>,
{
    let version = explicit
        .filter(|v| !v.is_empty())
        .or(archive.detected_version())
        .ok_or_else(|| UnpackError::MissingVersion {
            filename: archive.filename().to_string(),
        })?;

    let port = version_to_port(version).map_err(|source| UnpackError::InvalidVersion {
        version: version.to_string(),
        source,
    })?;
    tracing::debug!(version, port, "version resolved");

    Ok(version.to_string())
}

/// `base_dir/target` when a target server is given, else `base_dir/<prefix><version>`.
pub fn resolve_destination(
    base_dir: &Path,
    prefix: &str,
    version: &str,
    target: Option<&str>,
) -> Result<PathBuf, UnpackError> {
    let leaf = match target {
        Some(target) => target.to_string(),
        None => format!("{prefix}{version}"),
    };

    if !is_single_component(&leaf) {
        return Err(UnpackError::InvalidDirectoryName { name: leaf });
    }

    Ok(base_dir.join(leaf))
}

/// The tarball must be a `.tar.gz`; returns the name it is expected to unpack to.
pub fn validate_name(archive: &ArchiveReference) -> Result<String, UnpackError> {
    if !archive.recognized_extension() || archive.barename().is_empty() {
        return Err(UnpackError::UnsupportedArchiveFormat {
            filename: archive.filename().to_string(),
        });
    }
    Ok(archive.barename().to_string())
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) => part == OsStr::new(name),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbsandbox_version::version_to_port;

    fn no_port_check(_: &str) -> Result<u16, VersionError> {
        Ok(3306)
    }

    #[test]
    fn version_from_file_name() {
        let archive = ArchiveReference::new("mysql-8.0.4-rc-linux-glibc2.12-x86_64.tar.gz");
        assert_eq!(resolve_version(&archive, None, version_to_port).unwrap(), "8.0.4");
    }

    #[test]
    fn explicit_version_overrides_file_name() {
        let archive = ArchiveReference::new("Percona-Server-5.7.21-linux.tar.gz");
        assert_eq!(
            resolve_version(&archive, Some("5.7.30"), version_to_port).unwrap(),
            "5.7.30"
        );
    }

    #[test]
    fn empty_explicit_version_falls_back() {
        let archive = ArchiveReference::new("Percona-Server-5.7.21-linux.tar.gz");
        assert_eq!(resolve_version(&archive, Some(""), version_to_port).unwrap(), "5.7.21");
    }

    #[test]
    fn missing_version() {
        let archive = ArchiveReference::new("mysql-mybuild.tar.gz");
        let err = resolve_version(&archive, None, no_port_check).unwrap_err();
        assert!(matches!(err, UnpackError::MissingVersion { ref filename } if filename == "mysql-mybuild.tar.gz"));
    }

    #[test]
    fn version_must_map_to_port() {
        let archive = ArchiveReference::new("mysql-mybuild.tar.gz");
        let err = resolve_version(&archive, Some("8.0"), version_to_port).unwrap_err();
        assert!(matches!(err, UnpackError::InvalidVersion { ref version, .. } if version == "8.0"));

        let err = resolve_version(&archive, Some("10.11.100"), version_to_port).unwrap_err();
        assert!(matches!(err, UnpackError::InvalidVersion { .. }));
    }

    #[test]
    fn padded_version_is_rejected() {
        let archive = ArchiveReference::new("mysql-mybuild.tar.gz");
        let err = resolve_version(&archive, Some(" 8.0.18"), version_to_port).unwrap_err();
        assert!(matches!(err, UnpackError::InvalidVersion { ref version, .. } if version == " 8.0.18"));
    }

    #[test]
    fn destination_from_prefix_and_version() {
        let base = Path::new("/opt/mysql");
        assert_eq!(
            resolve_destination(base, "", "8.0.4", None).unwrap(),
            PathBuf::from("/opt/mysql/8.0.4")
        );
        assert_eq!(
            resolve_destination(base, "ps", "5.7.21", None).unwrap(),
            PathBuf::from("/opt/mysql/ps5.7.21")
        );
    }

    #[test]
    fn destination_from_target() {
        let base = Path::new("/opt/mysql");
        assert_eq!(
            resolve_destination(base, "ps", "8.0.18", Some("8.0.17")).unwrap(),
            PathBuf::from("/opt/mysql/8.0.17")
        );
    }

    #[test]
    fn destination_name_must_be_plain() {
        let base = Path::new("/opt/mysql");
        for bad in ["../8.0.17", "/tmp/8.0.17", "a/b", ".", ".."] {
            let err = resolve_destination(base, "", "8.0.4", Some(bad)).unwrap_err();
            assert!(matches!(err, UnpackError::InvalidDirectoryName { .. }), "{bad}");
        }
        let err = resolve_destination(base, "x/", "8.0.4", None).unwrap_err();
        assert!(matches!(err, UnpackError::InvalidDirectoryName { .. }));
    }

    #[test]
    fn tar_gz_only() {
        let archive = ArchiveReference::new("mysql-8.0.18-linux.tar.xz");
        assert!(matches!(
            validate_name(&archive),
            Err(UnpackError::UnsupportedArchiveFormat { .. })
        ));

        let archive = ArchiveReference::new("/tmp/.tar.gz");
        assert!(validate_name(&archive).is_err());

        let archive = ArchiveReference::new("/tmp/mysql-8.0.18-linux.tar.gz");
        assert_eq!(validate_name(&archive).unwrap(), "mysql-8.0.18-linux");
    }
}
