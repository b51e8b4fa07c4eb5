//! Strict `major.minor.rev` versions and their sandbox port numbers.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static TRIPLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?<major>[0-9]+)\.(?<minor>[0-9]+)\.(?<rev>[0-9]+)$").unwrap()
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("empty version")]
    Empty,
    #[error("'{0}' is not a <major>.<minor>.<revision> version")]
    Malformed(String),
    #[error("version '{version}' maps to port {port}, outside 1-65535")]
    PortOutOfRange { version: String, port: u64 },
}

/// A database server version such as `8.0.18`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub rev: u64,
}

impl Version {
    /// Surrounding whitespace is rejected, not trimmed.
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        if s.is_empty() {
            return Err(VersionError::Empty);
        }

        let caps = TRIPLE_REGEX
            .captures(s)
            .ok_or_else(|| VersionError::Malformed(s.to_string()))?;
        let part = |name: &str| -> Result<u64, VersionError> {
            caps[name]
                .parse()
                .map_err(|_| VersionError::Malformed(s.to_string()))
        };

        Ok(Version {
            major: part("major")?,
            minor: part("minor")?,
            rev: part("rev")?,
        })
    }

    /// Port derived from the version: major, minor and a two digit revision
    /// concatenated, so `5.7.21` becomes 5721 and `8.0.4` becomes 8004.
    pub fn port(&self) -> Result<u16, VersionError> {
        let digits = format!("{}{}{:02}", self.major, self.minor, self.rev);
        let port: u64 = digits.parse().map_err(|_| VersionError::PortOutOfRange {
            version: self.to_string(),
            port: u64::MAX,
        })?;

        match u16::try_from(port) {
            Ok(p) if p > 0 => Ok(p),
            _ => Err(VersionError::PortOutOfRange {
                version: self.to_string(),
                port,
            }),
        }
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.rev)
    }
}

/// Validates `version` by mapping it to the port a sandbox would use.
pub fn version_to_port(version: &str) -> Result<u16, VersionError> {
    Version::parse(version)?.port()
}
