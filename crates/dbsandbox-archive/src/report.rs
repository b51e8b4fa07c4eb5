use std::collections::BTreeSet;

use crate::error::{Error, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArchiveReport {
    pub entry_count: usize,
    pub total_bytes: u64,
    /// Top-level names created in the extraction directory.
    pub roots: BTreeSet<String>,
}

impl ArchiveReport {
    /// The single top-level directory the archive unpacked to.
    pub fn produced_root(&self) -> Result<&str> {
        let mut roots = self.roots.iter();
        match (roots.next(), roots.next()) {
            (Some(root), None) => Ok(root),
            _ => Err(Error::NoSingleRoot {
                roots: self.roots_display(),
            }),
        }
    }

    pub fn roots_display(&self) -> String {
        if self.roots.is_empty() {
            return "nothing".to_string();
        }
        self.roots.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(roots: &[&str]) -> ArchiveReport {
        ArchiveReport {
            entry_count: 5,
            total_bytes: 1024,
            roots: roots.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn single_root() {
        let report = report(&["mysql-8.0.4"]);
        assert_eq!(report.produced_root().unwrap(), "mysql-8.0.4");
    }

    #[test]
    fn several_roots() {
        let err = report(&["bin", "lib"]).produced_root().unwrap_err();
        assert!(matches!(err, Error::NoSingleRoot { ref roots } if roots == "bin, lib"));
    }

    #[test]
    fn empty_archive() {
        let err = report(&[]).produced_root().unwrap_err();
        assert!(matches!(err, Error::NoSingleRoot { ref roots } if roots == "nothing"));
    }
}
