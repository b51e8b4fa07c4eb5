//! Version detection inside arbitrary file names.

use once_cell::sync::Lazy;
use regex::Regex;

static EMBEDDED_VERSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\.\d+\.\d+").unwrap());

/// Returns the first dotted digit triple found in `name`.
///
/// Surrounding characters do not matter: `mysql-8.0.4-rc-linux-glibc2.12-x86_64.tar.gz`
/// yields `8.0.4`, while `glibc2.12` alone is only a pair and is skipped.
pub fn detect_version(name: &str) -> Option<&str> {
    EMBEDDED_VERSION.find(name).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn detects_mysql_release() {
        assert_eq!(
            detect_version("mysql-8.0.4-rc-linux-glibc2.12-x86_64.tar.gz"),
            Some("8.0.4")
        );
    }

    #[test]
    fn detects_percona_release() {
        assert_eq!(detect_version("Percona-Server-5.7.21-linux.tar.gz"), Some("5.7.21"));
    }

    #[test]
    fn first_occurrence_wins() {
        assert_eq!(detect_version("mysql-shell-8.0.18-for-5.7.30.tar.gz"), Some("8.0.18"));
    }

    #[test]
    fn no_triple_no_version() {
        assert_eq!(detect_version("mysql-mybuild.tar.gz"), None);
        assert_eq!(detect_version("glibc2.12.tar.gz"), None);
        assert_eq!(detect_version(""), None);
    }

    proptest! {
        #[test]
        fn embedded_triple_is_found(
            head in "[a-zA-Z_-]{0,12}",
            tail in "[a-zA-Z_-]{0,12}",
            major in 0u32..100,
            minor in 0u32..100,
            rev in 0u32..1000,
        ) {
            let version = format!("{major}.{minor}.{rev}");
            let name = format!("{head}{version}{tail}.tar.gz");
            prop_assert_eq!(detect_version(&name), Some(version.as_str()));
        }

        #[test]
        fn earlier_triple_shadows_later(
            first in (0u32..50, 0u32..50, 0u32..50),
            second in (50u32..100, 0u32..50, 0u32..50),
        ) {
            let a = format!("{}.{}.{}", first.0, first.1, first.2);
            let b = format!("{}.{}.{}", second.0, second.1, second.2);
            let name = format!("pkg-{a}-for-{b}.tar.gz");
            prop_assert_eq!(detect_version(&name), Some(a.as_str()));
        }
    }
}
