use std::path::{Path, PathBuf};

pub const SANDBOX_BINARY_LABEL: &str = "sandbox-binary";
pub const SANDBOX_BINARY_ENV: &str = "SANDBOX_BINARY";
pub const VERBOSITY_LABEL: &str = "verbosity";
pub const UNPACK_VERSION_LABEL: &str = "unpack-version";
pub const PREFIX_LABEL: &str = "prefix";
pub const SHELL_LABEL: &str = "shell";
pub const TARGET_SERVER_LABEL: &str = "target-server";

pub const DEFAULT_VERBOSITY: u8 = 1;

/// Sandbox binary directory relative to the user's home.
pub const DEFAULT_SANDBOX_BINARY: &str = "opt/mysql";

/// The only archive layout database tarballs ship in.
pub const ARCHIVE_SUFFIX: &str = ".tar.gz";

pub fn default_sandbox_binary() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(DEFAULT_SANDBOX_BINARY))
}

/// Render `path` for messages, with the home directory spelled `$HOME`.
pub fn display_home(path: &Path) -> String {
    replace_home(path, home::home_dir().as_deref())
}

fn replace_home(path: &Path, home: Option<&Path>) -> String {
    let Some(home) = home.filter(|h| h.components().count() > 1) else {
        return path.display().to_string();
    };
    match path.strip_prefix(home) {
        Ok(rest) if rest.as_os_str().is_empty() => "$HOME".to_string(),
        Ok(rest) => format!("$HOME/{}", rest.display()),
        Err(_) => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_is_replaced() {
        let home = Path::new("/home/msandbox");
        assert_eq!(
            replace_home(Path::new("/home/msandbox/opt/mysql/8.0.4"), Some(home)),
            "$HOME/opt/mysql/8.0.4"
        );
        assert_eq!(replace_home(home, Some(home)), "$HOME");
    }

    #[test]
    fn other_paths_untouched() {
        let home = Path::new("/home/msandbox");
        assert_eq!(
            replace_home(Path::new("/opt/mysql/8.0.4"), Some(home)),
            "/opt/mysql/8.0.4"
        );
        assert_eq!(
            replace_home(Path::new("/home/msandbox2/x"), Some(home)),
            "/home/msandbox2/x"
        );
        assert_eq!(replace_home(Path::new("/opt/mysql"), None), "/opt/mysql");
    }

    #[test]
    fn root_home_is_ignored() {
        assert_eq!(
            replace_home(Path::new("/opt/mysql"), Some(Path::new("/"))),
            "/opt/mysql"
        );
    }

    #[test]
    fn default_dir_under_home() {
        if let (Some(dir), Some(home)) = (default_sandbox_binary(), home::home_dir()) {
            assert_eq!(dir, home.join("opt").join("mysql"));
        }
    }
}
