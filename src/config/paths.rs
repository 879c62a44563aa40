//! Configuration directory resolution

use directories::ProjectDirs;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "KUBECOMPOSE_CONFIG_DIR";

/// Get the configuration directory path
///
/// `KUBECOMPOSE_CONFIG_DIR` wins; otherwise the platform config directory
/// (`$XDG_CONFIG_HOME/kubecompose` or `~/.config/kubecompose` on Linux).
pub fn config_dir() -> PathBuf {
    resolve_config_dir(std::env::var_os(CONFIG_DIR_ENV))
}

fn resolve_config_dir(override_dir: Option<OsString>) -> PathBuf {
    if let Some(dir) = override_dir {
        return PathBuf::from(dir);
    }
    ProjectDirs::from("", "", "kubecompose")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".kubecompose"))
}

/// Get the root configuration file path
pub fn root_config_path() -> PathBuf {
    config_dir().join("config.yaml")
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_config_path_is_yaml_in_config_dir() {
        let path = root_config_path();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("config.yaml")
        );
        assert_eq!(path.parent(), Some(config_dir().as_path()));
    }

    #[test]
    fn test_override_dir_wins() {
        let dir = resolve_config_dir(Some(OsString::from("/srv/kubecompose-conf")));
        assert_eq!(dir, PathBuf::from("/srv/kubecompose-conf"));
    }

    #[test]
    fn test_platform_dir_is_named_after_the_tool() {
        let dir = resolve_config_dir(None);
        assert!(dir.to_string_lossy().ends_with("kubecompose"));
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // Second call is a no-op
        ensure_dir(&nested).unwrap();
    }
}
