//! Configuration file management.
//!
//! Handles loading TOML configuration files and writing the default one.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppConfig, AppError, Result};

/// Default configuration file content.
const DEFAULT_CONFIG: &str = r#"# Comment Batch Configuration
# Auto-generated - edit as needed

[extract]
# CSS selector marking the elements whose text is extracted
selector = ".YNedDV"

# Texts shorter than this many UTF-16 code units are discarded
min_length = 6

[batch]
# Batch file kept inside the data directory
file_name = "comments.csv"

# File name used when downloading the batch
download_name = "comments.csv"

# Default output name for merged files
merged_name = "merged_comments.csv"

[paths]
# Custom data directory (optional, defaults to ~/.comment-batch)
# data_dir = "/custom/path"
"#;

/// Path of the configuration file to use.
///
/// An explicit path wins. Otherwise the file is `config.toml` inside the
/// data directory, which is `data_dir` when given.
#[must_use]
pub fn resolve_config_path(explicit: Option<&Path>, data_dir: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let mut config = AppConfig::default();
    config.paths.data_dir = data_dir.map(Path::to_path_buf);
    config.config_file_path()
}

/// Load configuration from `path`, falling back to defaults if it is missing.
///
/// # Errors
/// Returns error if file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        load_config_from_file(path)
    } else {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        Ok(AppConfig::default())
    }
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read config file: {}", path.display()), e))?;

    toml::from_str(&content).map_err(|e| AppError::Config {
        message: format!("Failed to parse config file: {e}"),
    })
}

/// Create the default configuration file at `path` if it doesn't exist.
///
/// Returns `true` if a file was written.
///
/// # Errors
/// Returns error if file cannot be created.
pub fn ensure_config_exists(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::io("Failed to create config directory", e))?;
    }

    fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| AppError::io("Failed to create default config", e))?;

    tracing::info!(path = %path.display(), "Created default configuration");

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_parses() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.extract.selector, ".YNedDV");
        assert_eq!(config.extract.min_length, 6);
        assert_eq!(config.batch.file_name, "comments.csv");
        assert!(config.paths.data_dir.is_none());
    }

    #[test]
    fn test_ensure_then_load() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("sub").join("config.toml");

        assert!(ensure_config_exists(&config_path).unwrap());
        assert!(!ensure_config_exists(&config_path).unwrap());

        let loaded = load_config_from_file(&config_path).unwrap();
        assert_eq!(loaded.batch.merged_name, "merged_comments.csv");
    }

    #[test]
    fn test_config_path_follows_data_dir() {
        let dir = tempdir().unwrap();

        let path = resolve_config_path(None, Some(dir.path()));
        assert_eq!(path, dir.path().join("config.toml"));

        let explicit = dir.path().join("elsewhere.toml");
        assert_eq!(resolve_config_path(Some(&explicit), Some(dir.path())), explicit);

        assert_eq!(
            resolve_config_path(None, None),
            AppConfig::default_data_dir().join("config.toml")
        );
    }

    #[test]
    fn test_load_config_reads_file_in_data_dir() {
        let dir = tempdir().unwrap();
        let path = resolve_config_path(None, Some(dir.path()));

        let defaults = load_config(&path).unwrap();
        assert_eq!(defaults.extract.min_length, 6);

        fs::write(&path, "[extract]\nmin_length = 10\n").unwrap();
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.extract.min_length, 10);
        assert_eq!(loaded.batch.file_name, "comments.csv");
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[extract\nselector = 1").unwrap();

        let err = load_config_from_file(&config_path).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }
}
