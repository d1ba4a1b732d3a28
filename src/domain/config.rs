//! Configuration models.
//!
//! Every field has a serde default so a partial (or missing) config file
//! still yields a usable configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// CSS selector marking the elements whose text is extracted.
    #[serde(default = "default_selector")]
    pub selector: String,

    /// Minimum trimmed length, in UTF-16 code units, for a text to be kept.
    #[serde(default = "default_min_length")]
    pub min_length: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            selector: default_selector(),
            min_length: default_min_length(),
        }
    }
}

fn default_selector() -> String {
    ".YNedDV".to_string()
}

const fn default_min_length() -> usize {
    6
}

/// Batch file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Resource key of the batch inside the data directory.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// File name handed back by a download.
    #[serde(default = "default_download_name")]
    pub download_name: String,

    /// Default output name for merged files.
    #[serde(default = "default_merged_name")]
    pub merged_name: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            download_name: default_download_name(),
            merged_name: default_merged_name(),
        }
    }
}

fn default_file_name() -> String {
    "comments.csv".to_string()
}

fn default_download_name() -> String {
    "comments.csv".to_string()
}

fn default_merged_name() -> String {
    "merged_comments.csv".to_string()
}

/// Path configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathConfig {
    /// Base data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Extraction configuration.
    #[serde(default)]
    pub extract: ExtractConfig,

    /// Batch file configuration.
    #[serde(default)]
    pub batch: BatchConfig,

    /// Path configuration.
    #[serde(default)]
    pub paths: PathConfig,
}

impl AppConfig {
    /// Get the data directory, using default if not configured.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.paths
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".comment-batch")
    }

    /// Get the batch file path.
    #[must_use]
    pub fn batch_file_path(&self) -> PathBuf {
        self.data_dir().join(&self.batch.file_name)
    }

    /// Get the config file path.
    #[must_use]
    pub fn config_file_path(&self) -> PathBuf {
        self.data_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig = toml::from_str("[extract]\nmin_length = 10\n").unwrap();
        assert_eq!(config.extract.min_length, 10);
        assert_eq!(config.extract.selector, ".YNedDV");
        assert_eq!(config.batch.merged_name, "merged_comments.csv");
    }

    #[test]
    fn test_data_dir_override() {
        let mut config = AppConfig::default();
        config.paths.data_dir = Some(PathBuf::from("/tmp/batches"));
        assert_eq!(
            config.batch_file_path(),
            PathBuf::from("/tmp/batches/comments.csv")
        );
    }
}
