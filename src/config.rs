use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tracking::ScanRules;

pub const CONFIG_ENV: &str = "DOCTRACK_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanRules,
    pub leaderboard_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan: ScanRules::default(),
            leaderboard_limit: 10,
        }
    }
}

impl Config {
    /// Reads a JSON config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doctrack.json");
        std::fs::write(&path, r#"{"scan": {"max_year": 2026}}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.scan.base_year, 2023);
        assert_eq!(config.scan.min_year, 2024);
        assert_eq!(config.scan.max_year, 2026);
        assert_eq!(config.leaderboard_limit, 10);
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(Config::load_or_default(None).unwrap(), Config::default());
    }
}
