use crate::error::{PharmaError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_EXPIRING_WINDOW_DAYS: u32 = 30;

/// Configuration for pharmsys, stored as config.json in the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PharmaConfig {
    /// How far ahead (in days) the expiring-stock view looks when no
    /// explicit window is given.
    #[serde(default = "default_expiring_window")]
    pub expiring_window_days: u32,
}

fn default_expiring_window() -> u32 {
    DEFAULT_EXPIRING_WINDOW_DAYS
}

impl Default for PharmaConfig {
    fn default() -> Self {
        Self {
            expiring_window_days: DEFAULT_EXPIRING_WINDOW_DAYS,
        }
    }
}

impl PharmaConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(PharmaError::Io)?;
        let config: PharmaConfig =
            serde_json::from_str(&content).map_err(PharmaError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(PharmaError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(PharmaError::Serialization)?;
        fs::write(config_path, content).map_err(PharmaError::Io)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = PharmaConfig::default();
        assert_eq!(config.expiring_window_days, 30);
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = env::temp_dir().join("pharmsys_test_config_missing");
        let _ = fs::remove_dir_all(&temp_dir);

        let config = PharmaConfig::load(&temp_dir).unwrap();
        assert_eq!(config, PharmaConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = env::temp_dir().join("pharmsys_test_config_save");
        let _ = fs::remove_dir_all(&temp_dir);
        fs::create_dir_all(&temp_dir).unwrap();

        let config = PharmaConfig {
            expiring_window_days: 14,
        };
        config.save(&temp_dir).unwrap();

        let loaded = PharmaConfig::load(&temp_dir).unwrap();
        assert_eq!(loaded.expiring_window_days, 14);

        // Cleanup
        let _ = fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn test_missing_field_falls_back_to_default() {
        let parsed: PharmaConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.expiring_window_days, 30);
    }
}
