use eyre::{Context, Result};
use kartei::fsrs::{DEFAULT_MAXIMUM_INTERVAL, DEFAULT_REQUEST_RETENTION, DEFAULT_WEIGHTS, Parameters};
use kartei::storage::{DEFAULT_COMMIT_MESSAGE, default_data_dir};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub storage: StorageConfig,
    pub scheduler: SchedulerConfig,
    pub tui: TuiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub auto_commit: bool,
    pub commit_message: String,
    pub history: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            auto_commit: true,
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            history: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub request_retention: f64,
    pub maximum_interval: u32,
    pub weights: Vec<f64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            request_retention: DEFAULT_REQUEST_RETENTION,
            maximum_interval: DEFAULT_MAXIMUM_INTERVAL,
            weights: DEFAULT_WEIGHTS.to_vec(),
        }
    }
}

impl SchedulerConfig {
    /// Validated scheduler parameters.
    pub fn parameters(&self) -> kartei::Result<Parameters> {
        Parameters::new(self.request_retention, self.maximum_interval, &self.weights)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    pub tick_rate_ms: u64,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 250 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            storage: StorageConfig::default(),
            scheduler: SchedulerConfig::default(),
            tui: TuiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Primary location: ~/.config/kartei/kartei.yml
        let project_name = env!("CARGO_PKG_NAME");
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Fallback location: ./kartei.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kartei::KarteiError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.log_level.as_deref(), Some("info"));
        assert!(config.storage.auto_commit);
        assert!(config.storage.history);
        assert_eq!(config.storage.commit_message, "Update deck");
        assert_eq!(config.tui.tick_rate_ms, 250);

        let params = config.scheduler.parameters().unwrap();
        assert_eq!(params.request_retention(), 0.9);
        assert_eq!(params.maximum_interval(), 36500);
        assert_eq!(params.weights(), &DEFAULT_WEIGHTS);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "scheduler:\n  request_retention: 0.85\nstorage:\n  auto_commit: false\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.scheduler.request_retention, 0.85);
        assert_eq!(config.scheduler.maximum_interval, 36500);
        assert_eq!(config.scheduler.weights.len(), 17);
        assert!(!config.storage.auto_commit);
        assert!(config.storage.history);
    }

    #[test]
    fn test_wrong_weight_count_rejected() {
        let yaml = "scheduler:\n  weights: [0.4, 0.6, 2.4]\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(
            config.scheduler.parameters(),
            Err(KarteiError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_retention_out_of_range_rejected() {
        let config = Config {
            scheduler: SchedulerConfig {
                request_retention: 1.0,
                ..SchedulerConfig::default()
            },
            ..Config::default()
        };
        assert!(config.scheduler.parameters().is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "log_level: debug\nstorage:\n  data_dir: /tmp/kartei-test\ntui:\n  tick_rate_ms: 100").unwrap();

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/kartei-test"));
        assert_eq!(config.tui.tick_rate_ms, 100);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let missing = PathBuf::from("/nonexistent/kartei.yml");
        assert!(Config::load(Some(&missing)).is_err());
    }
}
