/// CLI configuration
use crate::error::{CliError, Result};
use cadence_playback::{PlaybackConfig, RepeatMode, DEFAULT_RECENT_CAPACITY};
use cadence_storage::DEFAULT_NAMESPACE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CadenceConfig {
    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Record namespace, one per user/profile
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    /// Repeat mode when nothing has been persisted yet
    #[serde(default)]
    pub default_repeat: RepeatMode,

    #[serde(default = "default_recent_capacity")]
    pub recent_capacity: usize,
}

impl CadenceConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `cadence.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(config::File::from(path).required(true)),
            None => settings.add_source(config::File::from(PathBuf::from("cadence.toml")).required(false)),
        };

        // Override with environment variables (CADENCE_STORAGE__DATABASE_PATH, ...)
        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.namespace.trim().is_empty() {
            return Err(CliError::Config(
                "storage namespace must not be empty".to_string(),
            ));
        }

        if self.storage.database_path.as_os_str().is_empty() {
            return Err(CliError::Config(
                "storage database_path must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Settings for a new playback session
    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            recent_capacity: self.playback.recent_capacity,
            repeat: self.playback.default_repeat,
            ..PlaybackConfig::default()
        }
    }
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        database_path: default_database_path(),
        namespace: default_namespace(),
    }
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./data/cadence.redb")
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        default_repeat: RepeatMode::Off,
        recent_capacity: default_recent_capacity(),
    }
}

fn default_recent_capacity() -> usize {
    DEFAULT_RECENT_CAPACITY
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            playback: default_playback(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = CadenceConfig::default();
        assert_eq!(config.storage.namespace, "cadence-queue");
        assert_eq!(config.playback.recent_capacity, 20);
        assert_eq!(config.playback.default_repeat, RepeatMode::Off);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_from_file_fills_missing_fields() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[playback]\ndefault_repeat = \"all\"\n\n[storage]\nnamespace = \"alice\""
        )
        .unwrap();

        let config = CadenceConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.playback.default_repeat, RepeatMode::All);
        assert_eq!(config.playback.recent_capacity, 20);
        assert_eq!(config.storage.namespace, "alice");
        assert_eq!(config.storage.database_path, default_database_path());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = CadenceConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn empty_namespace_rejected() {
        let mut config = CadenceConfig::default();
        config.storage.namespace = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn playback_config_carries_settings() {
        let mut config = CadenceConfig::default();
        config.playback.default_repeat = RepeatMode::One;
        config.playback.recent_capacity = 5;

        let playback = config.playback_config();
        assert_eq!(playback.repeat, RepeatMode::One);
        assert_eq!(playback.recent_capacity, 5);
        assert_eq!(playback.volume, 1.0);
    }
}
