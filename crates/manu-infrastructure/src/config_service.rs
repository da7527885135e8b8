use manu_core::config::ChatConfig;
use manu_core::error::{ChatError, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths::ManuPaths;

/// Reads and writes `config.toml`.
///
/// This type is purely responsible for the file on disk; deciding what the
/// defaults are is left to [`ChatConfig`].
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Creates a service for the default config file path
    /// (`~/.config/manu/config.toml`).
    pub fn new() -> Result<Self> {
        let path = ManuPaths::config_file().map_err(|e| ChatError::config(e.to_string()))?;
        Ok(Self { path })
    }

    /// Creates a service for a custom path (CLI override, tests).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration.
    ///
    /// # Returns
    ///
    /// - `Ok(ChatConfig::default())` if the file does not exist or is empty.
    /// - `Ok(config)` if the file parses and its topic table is valid.
    /// - `Err(ChatError::Serialization)` if the file exists but is malformed.
    /// - `Err(ChatError::InvalidTopicTable)` if custom topics are malformed.
    pub fn load(&self) -> Result<ChatConfig> {
        if !self.path.exists() {
            tracing::debug!("[ConfigService] No config at {:?}, using defaults", self.path);
            return Ok(ChatConfig::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            ChatError::io(format!(
                "Failed to read config file at {:?}: {}",
                self.path, e
            ))
        })?;

        if content.trim().is_empty() {
            return Ok(ChatConfig::default());
        }

        let config: ChatConfig = toml::from_str(&content).map_err(|e| ChatError::Serialization {
            format: "TOML".to_string(),
            message: format!("{:?}: {}", self.path, e),
        })?;

        // Reject bad topic tables at load time rather than on first reply.
        config.topic_table()?;

        tracing::info!("[ConfigService] Loaded config from {:?}", self.path);
        Ok(config)
    }

    /// Writes the configuration, creating the parent directory if needed.
    pub fn save(&self, config: &ChatConfig) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| {
                    ChatError::io(format!(
                        "Failed to create config directory at {:?}: {}",
                        dir, e
                    ))
                })?;
            }
        }

        let toml_string = toml::to_string_pretty(config)?;
        fs::write(&self.path, toml_string).map_err(|e| {
            ChatError::io(format!(
                "Failed to write config file at {:?}: {}",
                self.path, e
            ))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manu_core::reply::VariantPolicy;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let service = ConfigService::with_path(dir.path().join("nope.toml"));
        assert_eq!(service.load().unwrap(), ChatConfig::default());
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let file = NamedTempFile::new().unwrap();
        let service = ConfigService::with_path(file.path());
        assert_eq!(service.load().unwrap(), ChatConfig::default());
    }

    #[test]
    fn test_load_assistant_section() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[assistant]
reply_timeout_ms = 5000
variant_policy = "random"
"#
        )
        .unwrap();

        let config = ConfigService::with_path(file.path()).load().unwrap();
        assert_eq!(config.assistant.reply_timeout_ms, 5000);
        assert_eq!(config.assistant.variant_policy, VariantPolicy::Random);
        assert_eq!(config.assistant.typing_delay_ms, 0);
    }

    #[test]
    fn test_malformed_file_is_serialization_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[assistant\nreply_timeout_ms = ").unwrap();

        let err = ConfigService::with_path(file.path()).load().unwrap_err();
        assert!(err.is_serialization());
    }

    #[test]
    fn test_invalid_topics_rejected_on_load() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[[topics]]
name = "silent"
keywords = ["x"]
responses = []
"#
        )
        .unwrap();

        let err = ConfigService::with_path(file.path()).load().unwrap_err();
        assert!(matches!(err, ChatError::InvalidTopicTable(_)));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let service = ConfigService::with_path(dir.path().join("nested").join("config.toml"));

        let mut config = ChatConfig::default();
        config.assistant.typing_delay_ms = 750;
        config.fallback = Some("Ask me about growth!".to_string());
        service.save(&config).unwrap();

        assert_eq!(service.load().unwrap(), config);
    }
}
