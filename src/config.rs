//! Configuration management for ragworkshop
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.ragworkshop/config.toml

use crate::errors::{RagError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete workshop configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub harness: HarnessConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ollama connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub host: String,
    pub port: u16,
    pub completion_model: String,
    pub embedding_model: String,
    pub request_timeout_secs: u64,
}

/// Retrieval configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Results per retrieval call (exercises and simple generation)
    pub top_k: usize,
    /// Concurrent embedding calls during preprocessing
    pub embed_concurrency: usize,
}

/// Agent loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum decision steps before the loop gives up
    pub max_iterations: usize,
    /// Results per search tool call
    pub top_k: usize,
    /// Ask the model for a best-effort answer when the budget runs out
    pub synthesize_on_exhaustion: bool,
}

/// Test harness configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Test cases evaluated concurrently
    pub concurrency: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when RUST_LOG is unset
    pub filter: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 11434,
            completion_model: crate::streaming::DEFAULT_MODEL.to_string(),
            embedding_model: crate::streaming::DEFAULT_EMBEDDING_MODEL.to_string(),
            request_timeout_secs: 60,
        }
    }
}

impl OllamaConfig {
    /// Get Ollama base URL
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            embed_concurrency: 8,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            top_k: 3,
            synthesize_on_exhaustion: true,
        }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "ragworkshop=warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RagError::Config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| RagError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard config location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".ragworkshop").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.retrieval.top_k == 0 {
            return Err(RagError::Config(
                "retrieval.top_k must be greater than 0".to_string(),
            ));
        }

        if self.retrieval.embed_concurrency == 0 {
            return Err(RagError::Config(
                "retrieval.embed_concurrency must be greater than 0".to_string(),
            ));
        }

        if self.agent.max_iterations == 0 {
            return Err(RagError::Config(
                "agent.max_iterations must be greater than 0".to_string(),
            ));
        }

        if self.agent.top_k == 0 {
            return Err(RagError::Config(
                "agent.top_k must be greater than 0".to_string(),
            ));
        }

        if self.harness.concurrency == 0 {
            return Err(RagError::Config(
                "harness.concurrency must be greater than 0".to_string(),
            ));
        }

        if self.ollama.completion_model.trim().is_empty()
            || self.ollama.embedding_model.trim().is_empty()
        {
            return Err(RagError::Config("model names must not be empty".to_string()));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| RagError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RagError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| RagError::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Render as TOML for display
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| RagError::Config(format!("Failed to serialize config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ollama.host, "127.0.0.1");
        assert_eq!(config.ollama.port, 11434);
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.agent.max_iterations, 10);
        assert!(config.agent.synthesize_on_exhaustion);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_iterations() {
        let mut config = Config::default();
        config.agent.max_iterations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_top_k() {
        let mut config = Config::default();
        config.retrieval.top_k = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.agent.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_model() {
        let mut config = Config::default();
        config.ollama.embedding_model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ollama_url() {
        let config = Config::default();
        assert_eq!(config.ollama.base_url(), "http://127.0.0.1:11434");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[agent]\nmax_iterations = 4\n").unwrap();
        assert_eq!(config.agent.max_iterations, 4);
        assert_eq!(config.agent.top_k, 3);
        assert_eq!(config.retrieval.embed_concurrency, 8);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.ollama.completion_model = "llama3:8b".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[harness]\nconcurrency = 0\n").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(err, RagError::Config(_)));
    }
}
