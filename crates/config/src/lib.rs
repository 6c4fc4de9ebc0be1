// Configuration Management
//
// This crate handles all configuration loading for the chat API:
// - Configuration structs and deserialization
// - File loading logic with env-var fallbacks
//
// This keeps configuration concerns separate from service logic.

use std::path::Path;
use thiserror::Error;

pub mod types;

pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found. Tried paths: {paths}")]
    FileNotFound { paths: String },

    #[error("Failed to read configuration file: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {source}")]
    ParseError {
        #[from]
        source: serde_yaml::Error,
    },
}

impl ApiConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ApiConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from default locations, falling back to env vars
    pub fn load() -> Result<Self, ConfigError> {
        let config_paths = ["config/config.yaml", "config.yaml", "config/default.yaml"];

        for path in &config_paths {
            if std::path::Path::new(path).exists() {
                return Self::load_from_file(path);
            }
        }

        // No file on disk: build the whole configuration from the environment
        Ok(Self::from_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_from_yaml_file() {
        let yaml = r#"
server:
  host: "127.0.0.1"
  port: 8000
database:
  host: "db.internal"
  port: 5432
  database: "donna"
  username: "donna"
  password: "secret"
  max_connections: 10
gemini:
  api_key: "test-key"
  chat_model: "gemini-2.0-flash"
  contextual_model: "gemini-2.5-flash"
qdrant:
  url: "http://localhost:6333"
ollama:
  url: "http://localhost:11434"
  embedding_model: "nomic-embed-text"
logging:
  level: "debug"
  format: "compact"
"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = ApiConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.database, "donna");
        assert_eq!(config.gemini.chat_model, "gemini-2.0-flash");
        assert_eq!(config.logging.format, "compact");
    }

    #[test]
    fn parse_error_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"server: [not, a, mapping]").unwrap();

        let err = ApiConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
