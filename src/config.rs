//! Configuration for the document service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Top-level service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Background processing configuration
    #[serde(default)]
    pub processing: ProcessingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file; missing sections fall back to
    /// their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024, // 50MB
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    pub database_path: PathBuf,
    /// Directory for uploaded document files
    pub upload_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("data/docuchat.db"),
            upload_dir: PathBuf::from("uploads"),
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between chunks in characters (accepted for interface parity;
    /// chunking accumulates whole sentences and does not literally overlap)
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Maximum number of sources cited per answer
    pub top_k: usize,
    /// Minimum relevance a chunk must exceed to be cited (0.0-1.0)
    pub score_threshold: f32,
    /// Score increment per query token found in a chunk
    pub token_weight: f32,
    /// Maximum citation excerpt length in characters
    pub excerpt_length: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            score_threshold: 0.2,
            token_weight: 0.1,
            excerpt_length: 200,
        }
    }
}

/// Background processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Number of concurrent ingestions (default: CPU count, max 4)
    pub max_concurrent_ingests: Option<usize>,
    /// Capacity of the ingest submission queue
    pub queue_capacity: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_concurrent_ingests: None, // Auto-detect from CPU count
            queue_capacity: 256,
        }
    }
}

impl ProcessingConfig {
    /// Effective bound on concurrent ingestions
    pub fn worker_count(&self) -> usize {
        self.max_concurrent_ingests
            .unwrap_or_else(|| num_cpus::get().min(4))
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.retrieval.top_k, 3);
        assert!(config.retrieval.score_threshold > 0.0);
        assert!(config.processing.worker_count() >= 1);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docuchat.toml");
        std::fs::write(
            &path,
            r#"
[chunking]
chunk_size = 500
chunk_overlap = 50
"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.server.port, ServerConfig::default().port);
        assert_eq!(config.retrieval.top_k, 3);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docuchat.toml");
        std::fs::write(&path, "chunking = 12").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, crate::error::Error::Config(_)));
    }
}
