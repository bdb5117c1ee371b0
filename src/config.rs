use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Index settings configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexSettings {
    pub tokenizer_config: TokenizerConfig,
    /// Capacity of the read-through document cache, in entries
    pub cache_capacity: usize,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            tokenizer_config: TokenizerConfig::default(),
            cache_capacity: 1024,
        }
    }
}

/// Tokenizer configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenizerConfig {
    pub lowercase: bool,
    pub max_token_length: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            max_token_length: 255,
        }
    }
}

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub http_port: u16,
    pub data_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            data_dir: PathBuf::from("./data"),
        }
    }
}

impl ServerConfig {
    pub fn new(http_port: u16, data_dir: PathBuf) -> Self {
        Self {
            http_port,
            data_dir,
        }
    }

    /// Address the HTTP listener binds to
    pub fn http_addr(&self) -> String {
        format!("0.0.0.0:{}", self.http_port)
    }
}
