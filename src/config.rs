// Runtime settings, read from an optional JSON file. Every field has a
// default, so a file only needs the values it changes.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::DEFAULT_MAX_KEY_LENGTH;
use crate::primitives::AesKeySize;
use crate::{Error, Result};

/// Environment variable naming a config file when none is passed explicitly.
pub const CONFIG_ENV: &str = "CRYPTOLAB_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// How many Caesar candidates to print.
    pub caesar_top_k: usize,
    pub max_key_length: usize,
    /// Key size for generated AES keys.
    pub aes_key_bits: usize,
    /// Modulus size for generated RSA keys.
    pub rsa_key_bits: usize,
    pub aes_benchmark_iterations: u32,
    pub rsa_benchmark_iterations: u32,
    /// Used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            caesar_top_k: 10,
            max_key_length: DEFAULT_MAX_KEY_LENGTH,
            aes_key_bits: 256,
            rsa_key_bits: 2048,
            aes_benchmark_iterations: 100,
            rsa_benchmark_iterations: 10,
            log_filter: "cryptolab=info".to_string(),
        }
    }
}

impl Config {
    /// Load from `path`, or from the file named by `CRYPTOLAB_CONFIG`, or
    /// fall back to the defaults when neither is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match path {
            Some(path) => Self::from_file(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let config_error = |reason: String| Error::Config {
            path: path.display().to_string(),
            reason,
        };
        let contents = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let config = Self::from_json(&contents).map_err(|e| match e {
            Error::Config { reason, .. } => config_error(reason),
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json).map_err(|e| Error::Config {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn aes_key_size(&self) -> Result<AesKeySize> {
        AesKeySize::from_bits(self.aes_key_bits)
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Error::Config {
            path: "<inline>".to_string(),
            reason,
        };
        if self.aes_key_bits != 128 && self.aes_key_bits != 192 && self.aes_key_bits != 256 {
            return Err(invalid(format!(
                "aes_key_bits must be 128, 192 or 256, got {}",
                self.aes_key_bits
            )));
        }
        if self.rsa_key_bits < 512 {
            return Err(invalid(format!(
                "rsa_key_bits must be at least 512, got {}",
                self.rsa_key_bits
            )));
        }
        Ok(())
    }
}
