//! Runtime configuration for the model and the HTTP server.

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::model::StyleVariant;

/// Which model to load and where to find it.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Stylization model to serve.
    pub variant: StyleVariant,

    /// Explicit model file. Must exist when set.
    pub model_path: Option<PathBuf>,

    /// Download URL overriding the variant's default.
    pub model_url: Option<String>,

    /// Download cache directory. `None` for the platform cache directory.
    pub cache_dir: Option<PathBuf>,

    /// Skip the GPU probe and run on CPU.
    pub force_cpu: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            variant: StyleVariant::Hayao,
            model_path: None,
            model_url: None,
            cache_dir: None,
            force_cpu: false,
        }
    }
}

impl ModelConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the model URL is set but empty or not HTTP(S).
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.model_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::InvalidParameter {
                    name: "model_url".to_string(),
                    reason: "must be an http:// or https:// URL".to_string(),
                });
            }
        }

        Ok(())
    }
}

const BYTES_PER_MIB: usize = 1024 * 1024;

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Largest accepted upload body, in MiB.
    pub max_upload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8501,
            max_upload_mb: 20,
        }
    }
}

impl ServerConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload limit is zero or does not fit in
    /// `usize` bytes.
    pub fn validate(&self) -> Result<()> {
        if self.max_upload_mb == 0 {
            return Err(Error::InvalidParameter {
                name: "max_upload_mb".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.max_upload_mb.checked_mul(BYTES_PER_MIB).is_none() {
            return Err(Error::InvalidParameter {
                name: "max_upload_mb".to_string(),
                reason: format!("{} MiB is too large", self.max_upload_mb),
            });
        }

        Ok(())
    }

    /// Upload limit in bytes, saturating at `usize::MAX`.
    #[must_use]
    pub const fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(BYTES_PER_MIB)
    }
}
