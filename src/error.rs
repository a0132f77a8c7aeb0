//! Custom error types for animegan-serve.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the animegan-serve library.
#[derive(Error, Debug)]
pub enum Error {
    /// The uploaded bytes could not be decoded as a JPEG or PNG image.
    #[error("failed to decode image: {reason}")]
    Decode { reason: String },

    /// The uploaded file does not carry a supported image extension.
    #[error("unsupported file type {filename:?}: expected .jpg, .jpeg or .png")]
    UnsupportedFormat { filename: String },

    /// Failed to encode an image for presentation.
    #[error("failed to encode image as PNG: {source}")]
    Encode {
        #[source]
        source: image::ImageError,
    },

    /// The requested output scale is not offered by the active model.
    #[error("unsupported scale {label:?}")]
    UnsupportedScale { label: String },

    /// Failed to download a model.
    #[error("failed to download model {name}: {source}")]
    ModelDownload {
        name: String,
        #[source]
        source: reqwest::Error,
    },

    /// No model file could be found and none could be fetched.
    #[error(
        "model file not found: {} (set --model-path or --model-url)",
        path.display()
    )]
    ModelNotFound { path: PathBuf },

    /// Failed to load an ONNX model.
    #[error("failed to load ONNX model {name}: {source}")]
    ModelLoad {
        name: String,
        #[source]
        source: ort::Error,
    },

    /// Model inference failed.
    #[error("model inference failed: {source}")]
    Inference {
        #[source]
        source: ort::Error,
    },

    /// Failed to create cache directory.
    #[error("failed to create cache directory {path}: {source}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Shape mismatch in tensor operations.
    #[error("tensor shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },
}

impl Error {
    /// Whether the error was caused by the request rather than the server.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Decode { .. } | Self::UnsupportedFormat { .. } | Self::UnsupportedScale { .. }
        )
    }
}

/// Result type alias for animegan-serve operations.
pub type Result<T> = std::result::Result<T, Error>;
