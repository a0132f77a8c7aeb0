//! Model resolution, downloading, and caching.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};

use crate::config::ModelConfig;
use crate::error::{Error, Result};

use super::StyleVariant;

/// Manages the model cache directory and downloads.
pub struct ModelCache {
    cache_dir: PathBuf,
}

impl ModelCache {
    /// Create a model cache rooted at `cache_dir`.
    ///
    /// Without an explicit directory, uses the platform-appropriate cache directory:
    /// - Windows: `%LOCALAPPDATA%\animegan-serve\models`
    /// - Linux: `~/.cache/animegan-serve/models`
    /// - macOS: `~/Library/Caches/animegan-serve/models`
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be created.
    pub fn new(cache_dir: Option<&Path>) -> Result<Self> {
        let cache_dir = cache_dir.map_or_else(
            || {
                let base = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
                base.join("animegan-serve").join("models")
            },
            Path::to_path_buf,
        );

        fs::create_dir_all(&cache_dir).map_err(|source| Error::CacheDir {
            path: cache_dir.clone(),
            source,
        })?;

        Ok(Self { cache_dir })
    }

    /// Directory the models are cached in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Get the path to a cached model file, downloading from `url` if necessary.
    ///
    /// Each download records its source URL next to the model. A cached file
    /// fetched from a different URL is downloaded again.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be downloaded or accessed.
    pub fn get_model_path(&self, variant: StyleVariant, url: &str) -> Result<PathBuf> {
        let path = self.cache_dir.join(variant.filename());
        let source_path = source_url_path(&path);

        if path.exists() {
            match fs::read_to_string(&source_path) {
                Ok(cached_url) if cached_url.trim() != url => {
                    tracing::warn!(
                        "Cached {} came from {}, downloading again from {url}",
                        variant.filename(),
                        cached_url.trim()
                    );
                }
                Ok(_) => {
                    tracing::debug!("Using cached model {} (from {url})", path.display());
                    return Ok(path);
                }
                Err(_) => {
                    tracing::debug!("Using cached model {} (source unknown)", path.display());
                    return Ok(path);
                }
            }
        }

        download_file(url, &path, variant.filename(), variant.approx_size())?;
        fs::write(&source_path, url)?;

        Ok(path)
    }
}

/// Sidecar file holding the URL a cached model was downloaded from.
fn source_url_path(model: &Path) -> PathBuf {
    let mut name = model.as_os_str().to_os_string();
    name.push(".url");
    PathBuf::from(name)
}

/// Find the model file for the configured variant.
///
/// Looks, in order, at the explicit `model_path`, the variant's filename in
/// the working directory, and finally the download cache, fetching from the
/// configured or default URL when the cache is empty.
///
/// # Errors
///
/// Returns [`Error::ModelNotFound`] if no file exists and there is nothing to
/// download, or the download error if fetching fails.
pub fn resolve_model_path(config: &ModelConfig) -> Result<PathBuf> {
    resolve_model_path_in(config, Path::new(""))
}

/// [`resolve_model_path`] with `work_dir` standing in for the working directory.
fn resolve_model_path_in(config: &ModelConfig, work_dir: &Path) -> Result<PathBuf> {
    if let Some(path) = &config.model_path {
        if path.exists() {
            return Ok(path.clone());
        }
        return Err(Error::ModelNotFound { path: path.clone() });
    }

    let local = work_dir.join(config.variant.filename());
    if local.exists() {
        tracing::debug!("Using model from working directory: {}", local.display());
        return Ok(local);
    }

    let Some(url) = config.model_url.as_deref().or(config.variant.default_url()) else {
        return Err(Error::ModelNotFound { path: local });
    };

    let cache = ModelCache::new(config.cache_dir.as_deref())?;
    cache.get_model_path(config.variant, url)
}

/// Download a file from a URL to a path with progress indication.
#[allow(clippy::cast_possible_truncation)]
fn download_file(url: &str, path: &Path, name: &str, approx_size: u64) -> Result<()> {
    tracing::info!("Downloading {name} from {url}");

    let download_error = |source| Error::ModelDownload {
        name: name.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::new();
    let response = client
        .get(url)
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .map_err(download_error)?;

    let total_size = response.content_length().unwrap_or(approx_size);

    let pb = ProgressBar::new(total_size);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(format!("Downloading {name}"));

    // Write to a temporary file first, then rename for atomicity
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;

    let mut downloaded = 0u64;
    let mut reader = response;

    loop {
        let mut buffer = [0u8; 8192];
        let bytes_read = std::io::Read::read(&mut reader, &mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        file.write_all(&buffer[..bytes_read])?;
        downloaded += bytes_read as u64;
        pb.set_position(downloaded);
    }
    file.flush()?;

    pb.finish_with_message(format!("Downloaded {name}"));

    // Atomic rename
    fs::rename(&temp_path, path)?;

    Ok(())
}
