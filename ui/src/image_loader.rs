//! Thumbnail and preview loading for the admin UI.
//!
//! Downloads are bounded by a semaphore and thumbnails are cached on disk
//! keyed by year and filename, so re-entering a scroll window is free.

use iced::widget::image::Handle;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::fs;
use tokio::sync::Semaphore;

#[derive(Debug, Error)]
pub enum ImageLoaderError {
    #[error("network error: {0}")]
    Request(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("semaphore closed")]
    SemaphoreClosed,
}

#[derive(Debug, Clone)]
pub struct ImageLoader {
    cache_dir: PathBuf,
    client: reqwest::Client,
    semaphore: Arc<Semaphore>,
}

impl ImageLoader {
    pub fn new(cache_dir: PathBuf, concurrency: usize) -> Self {
        Self {
            cache_dir,
            client: reqwest::Client::new(),
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Fetch a photo's thumbnail, hitting the disk cache first.
    pub async fn load_thumbnail(
        &self,
        year: &str,
        filename: &str,
        url: &str,
    ) -> Result<Handle, ImageLoaderError> {
        let start = Instant::now();
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ImageLoaderError::SemaphoreClosed)?;

        let cache_path = self.cache_dir.join("thumbnails").join(year).join(filename);
        if cache_path.exists() {
            return Ok(Handle::from_path(&cache_path));
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ImageLoaderError::Request(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ImageLoaderError::Request(format!(
                "status {} for {}",
                response.status(),
                filename
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageLoaderError::Request(e.to_string()))?;

        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ImageLoaderError::Io(e.to_string()))?;
        }
        fs::write(&cache_path, &bytes)
            .await
            .map_err(|e| ImageLoaderError::Io(e.to_string()))?;

        tracing::info!("thumbnail_time_ms" = %start.elapsed().as_millis(), "file" = filename);
        Ok(Handle::from_path(&cache_path))
    }

    /// Fetch a remote-storage preview through the proxy. Previews are not
    /// cached on disk; the handle keeps the bytes in memory.
    pub async fn load_preview(&self, url: &str) -> Result<Handle, ImageLoaderError> {
        let start = Instant::now();
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ImageLoaderError::SemaphoreClosed)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ImageLoaderError::Request(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ImageLoaderError::Request(format!(
                "status {}",
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageLoaderError::Request(e.to_string()))?;

        tracing::info!("preview_time_ms" = %start.elapsed().as_millis());
        Ok(Handle::from_memory(bytes.to_vec()))
    }
}
