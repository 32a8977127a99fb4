//! API client module for the photo gallery admin server.

use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// A single photo record as stored in the server's catalog.
///
/// `filename` is globally unique across the whole library and doubles as
/// the photo's identifier in every endpoint. `Subject` keeps its
/// capitalized JSON key for compatibility with the catalog file format.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Photo {
    pub filename: String,
    pub year: String,
    pub date: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(rename = "Subject", default)]
    pub subject: Vec<String>,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub thumbnail: String,
}

/// One year's worth of photos, as returned by `GET /api/photos`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct YearAlbum {
    pub year: String,
    pub photos: Vec<Photo>,
}

/// Partial metadata update for `PUT /api/photos/{filename}`.
///
/// Absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PhotoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_hidden: Option<bool>,
    #[serde(rename = "Subject", skip_serializing_if = "Option::is_none")]
    pub subject: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct BatchUpdateRequest<'a> {
    filenames: &'a [String],
    updates: PhotoUpdate,
}

/// Lifecycle of a server-side rebuild job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RebuildState {
    Idle,
    Running,
    Completed,
    Failed,
}

/// Snapshot from `GET /api/rebuild/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct RebuildStatus {
    pub status: RebuildState,
    #[serde(default)]
    pub progress: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub logs: Vec<String>,
}

/// Response from `POST /api/photos/upload`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
    pub year: String,
}

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("request error: {0}")]
    Request(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("io error: {0}")]
    Io(String),
}

/// Thin typed wrapper over the admin server's HTTP JSON API.
///
/// The server owns all real state; every method here is a single
/// fire-and-await round trip with no retries.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        ApiClient {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the full catalog, grouped by year album.
    pub async fn list_albums(&self) -> Result<Vec<YearAlbum>, ApiClientError> {
        let url = format!("{}/api/photos", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiClientError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiClientError::Server(error_text));
        }

        response
            .json::<Vec<YearAlbum>>()
            .await
            .map_err(|e| ApiClientError::Request(e.to_string()))
    }

    /// Update a single photo's metadata.
    pub async fn update_photo(
        &self,
        filename: &str,
        update: &PhotoUpdate,
    ) -> Result<(), ApiClientError> {
        let url = format!("{}/api/photos/{}", self.base_url, filename);

        let response = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(update)
            .send()
            .await
            .map_err(|e| ApiClientError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiClientError::Server(error_text));
        }

        Ok(())
    }

    /// Delete a photo from the catalog, local storage and remote storage.
    pub async fn delete_photo(&self, filename: &str) -> Result<(), ApiClientError> {
        let url = format!("{}/api/photos/{}", self.base_url, filename);

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| ApiClientError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiClientError::Server(error_text));
        }

        Ok(())
    }

    /// Hide or show a set of photos in one request.
    pub async fn batch_set_hidden(
        &self,
        filenames: &[String],
        hidden: bool,
    ) -> Result<(), ApiClientError> {
        let url = format!("{}/api/photos/batch", self.base_url);
        let body = BatchUpdateRequest {
            filenames,
            updates: PhotoUpdate {
                is_hidden: Some(hidden),
                ..PhotoUpdate::default()
            },
        };

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiClientError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiClientError::Server(error_text));
        }

        Ok(())
    }

    /// Upload a photo file as multipart form data (field `photo`).
    ///
    /// The server derives the target year from EXIF data or the filename.
    pub async fn upload_photo(&self, path: &Path) -> Result<UploadResponse, ApiClientError> {
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .ok_or_else(|| ApiClientError::Io("invalid file name".into()))?
            .to_string();

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiClientError::Io(e.to_string()))?;

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("photo", part);

        let url = format!("{}/api/photos/upload", self.base_url);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiClientError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiClientError::Server(error_text));
        }

        response
            .json::<UploadResponse>()
            .await
            .map_err(|e| ApiClientError::Request(e.to_string()))
    }

    /// Kick off a catalog rebuild. The server answers 409 while a rebuild
    /// is already running, which surfaces as a normal server error.
    pub async fn start_rebuild(&self) -> Result<(), ApiClientError> {
        let url = format!("{}/api/rebuild", self.base_url);

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| ApiClientError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiClientError::Server(error_text));
        }

        Ok(())
    }

    /// Poll the current rebuild job status.
    pub async fn rebuild_status(&self) -> Result<RebuildStatus, ApiClientError> {
        let url = format!("{}/api/rebuild/status", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiClientError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiClientError::Server(error_text));
        }

        response
            .json::<RebuildStatus>()
            .await
            .map_err(|e| ApiClientError::Request(e.to_string()))
    }

    /// URL of the locally served thumbnail for a photo.
    pub fn image_url(&self, year: &str, filename: &str) -> String {
        format!("{}/api/images/{}/{}", self.base_url, year, filename)
    }

    /// URL routing a remote-storage object through the server-side proxy.
    pub fn proxy_url(&self, target: &str) -> Result<String, ApiClientError> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/api/proxy", self.base_url),
            &[("url", target)],
        )
        .map_err(|e| ApiClientError::Request(e.to_string()))?;
        Ok(url.into())
    }
}
