//! Media relay: forwards citizen uploads to the external media store
//!
//! The relay keeps no local state. A file is checked against its
//! [`MediaKind`] rules, encoded as a base64 data URI and handed to a
//! [`MediaStore`], which returns the public URL.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use thiserror::Error;
use tracing::{debug, error, info};

/// Upload flavours accepted by the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Complaint, profile and ID-document photos
    Image,
    /// Voice notes recorded in the browser
    Audio,
}

impl MediaKind {
    /// Multipart field carrying the file
    pub fn field_name(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
        }
    }

    pub fn max_bytes(&self) -> usize {
        match self {
            MediaKind::Image => 5 * 1024 * 1024,
            MediaKind::Audio => 10 * 1024 * 1024,
        }
    }

    /// Store-side resource type (audio is stored as video)
    pub fn resource_type(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Audio => "video",
        }
    }

    pub fn accepts(&self, content_type: &str) -> bool {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match self {
            MediaKind::Image => mime.starts_with("image/"),
            MediaKind::Audio => mime.starts_with("audio/") || mime == "video/webm",
        }
    }

    /// Folder under the configured prefix
    pub fn folder(&self, prefix: &str) -> String {
        match self {
            MediaKind::Image => prefix.to_string(),
            MediaKind::Audio => format!("{}/voice-notes", prefix),
        }
    }
}

/// A validated file ready to forward
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub kind: MediaKind,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl MediaUpload {
    /// Check MIME type and size against the kind's rules
    pub fn new(
        kind: MediaKind,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Result<Self, MediaError> {
        let content_type = content_type.into();

        if !kind.accepts(&content_type) {
            return Err(MediaError::UnsupportedType(content_type));
        }
        if data.is_empty() {
            return Err(MediaError::Empty);
        }
        if data.len() > kind.max_bytes() {
            return Err(MediaError::TooLarge {
                size: data.len(),
                limit: kind.max_bytes(),
            });
        }

        Ok(Self {
            kind,
            content_type,
            data,
        })
    }

    /// `data:<mime>;base64,<payload>`
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, BASE64.encode(&self.data))
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("No file uploaded")]
    Missing,

    #[error("Uploaded file is empty")]
    Empty,

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("File too large: {size} bytes (limit {limit} bytes)")]
    TooLarge { size: usize, limit: usize },

    #[error("Upload failed")]
    Upstream(String),
}

/// External store that hosts uploaded media
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store the file and return its public URL
    async fn upload(&self, upload: MediaUpload) -> Result<String, MediaError>;
}

/// Cloudinary credentials and folder prefix
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
}

/// Cloudinary signed-upload client
pub struct CloudinaryStore {
    config: CloudinaryConfig,
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct UploadResult {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct UploadFailure {
    error: UploadFailureDetail,
}

#[derive(Debug, Deserialize)]
struct UploadFailureDetail {
    message: String,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            base_url: "https://api.cloudinary.com/v1_1".to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn upload_url(&self, kind: MediaKind) -> String {
        format!(
            "{}/{}/{}/upload",
            self.base_url,
            self.config.cloud_name,
            kind.resource_type()
        )
    }
}

/// Signature over the alphabetically sorted parameters followed by the secret
fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!("{:x}", Sha1::digest(format!("{}{}", joined, api_secret)))
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    async fn upload(&self, upload: MediaUpload) -> Result<String, MediaError> {
        let folder = upload.kind.folder(&self.config.folder);
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign(
            &[("folder", folder.as_str()), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        debug!(
            "Uploading {} bytes of {} to folder {}",
            upload.data.len(),
            upload.content_type,
            folder
        );

        let form = [
            ("file", upload.data_uri()),
            ("api_key", self.config.api_key.clone()),
            ("timestamp", timestamp),
            ("folder", folder),
            ("signature", signature),
        ];

        let response = self
            .http
            .post(self.upload_url(upload.kind))
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                error!("Media store unreachable: {}", e);
                MediaError::Upstream(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let message = match response.json::<UploadFailure>().await {
                Ok(failure) => failure.error.message,
                Err(_) => format!("media store returned {}", status),
            };
            error!("Media store rejected upload: {}", message);
            return Err(MediaError::Upstream(message));
        }

        let result: UploadResult = response
            .json()
            .await
            .map_err(|e| MediaError::Upstream(e.to_string()))?;

        info!("Stored media at {}", result.secure_url);
        Ok(result.secure_url)
    }
}
