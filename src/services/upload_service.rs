use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// URL prefix under which stored images are served
pub const UPLOADS_URL_PREFIX: &str = "/uploads/";

const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif"];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Only image files (jpeg, jpg, png, gif) can be uploaded")]
    InvalidType,

    #[error("Image must be {max_bytes} bytes or smaller")]
    TooLarge { max_bytes: usize },

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),
}

/// One image part pulled out of a multipart form
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Local-disk image storage
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Create the upload directory if it does not exist yet
    pub async fn ensure_dir(&self) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Check type and size; returns the normalized extension.
    ///
    /// Both the file extension and the MIME type must name an allowed image
    /// format.
    pub fn validate(&self, upload: &ImageUpload) -> Result<String, UploadError> {
        let extension = Path::new(&upload.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .filter(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
            .ok_or(UploadError::InvalidType)?;

        let mime_ok = upload
            .content_type
            .as_deref()
            .and_then(|mime| mime.strip_prefix("image/"))
            .map(|sub| ALLOWED_EXTENSIONS.contains(&sub.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if !mime_ok {
            return Err(UploadError::InvalidType);
        }

        if upload.bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge { max_bytes: self.max_bytes });
        }

        Ok(extension)
    }

    /// Validate and write the image under a fresh unique name.
    ///
    /// Returns the public relative URL (`/uploads/<name>`).
    pub async fn save(&self, upload: &ImageUpload) -> Result<String, UploadError> {
        let extension = self.validate(upload)?;
        let file_name = format!(
            "{}-{}.{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            extension
        );

        tokio::fs::write(self.dir.join(&file_name), &upload.bytes).await?;
        debug!("Stored upload {} ({} bytes)", file_name, upload.bytes.len());

        Ok(format!("{UPLOADS_URL_PREFIX}{file_name}"))
    }

    /// Map a stored URL back to its file, refusing anything outside the
    /// upload directory.
    pub fn path_for(&self, url: &str) -> Option<PathBuf> {
        let name = url.strip_prefix(UPLOADS_URL_PREFIX)?;
        let file_name = Path::new(name).file_name()?;
        if file_name != name {
            return None;
        }
        Some(self.dir.join(file_name))
    }

    /// Delete the file behind `url`. Missing files are not an error.
    pub async fn remove(&self, url: &str) -> Result<(), UploadError> {
        let Some(path) = self.path_for(url) else {
            warn!("Refusing to remove upload outside store: {}", url);
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed upload {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
