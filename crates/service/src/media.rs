//! Hosted image storage (Cloudinary-compatible upload/destroy API).

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use configs::MediaConfig;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;

pub const MAX_IMAGE_BYTES: usize = 1_048_576;
const ALLOWED_EXTENSIONS: [&str; 6] = ["jpeg", "jpg", "gif", "png", "svg", "webp"];

pub const FOLDER_AVATAR: &str = "avatar";
pub const FOLDER_HOUSE: &str = "house";
pub const FOLDER_TRANSACTION: &str = "transaction";

/// An uploaded image as received from a multipart form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Check the extension (case-insensitive) and the 1 MiB size cap.
    pub fn validate(&self) -> Result<(), ServiceError> {
        let ext = Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext {
            Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
            _ => return Err(ServiceError::Validation("invalid file type".into())),
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(ServiceError::Validation("invalid file size".into()));
        }
        Ok(())
    }
}

/// Public id of a hosted asset: the last two path segments without the extension.
///
/// `https://res.cloudinary.com/demo/image/upload/v1/house/abc.png` -> `house/abc`
pub fn extract_public_id(url: &str) -> Option<String> {
    let mut segments = url.trim_end_matches('/').rsplit('/');
    let file = segments.next().filter(|s| !s.is_empty())?;
    let folder = segments.next().filter(|s| !s.is_empty())?;
    let stem = match file.rfind('.') {
        Some(idx) if idx > 0 => &file[..idx],
        _ => file,
    };
    Some(format!("{folder}/{stem}"))
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `image` under `folder`, returning its stable URL.
    async fn upload(&self, folder: &str, image: ImageUpload) -> Result<String, ServiceError>;
    async fn destroy(&self, url: &str) -> Result<(), ServiceError>;

    /// Upload the new image first, then drop the old one.
    async fn replace(&self, folder: &str, old_url: &str, image: ImageUpload) -> Result<String, ServiceError> {
        let new_url = self.upload(folder, image).await?;
        if !old_url.is_empty() {
            self.destroy(old_url).await?;
        }
        Ok(new_url)
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

/// Signed REST client for a Cloudinary account.
pub struct CloudinaryMediaStore {
    client: reqwest::Client,
    cfg: MediaConfig,
}

impl CloudinaryMediaStore {
    pub fn new(cfg: MediaConfig) -> Self {
        Self { client: reqwest::Client::new(), cfg }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{}",
            self.cfg.upload_base_url.trim_end_matches('/'),
            self.cfg.cloud_name,
            action
        )
    }

    fn timestamp() -> String {
        chrono::Utc::now().timestamp().to_string()
    }
}

/// SHA-256 request signature over `params` (sorted by key) plus the secret.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn media_err(e: reqwest::Error) -> ServiceError {
    ServiceError::Media(e.to_string())
}

#[async_trait]
impl MediaStore for CloudinaryMediaStore {
    #[instrument(skip(self, image), fields(folder = %folder, filename = %image.filename))]
    async fn upload(&self, folder: &str, image: ImageUpload) -> Result<String, ServiceError> {
        let timestamp = Self::timestamp();
        let signature = sign_params(&[("folder", folder), ("timestamp", timestamp.as_str())], &self.cfg.api_secret);
        let form = Form::new()
            .part("file", Part::bytes(image.bytes).file_name(image.filename))
            .text("api_key", self.cfg.api_key.clone())
            .text("folder", folder.to_string())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        let resp = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(media_err)?
            .error_for_status()
            .map_err(media_err)?
            .json::<UploadResponse>()
            .await
            .map_err(media_err)?;
        info!(url = %resp.secure_url, "media_uploaded");
        Ok(resp.secure_url)
    }

    #[instrument(skip(self))]
    async fn destroy(&self, url: &str) -> Result<(), ServiceError> {
        let public_id = extract_public_id(url)
            .ok_or_else(|| ServiceError::Media(format!("cannot derive public id from {url}")))?;
        let timestamp = Self::timestamp();
        let signature = sign_params(&[("public_id", public_id.as_str()), ("timestamp", timestamp.as_str())], &self.cfg.api_secret);
        let form = [
            ("public_id", public_id.as_str()),
            ("timestamp", timestamp.as_str()),
            ("api_key", self.cfg.api_key.as_str()),
            ("signature", signature.as_str()),
            ("signature_algorithm", "sha256"),
        ];
        let resp = self
            .client
            .post(self.endpoint("destroy"))
            .form(&form)
            .send()
            .await
            .map_err(media_err)?
            .error_for_status()
            .map_err(media_err)?
            .json::<DestroyResponse>()
            .await
            .map_err(media_err)?;
        if resp.result != "ok" {
            warn!(public_id = %public_id, result = %resp.result, "media_destroy_not_ok");
        }
        Ok(())
    }
}

/// Keeps uploads in memory; used in tests and when no media host is configured.
#[derive(Default)]
pub struct InMemoryMediaStore {
    uploaded: Mutex<Vec<String>>,
    destroyed: Mutex<Vec<String>>,
}

impl InMemoryMediaStore {
    pub fn uploaded(&self) -> Vec<String> {
        self.uploaded.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn upload(&self, folder: &str, image: ImageUpload) -> Result<String, ServiceError> {
        let ext = Path::new(&image.filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let url = format!("memory://media/v1/{folder}/{}.{ext}", uuid::Uuid::new_v4().simple());
        self.uploaded
            .lock()
            .map_err(|e| ServiceError::Media(e.to_string()))?
            .push(url.clone());
        Ok(url)
    }

    async fn destroy(&self, url: &str) -> Result<(), ServiceError> {
        self.destroyed
            .lock()
            .map_err(|e| ServiceError::Media(e.to_string()))?
            .push(url.to_string());
        Ok(())
    }
}
