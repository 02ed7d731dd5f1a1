//! Multipart form reader for the listing, avatar and payment-proof endpoints.

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::Multipart;
use service::media::ImageUpload;

use crate::errors::ApiError;

/// Text fields and file parts of one multipart request.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, ImageUpload>,
}

impl FormData {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = FormData::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let bytes = field.bytes().await.map_err(|e| ApiError::bad_request(e.to_string()))?;
                    form.files.insert(name, ImageUpload { filename, bytes: bytes.to_vec() });
                }
                None => {
                    let text = field.text().await.map_err(|e| ApiError::bad_request(e.to_string()))?;
                    form.fields.insert(name, text);
                }
            }
        }
        Ok(form)
    }

    pub fn text(&self, key: &str) -> Result<String, ApiError> {
        self.fields
            .get(key)
            .filter(|v| !v.trim().is_empty())
            .cloned()
            .ok_or_else(|| ApiError::bad_request(format!("{key} required")))
    }

    pub fn optional_text(&self, key: &str) -> String {
        self.fields.get(key).cloned().unwrap_or_default()
    }

    pub fn number<T: FromStr>(&self, key: &str) -> Result<T, ApiError> {
        self.text(key)?
            .trim()
            .parse::<T>()
            .map_err(|_| ApiError::bad_request(format!("{key} must be a number")))
    }

    pub fn file(&mut self, key: &str) -> Option<ImageUpload> {
        self.files.remove(key)
    }

    pub fn required_file(&mut self, key: &str) -> Result<ImageUpload, ApiError> {
        self.file(key).ok_or_else(|| ApiError::bad_request(format!("{key} required")))
    }
}
