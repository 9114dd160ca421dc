// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Object storage for profile images (Firebase Storage REST API).

use crate::error::AppError;
use crate::services::AuthProvider;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

const DEFAULT_STORAGE_URL: &str = "https://firebasestorage.googleapis.com/v0";

/// Remote binary object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload `data`, overwriting any object at `path`.
    async fn upload(&self, path: &str, data: Vec<u8>, content_type: &str) -> Result<(), AppError>;

    /// Durable download URL of the object at `path`.
    async fn download_url(&self, path: &str) -> Result<String, AppError>;

    /// Delete the object; `AppError::NotFound` if there is none.
    async fn delete(&self, path: &str) -> Result<(), AppError>;
}

/// Firebase Storage client authenticated with the signed-in user's ID token.
#[derive(Clone)]
pub struct FirebaseStorage {
    http: reqwest::Client,
    base_url: String,
    bucket: String,
    auth: Arc<dyn AuthProvider>,
}

impl FirebaseStorage {
    pub fn new(bucket: &str, auth: Arc<dyn AuthProvider>) -> Self {
        Self::with_base_url(DEFAULT_STORAGE_URL, bucket, auth)
    }

    /// Create a client against a non-default endpoint (emulator or tests).
    pub fn with_base_url(base_url: &str, bucket: &str, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            auth,
        }
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/b/{}/o/{}",
            self.base_url,
            self.bucket,
            urlencoding::encode(path)
        )
    }

    async fn auth_header(&self) -> Result<String, AppError> {
        Ok(format!("Firebase {}", self.auth.id_token().await?))
    }

    /// Map a non-success status to an error.
    async fn check_response(
        &self,
        response: reqwest::Response,
        path: &str,
    ) -> Result<reqwest::Response, AppError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 404 {
            return Err(AppError::NotFound(path.to_string()));
        }

        Err(AppError::Storage(format!("HTTP {}: {}", status, body)))
    }
}

#[async_trait]
impl ObjectStore for FirebaseStorage {
    async fn upload(&self, path: &str, data: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        let url = format!("{}/b/{}/o", self.base_url, self.bucket);
        let size = data.len();

        let response = self
            .http
            .post(&url)
            .query(&[("name", path)])
            .header(reqwest::header::AUTHORIZATION, self.auth_header().await?)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        self.check_response(response, path).await?;
        tracing::info!(path, size, "Uploaded object");
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<String, AppError> {
        let response = self
            .http
            .get(self.object_url(path))
            .header(reqwest::header::AUTHORIZATION, self.auth_header().await?)
            .send()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        let metadata: ObjectMetadata = self
            .check_response(response, path)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Storage(format!("JSON parse error: {}", e)))?;

        let token = metadata
            .download_tokens
            .as_deref()
            .and_then(|tokens| tokens.split(',').next())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Storage(format!("No download token for {}", path)))?;

        Ok(format!(
            "{}?alt=media&token={}",
            self.object_url(path),
            token
        ))
    }

    async fn delete(&self, path: &str) -> Result<(), AppError> {
        let response = self
            .http
            .delete(self.object_url(path))
            .header(reqwest::header::AUTHORIZATION, self.auth_header().await?)
            .send()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        self.check_response(response, path).await?;
        tracing::info!(path, "Deleted object");
        Ok(())
    }
}

/// Subset of the object metadata resource.
#[derive(Debug, Deserialize)]
struct ObjectMetadata {
    #[serde(rename = "downloadTokens")]
    download_tokens: Option<String>,
}
