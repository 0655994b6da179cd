//! Upload provider client.
//!
//! The provider hands out presigned upload targets; the browser then uploads
//! straight to storage and the provider calls back once the file lands.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use super::{FileDescriptor, UploadError, UploadMetadata};
use crate::config::AppConfig;

/// Header carrying the provider API key.
pub const API_KEY_HEADER: &str = "x-uploadthing-api-key";

/// Request to prepare uploads for one slot
#[derive(Debug, Clone)]
pub struct PrepareUploadRequest {
    pub slug: String,
    pub files: Vec<FileDescriptor>,
    pub metadata: UploadMetadata,
    /// Where the provider should send the completion callback
    pub callback_url: Option<String>,
}

/// A presigned upload target returned by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreparedUpload {
    /// Storage key of the file
    pub key: String,
    /// Presigned URL the browser uploads to
    pub url: String,
    /// Public URL the file will be served from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

#[async_trait]
pub trait UploadProvider: Send + Sync {
    async fn prepare_upload(
        &self,
        request: PrepareUploadRequest,
    ) -> Result<Vec<PreparedUpload>, UploadError>;
}

/// [`UploadProvider`] talking to the hosted provider's REST API
#[derive(Debug, Clone)]
pub struct HttpUploadProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpUploadProvider {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.upload_api_base.clone(), config.upload_api_key.clone())
    }
}

#[async_trait]
impl UploadProvider for HttpUploadProvider {
    async fn prepare_upload(
        &self,
        request: PrepareUploadRequest,
    ) -> Result<Vec<PreparedUpload>, UploadError> {
        let api_key = self.api_key.as_deref().ok_or(UploadError::NotConfigured)?;

        let body = json!({
            "files": request.files,
            "metadata": request.metadata,
            "callbackSlug": request.slug,
            "callbackUrl": request.callback_url,
        });

        tracing::debug!(slug = %request.slug, files = request.files.len(), "preparing upload");

        let response = self
            .client
            .post(format!("{}/v6/prepareUpload", self.base_url))
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok();
            tracing::warn!(status = status.as_u16(), "upload provider rejected prepare request");
            return Err(UploadError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Vec<PreparedUpload>>().await?)
    }
}
