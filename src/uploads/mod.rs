//! # Upload File Router
//!
//! Named upload slots delegated to the hosted upload provider. Each slot
//! accepts a single image of at most 4MB and only for signed-in users; the
//! provider does the storage and this service authorizes and validates.

pub mod provider;
pub mod verification;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::auth::SessionPrincipal;
use crate::error::{ApiError, provider_error, unauthorized};

pub use provider::{HttpUploadProvider, PreparedUpload, UploadProvider};
pub use verification::{VerificationError, verify_callback_signature};

/// Maximum size of a single uploaded file (4MB).
pub const MAX_FILE_SIZE: u64 = 4 * 1024 * 1024;

/// Maximum number of files per upload.
pub const MAX_FILE_COUNT: usize = 1;

/// Upload slot names as used in the `slug` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum UploadSlot {
    SubaccountLogo,
    Avatar,
    AgencyLogo,
    Media,
}

impl UploadSlot {
    pub const ALL: [UploadSlot; 4] = [
        UploadSlot::SubaccountLogo,
        UploadSlot::Avatar,
        UploadSlot::AgencyLogo,
        UploadSlot::Media,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            UploadSlot::SubaccountLogo => "subaccountLogo",
            UploadSlot::Avatar => "avatar",
            UploadSlot::AgencyLogo => "agencyLogo",
            UploadSlot::Media => "media",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.slug() == slug)
    }
}

/// Limits applied to one slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotConfig {
    pub slot: UploadSlot,
    /// Accepted MIME type family, e.g. `image`
    #[schema(value_type = String)]
    pub file_type: &'static str,
    /// Maximum size per file in bytes
    pub max_file_size: u64,
    pub max_file_count: usize,
}

impl SlotConfig {
    fn image(slot: UploadSlot) -> Self {
        Self {
            slot,
            file_type: "image",
            max_file_size: MAX_FILE_SIZE,
            max_file_count: MAX_FILE_COUNT,
        }
    }
}

/// File announced by the client before uploading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FileDescriptor {
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// MIME type reported by the browser
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// Metadata attached to an authorized upload and echoed on completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadMetadata {
    pub user_id: String,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("unknown upload slot '{0}'")]
    UnknownSlot(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("no files were announced")]
    NoFiles,
    #[error("too many files: {count} announced, at most {max} allowed")]
    TooManyFiles { count: usize, max: usize },
    #[error("file '{name}' is {size} bytes, at most {max} allowed")]
    FileTooLarge { name: String, size: u64, max: u64 },
    #[error("file '{name}' has type '{mime_type}', expected {expected}/*")]
    UnsupportedType {
        name: String,
        mime_type: String,
        expected: &'static str,
    },
    #[error("upload provider is not configured")]
    NotConfigured,
    #[error("upload provider returned status {status}")]
    Provider { status: u16, body: Option<String> },
    #[error("upload provider request failed: {0}")]
    Network(#[from] reqwest::Error),
}

impl From<UploadError> for ApiError {
    fn from(error: UploadError) -> Self {
        match error {
            UploadError::UnknownSlot(slug) => ApiError::new(
                StatusCode::NOT_FOUND,
                "UNKNOWN_UPLOAD_SLOT",
                &format!("No upload slot named '{}'", slug),
            ),
            UploadError::Unauthorized => unauthorized(Some("Unauthorized")),
            err @ (UploadError::NoFiles
            | UploadError::TooManyFiles { .. }
            | UploadError::FileTooLarge { .. }
            | UploadError::UnsupportedType { .. }) => {
                ApiError::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", &err.to_string())
            }
            UploadError::NotConfigured => ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                "Uploads are not configured",
            ),
            UploadError::Provider { status, body } => {
                provider_error("uploadthing".to_string(), status, body)
            }
            UploadError::Network(err) => {
                tracing::warn!(error = %err, "upload provider unreachable");
                provider_error("uploadthing".to_string(), 0, Some(err.to_string()))
            }
        }
    }
}

/// The set of upload slots this service exposes
#[derive(Debug, Clone)]
pub struct FileRouter {
    slots: Vec<SlotConfig>,
}

impl Default for FileRouter {
    fn default() -> Self {
        Self {
            slots: UploadSlot::ALL.into_iter().map(SlotConfig::image).collect(),
        }
    }
}

impl FileRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a slot by its slug
    pub fn slot(&self, slug: &str) -> Result<&SlotConfig, UploadError> {
        let slot = UploadSlot::from_slug(slug)
            .ok_or_else(|| UploadError::UnknownSlot(slug.to_string()))?;
        self.slots
            .iter()
            .find(|config| config.slot == slot)
            .ok_or_else(|| UploadError::UnknownSlot(slug.to_string()))
    }

    pub fn slots(&self) -> &[SlotConfig] {
        &self.slots
    }

    /// Every slot requires a signed-in user; the user id becomes the upload metadata.
    pub fn authorize(
        &self,
        slot: &SlotConfig,
        principal: Option<&SessionPrincipal>,
    ) -> Result<UploadMetadata, UploadError> {
        match principal {
            Some(principal) => Ok(UploadMetadata {
                user_id: principal.user_id.clone(),
            }),
            None => {
                tracing::debug!(slot = slot.slot.slug(), "rejecting anonymous upload");
                Err(UploadError::Unauthorized)
            }
        }
    }

    /// Check announced files against the slot's count, size and type limits
    pub fn validate_files(
        &self,
        slot: &SlotConfig,
        files: &[FileDescriptor],
    ) -> Result<(), UploadError> {
        if files.is_empty() {
            return Err(UploadError::NoFiles);
        }
        if files.len() > slot.max_file_count {
            return Err(UploadError::TooManyFiles {
                count: files.len(),
                max: slot.max_file_count,
            });
        }

        let type_prefix = format!("{}/", slot.file_type);
        for file in files {
            if file.size > slot.max_file_size {
                return Err(UploadError::FileTooLarge {
                    name: file.name.clone(),
                    size: file.size,
                    max: slot.max_file_size,
                });
            }
            if !file.mime_type.starts_with(&type_prefix) {
                return Err(UploadError::UnsupportedType {
                    name: file.name.clone(),
                    mime_type: file.mime_type.clone(),
                    expected: slot.file_type,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal() -> SessionPrincipal {
        SessionPrincipal {
            user_id: "user_1".to_string(),
            session_id: None,
        }
    }

    fn png(size: u64) -> FileDescriptor {
        FileDescriptor {
            name: "logo.png".to_string(),
            size,
            mime_type: "image/png".to_string(),
        }
    }

    #[test]
    fn exposes_the_four_slots() {
        let router = FileRouter::new();
        for slug in ["subaccountLogo", "avatar", "agencyLogo", "media"] {
            let slot = router.slot(slug).unwrap();
            assert_eq!(slot.max_file_size, 4 * 1024 * 1024);
            assert_eq!(slot.max_file_count, 1);
            assert_eq!(slot.file_type, "image");
        }
        assert!(matches!(router.slot("video"), Err(UploadError::UnknownSlot(_))));
    }

    #[test]
    fn every_slot_rejects_anonymous_uploads() {
        let router = FileRouter::new();
        for slot in router.slots() {
            assert!(matches!(
                router.authorize(slot, None),
                Err(UploadError::Unauthorized)
            ));
        }
    }

    #[test]
    fn authorized_upload_carries_user_id() {
        let router = FileRouter::new();
        let slot = router.slot("avatar").unwrap();
        let metadata = router.authorize(slot, Some(&principal())).unwrap();
        assert_eq!(metadata.user_id, "user_1");
    }

    #[test]
    fn file_limits_are_enforced() {
        let router = FileRouter::new();
        let slot = router.slot("media").unwrap();

        assert!(router.validate_files(slot, &[png(MAX_FILE_SIZE)]).is_ok());
        assert!(matches!(
            router.validate_files(slot, &[png(MAX_FILE_SIZE + 1)]),
            Err(UploadError::FileTooLarge { .. })
        ));
        assert!(matches!(
            router.validate_files(slot, &[png(10), png(10)]),
            Err(UploadError::TooManyFiles { count: 2, max: 1 })
        ));
        assert!(matches!(
            router.validate_files(slot, &[]),
            Err(UploadError::NoFiles)
        ));

        let pdf = FileDescriptor {
            name: "doc.pdf".to_string(),
            size: 10,
            mime_type: "application/pdf".to_string(),
        };
        assert!(matches!(
            router.validate_files(slot, &[pdf]),
            Err(UploadError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let error: ApiError = UploadError::Unauthorized.into();
        assert_eq!(error.status, StatusCode::UNAUTHORIZED);
    }
}
