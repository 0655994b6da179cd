//! Signature verification for upload-complete callbacks.
//!
//! The provider signs the raw callback body with HMAC-SHA256 using the
//! upload secret and sends `x-uploadthing-signature: hmac-sha256=<hex>`.

use axum::http::StatusCode;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::ApiError;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-uploadthing-signature";
const SIGNATURE_PREFIX: &str = "hmac-sha256=";

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("Missing required signature header: {header}")]
    MissingSignature { header: String },

    #[error("Invalid signature format: {header}")]
    InvalidSignatureFormat { header: String },

    #[error("Signature verification failed")]
    VerificationFailed,

    #[error("Callback verification is not configured")]
    NotConfigured,
}

impl VerificationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            VerificationError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<VerificationError> for ApiError {
    fn from(error: VerificationError) -> Self {
        let status = error.status_code();
        let code = if status == StatusCode::UNAUTHORIZED {
            "INVALID_SIGNATURE"
        } else {
            "SERVICE_UNAVAILABLE"
        };
        ApiError::new(status, code, &error.to_string())
    }
}

/// Verify an upload callback body against its signature header
pub fn verify_callback_signature(
    body: &[u8],
    signature_header: Option<&str>,
    secret: Option<&str>,
) -> Result<(), VerificationError> {
    let secret = secret
        .filter(|s| !s.is_empty())
        .ok_or(VerificationError::NotConfigured)?;

    let signature_header = signature_header
        .filter(|s| !s.is_empty())
        .ok_or_else(|| VerificationError::MissingSignature {
            header: SIGNATURE_HEADER.to_string(),
        })?;

    let provided_hex = signature_header
        .strip_prefix(SIGNATURE_PREFIX)
        .ok_or_else(|| VerificationError::InvalidSignatureFormat {
            header: format!("{SIGNATURE_HEADER} must start with '{SIGNATURE_PREFIX}'"),
        })?;

    let provided_bytes =
        hex::decode(provided_hex).map_err(|_| VerificationError::InvalidSignatureFormat {
            header: format!("{SIGNATURE_HEADER} contains invalid hex"),
        })?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| VerificationError::VerificationFailed)?;
    mac.update(body);
    let expected_bytes = mac.finalize().into_bytes();

    let expected: &[u8] = expected_bytes.as_ref();
    if subtle::ConstantTimeEq::ct_eq(expected, &provided_bytes[..]).into() {
        Ok(())
    } else {
        Err(VerificationError::VerificationFailed)
    }
}

/// Compute the signature header value for `body`
pub fn sign_callback(body: &[u8], secret: &str) -> Result<String, VerificationError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| VerificationError::VerificationFailed)?;
    mac.update(body);
    Ok(format!(
        "{SIGNATURE_PREFIX}{}",
        hex::encode(mac.finalize().into_bytes())
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "sk_live_callback";
    const BODY: &[u8] = br#"{"status":"uploaded","file":{"name":"a.png"}}"#;

    #[test]
    fn valid_signature_passes() {
        let header = sign_callback(BODY, SECRET).unwrap();
        assert!(verify_callback_signature(BODY, Some(&header), Some(SECRET)).is_ok());
    }

    #[test]
    fn tampered_body_fails() {
        let header = sign_callback(BODY, SECRET).unwrap();
        assert!(matches!(
            verify_callback_signature(b"{}", Some(&header), Some(SECRET)),
            Err(VerificationError::VerificationFailed)
        ));
    }

    #[test]
    fn missing_or_malformed_header() {
        assert!(matches!(
            verify_callback_signature(BODY, None, Some(SECRET)),
            Err(VerificationError::MissingSignature { .. })
        ));
        assert!(matches!(
            verify_callback_signature(BODY, Some("sha256=abcd"), Some(SECRET)),
            Err(VerificationError::InvalidSignatureFormat { .. })
        ));
        assert!(matches!(
            verify_callback_signature(BODY, Some("hmac-sha256=zz"), Some(SECRET)),
            Err(VerificationError::InvalidSignatureFormat { .. })
        ));
    }

    #[test]
    fn unconfigured_secret_is_reported() {
        let err = verify_callback_signature(BODY, Some("hmac-sha256=00"), None).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
