//! # Authentication
//!
//! Session verification for dashboard requests. The hosted auth provider
//! issues HS256 session tokens that arrive either as a bearer token or in the
//! `__session` cookie; verified tokens become a [`SessionPrincipal`] in the
//! request extensions.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;
use crate::error::{ApiError, unauthorized};
use crate::routing::{AGENCY_SIGN_IN_PATH, TenantRoute, is_public_path};
use crate::server::AppState;

/// Cookie the auth provider stores the session token in.
pub const SESSION_COOKIE: &str = "__session";

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// User id
    pub sub: String,
    /// Session id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    /// Expiry as seconds since the epoch
    pub exp: u64,
}

/// The authenticated user behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPrincipal {
    pub user_id: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no session token presented")]
    Missing,
    #[error("session verification is not configured")]
    NotConfigured,
    #[error("session token expired")]
    Expired,
    #[error("invalid session token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

impl From<SessionError> for ApiError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::Missing => unauthorized(None),
            SessionError::Expired => unauthorized(Some("Session expired")),
            SessionError::NotConfigured | SessionError::Invalid(_) => {
                unauthorized(Some("Invalid session token"))
            }
        }
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        Arc::clone(&app_state.config)
    }
}

/// Verify an HS256 session token and return its principal.
pub fn verify_session_token(token: &str, secret: &str) -> Result<SessionPrincipal, SessionError> {
    if secret.is_empty() {
        return Err(SessionError::NotConfigured);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 5;

    let data = jsonwebtoken::decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|err| match err.kind() {
        ErrorKind::ExpiredSignature => SessionError::Expired,
        _ => SessionError::Invalid(err),
    })?;

    Ok(SessionPrincipal {
        user_id: data.claims.sub,
        session_id: data.claims.sid,
    })
}

/// Sign a session token. Used by local tooling and tests.
pub fn issue_session_token(
    claims: &SessionClaims,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Find the session token: `Authorization: Bearer` first, then the session cookie.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

fn authenticate(config: &AppConfig, headers: &HeaderMap) -> Result<SessionPrincipal, SessionError> {
    let token = extract_session_token(headers).ok_or(SessionError::Missing)?;
    let secret = config
        .auth_secret
        .as_deref()
        .ok_or(SessionError::NotConfigured)?;
    verify_session_token(&token, secret)
}

/// Authentication gate.
///
/// Public pages pass through, with a principal attached when a valid session
/// happens to be present. Everything else needs a session: API calls get a
/// 401, page requests are redirected to the sign-in page.
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request,
    next: Next,
) -> Response {
    let served_path = request.uri().path().to_string();
    let (original_path, via_subdomain) = match request.extensions().get::<TenantRoute>() {
        Some(route) => (route.original_path.clone(), route.subdomain.is_some()),
        None => (served_path.clone(), false),
    };

    let public = is_public_path(&original_path) || (!via_subdomain && is_public_path(&served_path));

    match authenticate(&config, request.headers()) {
        Ok(principal) => {
            tracing::debug!(user_id = %principal.user_id, "authenticated request");
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(_) if public => next.run(request).await,
        Err(err) => {
            tracing::info!(path = %original_path, reason = %err, "rejecting unauthenticated request");
            if original_path.starts_with("/api") {
                ApiError::from(err).into_response()
            } else {
                Redirect::temporary(AGENCY_SIGN_IN_PATH).into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for SessionPrincipal
where
    S: Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionPrincipal>()
            .cloned()
            .ok_or_else(|| unauthorized(Some("Session required")))
    }
}

/// Optional variant of [`SessionPrincipal`] for routes that serve anonymous users.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<SessionPrincipal>);

impl<S> FromRequestParts<S> for MaybeSession
where
    S: Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(parts.extensions.get::<SessionPrincipal>().cloned()))
    }
}

fn hosted_page_redirect(config: &AppConfig, page_url: &str) -> Response {
    let return_to = format!("{}/agency", config.public_base_url());

    match url::Url::parse(page_url) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("redirect_url", &return_to);
            Redirect::to(url.as_str()).into_response()
        }
        Err(err) => {
            tracing::error!(url = %page_url, error = %err, "hosted auth page URL is invalid");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Sign-in page backed by the hosted auth provider
#[utoipa::path(
    get,
    path = "/agency/sign-in",
    responses((status = 303, description = "Redirect to the hosted sign-in page")),
    tag = "auth"
)]
pub async fn sign_in(State(config): State<Arc<AppConfig>>) -> Response {
    hosted_page_redirect(&config, &config.auth_sign_in_url)
}

/// Sign-up page backed by the hosted auth provider
#[utoipa::path(
    get,
    path = "/agency/sign-up",
    responses((status = 303, description = "Redirect to the hosted sign-up page")),
    tag = "auth"
)]
pub async fn sign_up(State(config): State<Arc<AppConfig>>) -> Response {
    hosted_page_redirect(&config, &config.auth_sign_up_url)
}
