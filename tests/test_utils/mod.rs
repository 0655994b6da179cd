//! Test utilities for database and HTTP testing.
//!
//! Sets up in-memory SQLite databases with migrations applied, fixture rows
//! and signed session tokens.

#![allow(dead_code)]

use std::sync::Arc;

use agency_dashboard::auth::{SessionClaims, issue_session_token};
use agency_dashboard::config::AppConfig;
use agency_dashboard::models::{agency, sub_account, user, user::Role};
use agency_dashboard::repositories::agency::AgencyDetails;
use agency_dashboard::repositories::sub_account::SubAccountDetails;
use agency_dashboard::repositories::user::CreateUserRequest;
use agency_dashboard::repositories::{AgencyRepository, SubAccountRepository, UserRepository};
use agency_dashboard::server::{AppState, create_app};
use agency_dashboard::uploads::UploadProvider;
use anyhow::Result;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_DOMAIN: &str = "example.com";
pub const UPLOAD_SECRET: &str = "upload-test-secret";

/// Sets up an in-memory SQLite database with all migrations applied.
///
/// Foreign keys stay enforced so cascading deletes behave as in Postgres.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn test_config() -> AppConfig {
    AppConfig {
        profile: "test".to_string(),
        domain: TEST_DOMAIN.to_string(),
        auth_secret: Some(TEST_SECRET.to_string()),
        auth_sign_in_url: "https://accounts.example.com/sign-in".to_string(),
        auth_sign_up_url: "https://accounts.example.com/sign-up".to_string(),
        upload_secret: Some(UPLOAD_SECRET.to_string()),
        ..AppConfig::default()
    }
}

/// Router over a fresh database with the configured upload provider.
pub async fn test_app() -> Result<(Router, DatabaseConnection)> {
    let db = setup_test_db().await?;
    let app = create_app(AppState::new(db.clone(), test_config()));
    Ok((app, db))
}

pub async fn test_app_with_provider(
    config: AppConfig,
    provider: Arc<dyn UploadProvider>,
) -> Result<(Router, DatabaseConnection)> {
    let db = setup_test_db().await?;
    let app = create_app(AppState::with_upload_provider(db.clone(), config, provider));
    Ok((app, db))
}

/// Signed session token for `user_id`, valid for an hour.
pub fn session_token(user_id: &str) -> String {
    let claims = SessionClaims {
        sub: user_id.to_string(),
        sid: Some(format!("sess_{user_id}")),
        exp: (chrono::Utc::now().timestamp() + 3600) as u64,
    };
    issue_session_token(&claims, TEST_SECRET).expect("token signs")
}

pub fn authed(builder: axum::http::request::Builder, user_id: &str) -> axum::http::request::Builder {
    builder.header("authorization", format!("Bearer {}", session_token(user_id)))
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    String::from_utf8(bytes.to_vec()).expect("body is UTF-8")
}

pub fn json_request(method: &str, uri: &str, user_id: &str, body: serde_json::Value) -> Request<Body> {
    authed(Request::builder().method(method).uri(uri), user_id)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub fn authed_request(method: &str, uri: &str, user_id: &str) -> Request<Body> {
    authed(Request::builder().method(method).uri(uri), user_id)
        .body(Body::empty())
        .expect("request builds")
}

pub async fn insert_user(db: &DatabaseConnection, id: &str, role: Role) -> Result<user::Model> {
    Ok(UserRepository::new(db)
        .create(CreateUserRequest {
            id: id.to_string(),
            name: format!("User {id}"),
            email: format!("{id}@example.com"),
            avatar_url: "https://img.example.com/avatar.png".to_string(),
            role,
        })
        .await?)
}

pub fn agency_details(id: Uuid, name: &str) -> AgencyDetails {
    AgencyDetails {
        id,
        name: name.to_string(),
        agency_logo: "https://img.example.com/logo.png".to_string(),
        company_email: "hello@acme.test".to_string(),
        company_phone: "555-0100".to_string(),
        white_label: true,
        address: "1 Main St".to_string(),
        city: "Springfield".to_string(),
        zip_code: "12345".to_string(),
        state: "IL".to_string(),
        country: "US".to_string(),
        customer_id: None,
    }
}

/// Agency owned by a freshly inserted `owner_id` user.
pub async fn insert_agency(
    db: &DatabaseConnection,
    owner_id: &str,
) -> Result<(agency::Model, user::Model)> {
    insert_user(db, owner_id, Role::SubaccountUser).await?;
    let agency = AgencyRepository::new(db)
        .upsert(agency_details(Uuid::new_v4(), "Acme Agency"))
        .await?;
    let owner = UserRepository::new(db)
        .link_to_agency(owner_id, agency.id, Role::AgencyOwner)
        .await?;
    Ok((agency, owner))
}

pub fn sub_account_details(agency_id: Uuid, name: &str) -> SubAccountDetails {
    SubAccountDetails {
        id: Uuid::new_v4(),
        agency_id,
        name: name.to_string(),
        sub_account_logo: "https://img.example.com/sub.png".to_string(),
        company_email: "client@acme.test".to_string(),
        company_phone: "555-0101".to_string(),
        address: "2 Side St".to_string(),
        city: "Springfield".to_string(),
        zip_code: "12345".to_string(),
        state: "IL".to_string(),
        country: "US".to_string(),
    }
}

pub async fn insert_sub_account(
    db: &DatabaseConnection,
    agency_id: Uuid,
    name: &str,
) -> Result<sub_account::Model> {
    Ok(SubAccountRepository::new(db)
        .upsert(sub_account_details(agency_id, name))
        .await?)
}
