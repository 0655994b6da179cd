//! # Server Configuration
//!
//! Router assembly, middleware stack and server startup for the agency
//! dashboard.

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post, put},
};
use sea_orm::DatabaseConnection;
use tower::Layer;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth;
use crate::config::AppConfig;
use crate::handlers::{
    self, agency, billing, media, notifications, site, subaccounts, uploads as upload_handlers,
};
use crate::routing;
use crate::telemetry;
use crate::uploads::{FileRouter, HttpUploadProvider, UploadProvider};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub file_router: Arc<FileRouter>,
    pub upload_provider: Arc<dyn UploadProvider>,
}

impl AppState {
    /// State wired to the hosted upload provider from configuration
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let upload_provider = Arc::new(HttpUploadProvider::from_config(&config));
        Self::with_upload_provider(db, config, upload_provider)
    }

    pub fn with_upload_provider(
        db: DatabaseConnection,
        config: AppConfig,
        upload_provider: Arc<dyn UploadProvider>,
    ) -> Self {
        Self {
            db,
            config: Arc::new(config),
            file_router: Arc::new(FileRouter::new()),
            upload_provider,
        }
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Creates and configures the Axum application router
///
/// Tenant routing wraps the page router as a service so that rewritten
/// paths are matched against the route table. Health and API docs sit
/// outside tenant routing and the auth gate.
pub fn create_app(state: AppState) -> Router {
    let pages = Router::new()
        .route("/site", get(site::landing_page))
        .route("/agency", get(agency::get_auth_user_details))
        .route("/agency/sign-in", get(auth::sign_in))
        .route("/agency/sign-up", get(auth::sign_up))
        .route("/agency/details", put(agency::upsert_agency_details))
        .route("/agency/permissions", get(agency::get_user_permissions))
        .route(
            "/agency/{agency_id}",
            get(agency::get_agency).delete(agency::delete_agency),
        )
        .route("/agency/{agency_id}/dashboard", get(agency::agency_dashboard))
        .route(
            "/agency/{agency_id}/subaccounts",
            get(subaccounts::list_sub_accounts).post(subaccounts::upsert_sub_account),
        )
        .route(
            "/agency/{agency_id}/notifications",
            get(notifications::list_notifications),
        )
        .route(
            "/subaccount/{id}",
            get(subaccounts::get_sub_account).delete(subaccounts::delete_sub_account),
        )
        .route(
            "/subaccount/{id}/media",
            get(media::list_media).post(media::create_media),
        )
        .route(
            "/subaccount/{id}/media/{media_id}",
            delete(media::delete_media),
        )
        .route(
            "/api/uploadthing",
            get(upload_handlers::upload_config).post(upload_handlers::upload_action),
        )
        .route("/api/stripe/create-customer", post(billing::create_customer))
        .fallback(handlers::not_found_fallback)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.config),
            auth::auth_middleware,
        ))
        .with_state(state.clone());

    let tenant_routed =
        middleware::from_fn_with_state(state.clone(), routing::tenant_routing_middleware)
            .layer(pages);

    Router::new()
        .route("/healthz", get(site::healthz))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .fallback_service(tenant_routed)
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(telemetry::trace_context_middleware))
        .with_state(state)
}

/// Starts the server with the given configuration
pub async fn run_server(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<()> {
    let addr = config.bind_addr()?;
    if config.auth_secret.is_none() {
        tracing::warn!("no auth secret configured; every protected route will reject requests");
    }

    let profile = config.profile.clone();
    let app = create_app(AppState::new(db, config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %profile, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

struct SessionSecurity;

impl Modify for SessionSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::site::landing_page,
        crate::handlers::site::healthz,
        crate::auth::sign_in,
        crate::auth::sign_up,
        crate::handlers::agency::get_auth_user_details,
        crate::handlers::agency::upsert_agency_details,
        crate::handlers::agency::get_agency,
        crate::handlers::agency::delete_agency,
        crate::handlers::agency::agency_dashboard,
        crate::handlers::agency::get_user_permissions,
        crate::handlers::subaccounts::list_sub_accounts,
        crate::handlers::subaccounts::upsert_sub_account,
        crate::handlers::subaccounts::get_sub_account,
        crate::handlers::subaccounts::delete_sub_account,
        crate::handlers::notifications::list_notifications,
        crate::handlers::media::list_media,
        crate::handlers::media::create_media,
        crate::handlers::media::delete_media,
        crate::handlers::uploads::upload_config,
        crate::handlers::uploads::upload_action,
        crate::handlers::billing::create_customer,
    ),
    components(
        schemas(
            crate::error::ApiError,
            crate::error::ProviderError,
            crate::models::ServiceInfo,
            crate::models::user::Role,
            crate::handlers::site::HealthResponse,
            crate::handlers::types::MessageResponse,
            crate::handlers::types::UserResponse,
            crate::handlers::types::AgencyResponse,
            crate::handlers::types::SubAccountResponse,
            crate::handlers::types::AuthUserDetailsResponse,
            crate::handlers::types::UserPermissionsResponse,
            crate::handlers::types::MediaResponse,
            crate::handlers::types::NotificationResponse,
            crate::handlers::agency::AgencyDetailsRequest,
            crate::handlers::agency::AgencyDashboardResponse,
            crate::handlers::subaccounts::SubAccountDetailsRequest,
            crate::handlers::media::CreateMediaRequestDto,
            crate::handlers::billing::CreateCustomerResponse,
            crate::handlers::uploads::PrepareUploadBody,
            crate::handlers::uploads::UploadActionResponse,
            crate::dashboard::DashboardWidgets,
            crate::uploads::SlotConfig,
            crate::uploads::FileDescriptor,
            crate::uploads::PreparedUpload,
        )
    ),
    modifiers(&SessionSecurity),
    info(
        title = "Agency Dashboard API",
        description = "Agencies, sub-accounts, media and billing for the agency dashboard",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
