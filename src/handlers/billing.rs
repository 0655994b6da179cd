//! # Billing API Handlers
//!
//! Stand-in for the payment provider's customer creation. The request body
//! is logged and a test customer id is returned; nothing is sent upstream.

use axum::{body::Bytes, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::SessionPrincipal;
use crate::error::ApiError;

/// Prefix of every customer id issued by the stub.
pub const CUSTOMER_ID_PREFIX: &str = "str-test-";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerResponse {
    #[schema(example = "str-test-0b8f7a3c-5a43-4c59-9f5e-2a1c6d0d8e11")]
    pub customer_id: String,
}

/// Create a billing customer (test stub)
#[utoipa::path(
    post,
    path = "/api/stripe/create-customer",
    security(("session" = [])),
    request_body(content = serde_json::Value, description = "Customer details; any body is accepted"),
    responses(
        (status = 200, description = "Test customer created", body = CreateCustomerResponse),
        (status = 401, description = "No session", body = ApiError)
    ),
    tag = "billing"
)]
pub async fn create_customer(principal: SessionPrincipal, body: Bytes) -> Json<CreateCustomerResponse> {
    match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(payload) => {
            tracing::info!(user_id = %principal.user_id, %payload, "create-customer payload");
        }
        Err(_) => {
            let text = String::from_utf8_lossy(&body);
            tracing::info!(user_id = %principal.user_id, payload = %text, "create-customer non-JSON payload");
        }
    }

    Json(CreateCustomerResponse {
        customer_id: format!("{CUSTOMER_ID_PREFIX}{}", Uuid::new_v4()),
    })
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

    #[tokio::test]
    async fn issues_test_customer_ids_for_any_body() {
        for body in [
            Bytes::from_static(br#"{"email":"a@b.co","name":"Acme"}"#),
            Bytes::from_static(b"not json at all"),
            Bytes::new(),
        ] {
            let Json(response) = create_customer(principal(), body).await;
            let suffix = response
                .customer_id
                .strip_prefix(CUSTOMER_ID_PREFIX)
                .expect("prefixed id");
            assert!(Uuid::parse_str(suffix).is_ok());
        }
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let Json(first) = create_customer(principal(), Bytes::new()).await;
        let Json(second) = create_customer(principal(), Bytes::new()).await;
        assert_ne!(first.customer_id, second.customer_id);
    }
}
