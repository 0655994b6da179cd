//! Agency, sub-account, media and notification endpoints.

#[path = "test_utils/mod.rs"]
mod test_utils;

use agency_dashboard::models::user::Role;
use agency_dashboard::repositories::SubAccountRepository;
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use test_utils::{
    authed_request, body_json, insert_agency, insert_sub_account, insert_user, json_request,
    test_app,
};

fn agency_form(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "companyEmail": "hello@acme.test",
        "companyPhone": "555-0100",
        "whiteLabel": true,
        "address": "1 Main St",
        "city": "Springfield",
        "zipCode": "12345",
        "state": "IL",
        "country": "US",
        "agencyLogo": "https://img.example.com/logo.png",
        "customerId": "str-test-123"
    })
}

fn sub_account_form(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "companyEmail": "client@acme.test",
        "companyPhone": "555-0101",
        "address": "2 Side St",
        "city": "Springfield",
        "zipCode": "12345",
        "state": "IL",
        "country": "US",
        "subAccountLogo": "https://img.example.com/sub.png"
    })
}

#[tokio::test]
async fn first_agency_save_makes_user_the_owner() {
    let (app, db) = test_app().await.unwrap();
    insert_user(&db, "owner", Role::SubaccountUser).await.unwrap();

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/agency/details", "owner", agency_form("Acme Agency")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let agency = body_json(response).await;
    assert_eq!(agency["name"], "Acme Agency");
    assert_eq!(agency["customerId"], "str-test-123");
    assert_eq!(agency["goal"], 5);

    let response = app
        .oneshot(authed_request("GET", "/agency", "owner"))
        .await
        .unwrap();
    let details = body_json(response).await;
    assert_eq!(details["role"], "AGENCY_OWNER");
    assert_eq!(details["agency"]["id"], agency["id"]);
    assert_eq!(details["agency"]["subAccounts"], json!([]));
}

#[tokio::test]
async fn agency_form_reports_field_errors() {
    let (app, db) = test_app().await.unwrap();
    insert_user(&db, "owner", Role::SubaccountUser).await.unwrap();

    let mut form = agency_form("A");
    form["city"] = json!("");

    let response = app
        .oneshot(json_request("PUT", "/agency/details", "owner", form))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_FAILED");
    let details = body["details"].as_object().unwrap();
    assert_eq!(details.len(), 2);
    assert!(details.contains_key("name"));
    assert!(details.contains_key("city"));
}

#[tokio::test]
async fn saving_someone_elses_agency_is_forbidden() {
    let (app, db) = test_app().await.unwrap();
    let (agency, _) = insert_agency(&db, "owner").await.unwrap();
    insert_user(&db, "intruder", Role::SubaccountUser).await.unwrap();

    let mut form = agency_form("Hijacked");
    form["id"] = json!(agency.id);

    let response = app
        .oneshot(json_request("PUT", "/agency/details", "intruder", form))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn agency_pages_require_membership() {
    let (app, db) = test_app().await.unwrap();
    let (agency, _) = insert_agency(&db, "owner").await.unwrap();
    insert_user(&db, "outsider", Role::SubaccountUser).await.unwrap();

    let response = app
        .clone()
        .oneshot(authed_request("GET", &format!("/agency/{}", agency.id), "outsider"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(authed_request(
            "GET",
            &format!("/agency/{}/dashboard", agency.id),
            "owner",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["agencyName"], "Acme Agency");
    assert_eq!(body["subAccountCount"], 0);
    assert_eq!(body["widgets"]["sales"]["total"], "$71,465");
}

#[tokio::test]
async fn sub_account_lifecycle_records_activity() {
    let (app, db) = test_app().await.unwrap();
    let (agency, _) = insert_agency(&db, "owner").await.unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/agency/{}/subaccounts", agency.id),
            "owner",
            sub_account_form("Client One"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let sub_account = body_json(response).await;
    let sub_account_id = sub_account["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(authed_request(
            "GET",
            &format!("/agency/{}/subaccounts", agency.id),
            "owner",
        ))
        .await
        .unwrap();
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/subaccount/{sub_account_id}"),
            "owner",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["title"], "Deleted Subaccount");

    let response = app
        .oneshot(authed_request(
            "GET",
            &format!("/agency/{}/notifications", agency.id),
            "owner",
        ))
        .await
        .unwrap();
    let notifications = body_json(response).await;
    let texts: Vec<&str> = notifications
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["notification"].as_str().unwrap())
        .collect();
    assert!(texts.contains(&"User owner | Deleted a subaccount | Client One"));
    assert!(notifications[0]["user"]["id"] == "owner");
}

#[tokio::test]
async fn sub_account_form_follows_agency_form_rules() {
    let (app, db) = test_app().await.unwrap();
    let (agency, _) = insert_agency(&db, "owner").await.unwrap();
    let path = format!("/agency/{}/subaccounts", agency.id);

    let mut form = sub_account_form("A");
    form["subAccountLogo"] = json!("");

    let response = app
        .clone()
        .oneshot(json_request("POST", &path, "owner", form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    let details = body["details"].as_object().unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details["name"], "Please fill in this field");

    let mut form = sub_account_form("Client One");
    form["subAccountLogo"] = json!("");

    let response = app
        .oneshot(json_request("POST", &path, "owner", form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let sub_account = body_json(response).await;
    assert_eq!(sub_account["name"], "Client One");
}

#[tokio::test]
async fn sub_account_users_cannot_create_sub_accounts() {
    let (app, db) = test_app().await.unwrap();
    let (agency, _) = insert_agency(&db, "owner").await.unwrap();
    insert_user(&db, "member", Role::SubaccountUser).await.unwrap();
    agency_dashboard::repositories::UserRepository::new(&db)
        .link_to_agency("member", agency.id, Role::SubaccountUser)
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/agency/{}/subaccounts", agency.id),
            "member",
            sub_account_form("Client One"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn granted_user_sees_sub_account_and_permissions() {
    let (app, db) = test_app().await.unwrap();
    let (agency, _) = insert_agency(&db, "owner").await.unwrap();
    let sub_account = insert_sub_account(&db, agency.id, "Client One").await.unwrap();
    let guest = insert_user(&db, "guest", Role::SubaccountGuest).await.unwrap();

    let path = format!("/subaccount/{}", sub_account.id);
    let response = app
        .clone()
        .oneshot(authed_request("GET", &path, "guest"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["code"], "FORBIDDEN");
    assert_eq!(body["message"], "You do not have access to this sub-account");

    SubAccountRepository::new(&db)
        .grant_access(&guest.email, sub_account.id, true)
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(authed_request("GET", &path, "guest"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(authed_request("GET", "/agency/permissions", "guest"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["permissions"][0]["access"], true);
    assert_eq!(body["permissions"][0]["subAccount"]["name"], "Client One");
}

#[tokio::test]
async fn media_bucket_create_list_delete() {
    let (app, db) = test_app().await.unwrap();
    let (agency, _) = insert_agency(&db, "owner").await.unwrap();
    let sub_account = insert_sub_account(&db, agency.id, "Client One").await.unwrap();
    let media_path = format!("/subaccount/{}/media", sub_account.id);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &media_path,
            "owner",
            json!({ "link": "not a url", "name": "broken" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &media_path,
            "owner",
            json!({
                "link": "https://utfs.io/f/banner.png",
                "name": "banner",
                "type": "image/png"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["type"], "image/png");

    let response = app
        .clone()
        .oneshot(authed_request("GET", &media_path, "owner"))
        .await
        .unwrap();
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("{media_path}/{}", created["id"].as_str().unwrap()),
            "owner",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(authed_request(
            "DELETE",
            &format!("{media_path}/{}", Uuid::new_v4()),
            "owner",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_agency_removes_its_sub_accounts() {
    let (app, db) = test_app().await.unwrap();
    let (agency, _) = insert_agency(&db, "owner").await.unwrap();
    let sub_account = insert_sub_account(&db, agency.id, "Client One").await.unwrap();

    let response = app
        .oneshot(authed_request("DELETE", &format!("/agency/{}", agency.id), "owner"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["title"], "Deleted Agency");
    assert_eq!(body["message"], "Deleted your agency and all subaccounts");

    let remaining = SubAccountRepository::new(&db).get(sub_account.id).await.unwrap();
    assert!(remaining.is_none());
}

#[tokio::test]
async fn create_customer_stub_returns_test_customer_id() {
    let (app, db) = test_app().await.unwrap();
    insert_user(&db, "owner", Role::SubaccountUser).await.unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/stripe/create-customer",
            "owner",
            json!({ "email": "hello@acme.test", "name": "Acme" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["customerId"].as_str().unwrap().starts_with("str-test-"));
}
