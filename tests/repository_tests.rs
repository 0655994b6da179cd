//! Repository behaviour against a migrated SQLite database.

use agency_dashboard::error::RepositoryError;
use agency_dashboard::models::user::Role;
use agency_dashboard::repositories::media::CreateMediaRequest;
use agency_dashboard::repositories::user::CreateUserRequest;
use agency_dashboard::repositories::{
    AgencyRepository, MediaRepository, NotificationRepository, SubAccountRepository,
    UserRepository,
};
use anyhow::Result;
use uuid::Uuid;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{
    agency_details, insert_agency, insert_sub_account, insert_user, setup_test_db,
    sub_account_details,
};

#[tokio::test]
async fn user_creation_validates_id_and_email() -> Result<()> {
    let db = setup_test_db().await?;
    let repo = UserRepository::new(&db);

    let result = repo
        .create(CreateUserRequest {
            id: "u1".to_string(),
            name: "No Email".to_string(),
            email: "not-an-email".to_string(),
            avatar_url: String::new(),
            role: Role::SubaccountUser,
        })
        .await;
    assert!(matches!(result, Err(RepositoryError::Validation(_))));

    let result = repo
        .create(CreateUserRequest {
            id: String::new(),
            name: "No Id".to_string(),
            email: "a@b.co".to_string(),
            avatar_url: String::new(),
            role: Role::SubaccountUser,
        })
        .await;
    assert!(matches!(result, Err(RepositoryError::Validation(_))));
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_a_unique_violation() -> Result<()> {
    let db = setup_test_db().await?;
    insert_user(&db, "u1", Role::SubaccountUser).await?;

    let result = UserRepository::new(&db)
        .create(CreateUserRequest {
            id: "u2".to_string(),
            name: "Copy".to_string(),
            email: "u1@example.com".to_string(),
            avatar_url: String::new(),
            role: Role::SubaccountUser,
        })
        .await;
    assert!(matches!(result, Err(RepositoryError::Database(_))));
    Ok(())
}

#[tokio::test]
async fn agency_upsert_updates_in_place_and_keeps_customer_id() -> Result<()> {
    let db = setup_test_db().await?;
    let repo = AgencyRepository::new(&db);
    let id = Uuid::new_v4();

    let mut details = agency_details(id, "Acme");
    details.customer_id = Some("str-test-1".to_string());
    repo.upsert(details).await?;

    let updated = repo.upsert(agency_details(id, "Acme Renamed")).await?;
    assert_eq!(updated.name, "Acme Renamed");
    assert_eq!(updated.customer_id, "str-test-1");
    assert_eq!(updated.goal, 5);
    Ok(())
}

#[tokio::test]
async fn new_sub_account_grants_owner_access() -> Result<()> {
    let db = setup_test_db().await?;
    let (agency, owner) = insert_agency(&db, "owner").await?;
    let sub_account = insert_sub_account(&db, agency.id, "Client").await?;

    let repo = SubAccountRepository::new(&db);
    assert!(repo.has_access(&owner.email, sub_account.id).await?);
    assert!(!repo.has_access("someone@example.com", sub_account.id).await?);

    repo.grant_access(&owner.email, sub_account.id, false).await?;
    assert!(!repo.has_access(&owner.email, sub_account.id).await?);
    Ok(())
}

#[tokio::test]
async fn sub_account_cannot_move_between_agencies() -> Result<()> {
    let db = setup_test_db().await?;
    let (agency, _) = insert_agency(&db, "owner").await?;
    let other = AgencyRepository::new(&db)
        .upsert(agency_details(Uuid::new_v4(), "Other"))
        .await?;
    let sub_account = insert_sub_account(&db, agency.id, "Client").await?;

    let mut moved = sub_account_details(other.id, "Client");
    moved.id = sub_account.id;
    let result = SubAccountRepository::new(&db).upsert(moved).await;
    assert!(matches!(result, Err(RepositoryError::Validation(_))));
    Ok(())
}

#[tokio::test]
async fn auth_user_details_include_agency_sub_accounts() -> Result<()> {
    let db = setup_test_db().await?;
    let (agency, _) = insert_agency(&db, "owner").await?;
    insert_sub_account(&db, agency.id, "First").await?;
    insert_sub_account(&db, agency.id, "Second").await?;

    let details = UserRepository::new(&db)
        .get_auth_user_details("owner")
        .await?
        .expect("user exists");
    let with_subs = details.agency.expect("user has an agency");
    assert_eq!(with_subs.agency.id, agency.id);
    assert_eq!(with_subs.sub_accounts.len(), 2);

    assert!(UserRepository::new(&db).get_auth_user_details("ghost").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn deleting_agency_cascades_to_dependents() -> Result<()> {
    let db = setup_test_db().await?;
    let (agency, owner) = insert_agency(&db, "owner").await?;
    let sub_account = insert_sub_account(&db, agency.id, "Client").await?;
    MediaRepository::new(&db)
        .create(
            sub_account.id,
            CreateMediaRequest {
                link: "https://utfs.io/f/a.png".to_string(),
                name: "a".to_string(),
                media_type: None,
            },
        )
        .await?;
    NotificationRepository::new(&db)
        .log_activity(agency.id, Some(sub_account.id), &owner.id, "Uploaded a media file | a")
        .await?;

    AgencyRepository::new(&db).delete(agency.id).await?;

    assert!(SubAccountRepository::new(&db).get(sub_account.id).await?.is_none());
    assert!(MediaRepository::new(&db).list_by_sub_account(sub_account.id).await?.is_empty());
    assert!(NotificationRepository::new(&db).list_for_agency(agency.id).await?.is_empty());

    let owner = UserRepository::new(&db).find_by_id("owner").await?.expect("user survives");
    assert!(owner.agency_id.is_none());
    Ok(())
}

#[tokio::test]
async fn deleting_missing_rows_is_not_found() -> Result<()> {
    let db = setup_test_db().await?;

    let result = AgencyRepository::new(&db).delete(Uuid::new_v4()).await;
    assert!(matches!(result, Err(RepositoryError::NotFound(_))));

    let result = SubAccountRepository::new(&db).delete(Uuid::new_v4()).await;
    assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn notifications_are_prefixed_with_user_name() -> Result<()> {
    let db = setup_test_db().await?;
    let (agency, _) = insert_agency(&db, "owner").await?;

    let notification = NotificationRepository::new(&db)
        .log_activity(agency.id, None, "owner", "Updated agency details")
        .await?;
    assert_eq!(notification.notification, "User owner | Updated agency details");

    let listed = NotificationRepository::new(&db).list_for_agency(agency.id).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].1.as_ref().map(|u| u.id.as_str()), Some("owner"));

    let missing_user = NotificationRepository::new(&db)
        .log_activity(agency.id, None, "ghost", "Anything")
        .await;
    assert!(matches!(missing_user, Err(RepositoryError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn user_permissions_carry_their_sub_account() -> Result<()> {
    let db = setup_test_db().await?;
    let (agency, _) = insert_agency(&db, "owner").await?;
    let sub_account = insert_sub_account(&db, agency.id, "Client").await?;

    let permissions = UserRepository::new(&db)
        .get_user_permissions("owner")
        .await?
        .expect("user exists");
    assert_eq!(permissions.permissions.len(), 1);
    let (permission, granted) = &permissions.permissions[0];
    assert!(permission.access);
    assert_eq!(granted.as_ref().map(|s| s.id), Some(sub_account.id));
    Ok(())
}
