//! Demo user seeding
//!
//! Inserts the single demo user the dashboard ships with. Running the seed
//! again leaves an existing user untouched.

use anyhow::{Context, Result};
use sea_orm::DatabaseConnection;

use crate::models::user::{Model as UserModel, Role};
use crate::repositories::user::{CreateUserRequest, UserRepository};

pub const DEMO_USER_ID: &str = "1";
pub const DEMO_USER_NAME: &str = "John Doe";
pub const DEMO_USER_EMAIL: &str = "johndoe@example.com";
pub const DEMO_USER_AVATAR_URL: &str =
    "https://gravatar.com/avatar/441e456eb8f2042235924103124678c4?s=400&d=robohash&r=x";

/// Outcome of a seeding run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Created(UserModel),
    AlreadyPresent(UserModel),
}

/// Seeds the demo user, skipping the insert when the id is already taken
pub async fn seed_demo_user(db: &DatabaseConnection) -> Result<SeedOutcome> {
    let repo = UserRepository::new(db);

    if let Some(existing) = repo
        .find_by_id(DEMO_USER_ID)
        .await
        .context("looking up demo user")?
    {
        log::info!("Demo user '{}' already exists, skipping", DEMO_USER_ID);
        return Ok(SeedOutcome::AlreadyPresent(existing));
    }

    let user = repo
        .create(CreateUserRequest {
            id: DEMO_USER_ID.to_string(),
            name: DEMO_USER_NAME.to_string(),
            email: DEMO_USER_EMAIL.to_string(),
            avatar_url: DEMO_USER_AVATAR_URL.to_string(),
            role: Role::default(),
        })
        .await
        .context("creating demo user")?;

    log::info!("Created demo user '{}' <{}>", user.name, user.email);
    Ok(SeedOutcome::Created(user))
}
