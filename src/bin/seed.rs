//! One-shot seeding binary: inserts the demo user and exits.

use anyhow::{Context, Result};
use agency_dashboard::{
    config::ConfigLoader,
    db,
    seeds::{SeedOutcome, seed_demo_user},
    telemetry,
};

async fn run() -> Result<()> {
    let config = ConfigLoader::new()
        .load()
        .context("loading configuration")?;
    telemetry::init_tracing(&config).context("initializing telemetry")?;

    let db = db::init_pool(&config)
        .await
        .context("initializing database connection pool")?;
    db::run_migrations(&db).await?;

    match seed_demo_user(&db).await? {
        SeedOutcome::Created(user) => println!("{:?}", user),
        SeedOutcome::AlreadyPresent(user) => println!("demo user already present: {}", user.id),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!(error = ?err, "seeding failed");
        eprintln!("seeding failed: {err:?}");
        std::process::exit(1);
    }
}
