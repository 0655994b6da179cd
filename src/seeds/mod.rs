//! Database seeding functionality
//!
//! Populates the database with the demo data used for local development.

pub mod user;

pub use user::{SeedOutcome, seed_demo_user};
