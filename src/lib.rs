//! # Agency Dashboard Library
//!
//! Multi-tenant agency and sub-account backend: tenant routing, session
//! gating, upload slots, page-data handlers and their storage.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routing;
pub mod seeds;
pub mod server;
pub mod telemetry;
pub mod uploads;
pub use migration;
