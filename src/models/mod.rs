//! # Data Models
//!
//! SeaORM entities for agencies, sub-accounts and their members, plus the
//! basic service info payload.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod agency;
pub mod media;
pub mod notification;
pub mod permission;
pub mod sub_account;
pub mod user;

pub use agency::Entity as Agency;
pub use media::Entity as Media;
pub use notification::Entity as Notification;
pub use permission::Entity as Permission;
pub use sub_account::Entity as SubAccount;
pub use user::Entity as User;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "agency-dashboard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
