//! # Repository Layer
//!
//! Repository implementations that encapsulate SeaORM operations for the
//! dashboard entities.

pub mod agency;
pub mod media;
pub mod notification;
pub mod sub_account;
pub mod user;

pub use agency::AgencyRepository;
pub use media::MediaRepository;
pub use notification::NotificationRepository;
pub use sub_account::SubAccountRepository;
pub use user::UserRepository;
