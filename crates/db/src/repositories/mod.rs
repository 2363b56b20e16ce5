//! Database repositories.

pub mod admin;
pub mod like;
pub mod stream;
pub mod subscription;
pub mod user;

pub use admin::AdminRepository;
pub use like::LikeRepository;
pub use stream::{StreamFilter, StreamRepository};
pub use subscription::SubscriptionRepository;
pub use user::UserRepository;
