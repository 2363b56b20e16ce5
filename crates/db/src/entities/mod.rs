//! Database entities.

pub mod like;
pub mod stream;
pub mod subscription;
pub mod user;

pub use like::Entity as Like;
pub use stream::Entity as Stream;
pub use subscription::Entity as Subscription;
pub use user::Entity as User;
