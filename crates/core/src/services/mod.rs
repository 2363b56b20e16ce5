//! Business logic services.

#![allow(missing_docs)]

pub mod admin;
pub mod social;
pub mod stream;
pub mod user;

pub use admin::{AdminService, AdminUserView, AdminVideoView};
pub use social::{LikeInput, SocialService, SubscribeInput};
pub use stream::{
    CreateStreamInput, CreatedStream, LiveSession, LiveSessionInput, LiveStatus, StreamQuery,
    StreamService, StreamWithAuthor, UploadInput, UploadedVideo,
};
pub use user::{AccountView, LoginInput, PublicUser, RegisterInput, UserService};
