//! HTTP API layer for streamhub.
//!
//! Three endpoints share one database:
//!
//! - **`/api`**: action dispatcher for streams, users, social actions,
//!   accounts and admin operations
//! - **`/streaming`**: live session lifecycle keyed by `X-User-Id`
//! - **`/upload-video`**: registration of externally hosted videos
//!
//! The [`event`] module drives the same router from serverless function
//! events.

pub mod endpoints;
pub mod event;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use event::{HttpEvent, HttpEventResponse, handle_event};
pub use middleware::AppState;
