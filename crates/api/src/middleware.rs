//! Application state and CORS layers.

#![allow(missing_docs)]

use std::{sync::Arc, time::Duration};

use axum::http::{HeaderName, Method, header::CONTENT_TYPE};
use sea_orm::DatabaseConnection;
use streamhub_common::Config;
use streamhub_core::{AdminService, SocialService, StreamService, UserService};
use streamhub_db::repositories::{
    AdminRepository, LikeRepository, StreamRepository, SubscriptionRepository, UserRepository,
};
use tower_http::cors::{Any, CorsLayer};

/// Header carrying the caller's user id on session endpoints.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the admin token when one is configured.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// How long browsers may cache a preflight answer.
pub const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(86_400);

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub stream_service: StreamService,
    pub social_service: SocialService,
    pub admin_service: AdminService,
    /// Required value of `X-Admin-Token`; admin actions are open when `None`.
    pub admin_token: Option<Arc<str>>,
}

impl AppState {
    /// Wire repositories and services over one connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, config: &Config) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let stream_repo = StreamRepository::new(Arc::clone(&db));
        let subscription_repo = SubscriptionRepository::new(Arc::clone(&db));
        let like_repo = LikeRepository::new(Arc::clone(&db));
        let admin_repo = AdminRepository::new(db);

        Self {
            user_service: UserService::new(user_repo.clone()),
            stream_service: StreamService::new(
                stream_repo.clone(),
                config.streaming.rtmp_base_url.clone(),
            ),
            social_service: SocialService::new(subscription_repo, like_repo),
            admin_service: AdminService::new(admin_repo, user_repo, stream_repo),
            admin_token: config.admin.token().map(Arc::from),
        }
    }
}

/// CORS layer for one endpoint.
///
/// Any `OPTIONS` request is answered by the layer itself with an empty 200,
/// so preflights never reach handlers or header checks. Every other
/// response gets `Access-Control-Allow-Origin: *`. `headers` are allowed in
/// addition to `Content-Type`.
#[must_use]
pub fn cors_layer(methods: &[Method], headers: &[&'static str]) -> CorsLayer {
    let allowed: Vec<HeaderName> = std::iter::once(CONTENT_TYPE)
        .chain(headers.iter().copied().map(HeaderName::from_static))
        .collect();

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(methods.to_vec())
        .allow_headers(allowed)
        .max_age(PREFLIGHT_MAX_AGE)
}
