//! User service.

use std::borrow::Cow;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{Set, prelude::DateTimeWithTimeZone};
use serde::{Deserialize, Serialize};
use streamhub_common::{AppError, AppResult};
use streamhub_db::{entities::user, repositories::UserRepository};
use validator::{Validate, ValidationError};

/// Maximum number of users returned by listings.
pub const USER_LIST_LIMIT: u64 = 100;

/// Bio given to every newly registered user.
pub const DEFAULT_BIO: &str = "New streamer";

const MAX_USERNAME_CHARS: usize = 64;
const MAX_PASSWORD_CHARS: usize = 128;

const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/avataaars/svg";

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

/// Input for registering a new user.
///
/// Missing fields deserialize as empty strings so they can be reported as a
/// single "all fields required" error.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterInput {
    #[validate(
        length(min = 3, message = "Username must be at least 3 characters"),
        custom(function = "username_not_too_long")
    )]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(
        length(min = 6, message = "Password must be at least 6 characters"),
        custom(function = "password_not_too_long")
    )]
    pub password: String,

    #[validate(length(max = 128, message = "Display name is too long"))]
    pub display_name: String,
}

fn max_chars(value: &str, max: usize, message: &'static str) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        Err(ValidationError::new("length").with_message(Cow::Borrowed(message)))
    } else {
        Ok(())
    }
}

fn username_not_too_long(username: &str) -> Result<(), ValidationError> {
    max_chars(username, MAX_USERNAME_CHARS, "Username must be at most 64 characters")
}

fn password_not_too_long(password: &str) -> Result<(), ValidationError> {
    max_chars(password, MAX_PASSWORD_CHARS, "Password must be at most 128 characters")
}

/// Input for logging in.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// The account as shown to its owner after registering or logging in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountView {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub is_verified: bool,
    pub subscriber_count: i32,
}

impl From<user::Model> for AccountView {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            is_verified: user.is_verified,
            subscriber_count: user.subscriber_count,
        }
    }
}

/// A channel as shown to anyone browsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub id: i32,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub subscriber_count: i32,
    pub is_verified: bool,
    pub created_at: DateTimeWithTimeZone,
}

impl From<user::Model> for PublicUser {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            bio: user.bio,
            subscriber_count: user.subscriber_count,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Register a new user.
    pub async fn register(&self, input: RegisterInput) -> AppResult<AccountView> {
        let fields = [
            &input.username,
            &input.email,
            &input.password,
            &input.display_name,
        ];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(AppError::BadRequest("All fields are required".to_string()));
        }

        input.validate()?;

        if self
            .user_repo
            .find_by_email_or_username(&input.email, &input.username)
            .await?
            .is_some()
        {
            return Err(already_in_use());
        }

        let password_hash = hash_password(&input.password)?;

        let model = user::ActiveModel {
            avatar_url: Set(Some(default_avatar_url(&input.username))),
            username: Set(input.username),
            email: Set(input.email),
            password_hash: Set(password_hash),
            display_name: Set(input.display_name),
            bio: Set(Some(DEFAULT_BIO.to_string())),
            subscriber_count: Set(0),
            is_verified: Set(false),
            ..Default::default()
        };

        // A concurrent registration can still win the race to the unique index.
        let user = self.user_repo.create(model).await.map_err(|e| match e {
            AppError::Database(msg) if msg.contains("duplicate key") => already_in_use(),
            other => other,
        })?;

        tracing::info!(user_id = user.id, username = %user.username, "Registered user");
        Ok(user.into())
    }

    /// Check credentials and return the account.
    pub async fn login(&self, input: LoginInput) -> AppResult<AccountView> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            return Err(AppError::BadRequest(
                "Email and password are required".to_string(),
            ));
        }

        let Some(user) = self.user_repo.find_by_email(&input.email).await? else {
            return Err(invalid_credentials());
        };

        if !verify_password(&input.password, &user.password_hash)? {
            tracing::debug!(user_id = user.id, "Password mismatch");
            return Err(invalid_credentials());
        }

        Ok(user.into())
    }

    /// Channels with the most subscribers first.
    pub async fn list_popular(&self) -> AppResult<Vec<PublicUser>> {
        let users = self.user_repo.find_most_subscribed(USER_LIST_LIMIT).await?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }
}

fn already_in_use() -> AppError {
    AppError::BadRequest("Email or username already in use".to_string())
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid email or password".to_string())
}

fn default_avatar_url(username: &str) -> String {
    format!(
        "{AVATAR_BASE_URL}?seed={}",
        urlencoding::encode(username)
    )
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
