//! Registration, login and token verification.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::SaltString,
};
use axum::{Extension, Json, extract::State};
use inkpaint_core::api::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserId, UserInfo, non_empty,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::AppState;
use crate::db::DbError;
use crate::error::ApiError;

/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Token lifetime.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// JWT payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: UserId,
    pub username: String,
    pub iat: usize,
    pub exp: usize,
}

impl Claims {
    /// Claims issued now and valid for [`TOKEN_TTL_DAYS`].
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id,
            username: username.into(),
            iat: now.timestamp() as usize,
            exp: (now + chrono::Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize,
        }
    }
}

/// Sign `claims` with HS256.
pub fn sign(secret: &str, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Check signature and expiry and return the claims.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    // Expiry is exact, no clock-skew allowance.
    let mut validation = Validation::default();
    validation.leeway = 0;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}

async fn hash_password(password: String) -> Result<String, ApiError> {
    let hashed = tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
    })
    .await;

    match hashed {
        Ok(Ok(hash)) => Ok(hash),
        Ok(Err(e)) => {
            error!("Password hashing failed: {}", e);
            Err(ApiError::Internal("Error processing registration".to_string()))
        }
        Err(e) => {
            error!("Password hashing task failed: {}", e);
            Err(ApiError::Internal("Error processing registration".to_string()))
        }
    }
}

/// Whether `password` matches the stored PHC string. A malformed hash never matches.
async fn verify_password(password: String, stored: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || {
        PasswordHash::new(&stored)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    })
    .await
    .map_err(|e| {
        error!("Password check task failed: {}", e);
        ApiError::Internal("Error processing login".to_string())
    })
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid username or password".to_string())
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let (Some(username), Some(email), Some(password)) = (
        non_empty(&req.username),
        non_empty(&req.email),
        non_empty(&req.password),
    ) else {
        return Err(ApiError::BadRequest("All fields are required".to_string()));
    };

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let password_hash = hash_password(password.to_string()).await?;

    let id = state
        .db
        .create_user(username, email, &password_hash)
        .await
        .map_err(|e| match e {
            DbError::Conflict => {
                warn!("Registration rejected, {} or {} taken", username, email);
                ApiError::Conflict("Username or email already exists".to_string())
            }
            DbError::Sqlx(e) => {
                error!("Error creating user: {}", e);
                ApiError::Internal("Error creating user".to_string())
            }
        })?;

    info!(user_id = id, "Registered {}", username);
    Ok(Json(RegisterResponse {
        message: "User created successfully".to_string(),
        id,
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (Some(username), Some(password)) = (non_empty(&req.username), non_empty(&req.password))
    else {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    };

    let user = state
        .db
        .user_by_username(username)
        .await
        .map_err(|e| {
            error!("Error looking up user: {}", e);
            ApiError::Internal("Error looking up user".to_string())
        })?
        .ok_or_else(|| {
            warn!("Login for unknown user {}", username);
            invalid_credentials()
        })?;

    if !verify_password(password.to_string(), user.password.clone()).await? {
        warn!(user_id = user.id, "Wrong password");
        return Err(invalid_credentials());
    }

    let token = sign(&state.config.jwt_secret, &Claims::new(user.id, &user.username)).map_err(
        |e| {
            error!("Token signing failed: {}", e);
            ApiError::Internal("Error processing login".to_string())
        },
    )?;

    info!(user_id = user.id, "Logged in");
    Ok(Json(LoginResponse {
        token,
        user: user.info(),
    }))
}

/// Return the user behind a valid token.
pub async fn verify(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<UserInfo>, ApiError> {
    let user = state
        .db
        .user_by_id(claims.id)
        .await
        .map_err(|e| {
            error!("Error verifying user: {}", e);
            ApiError::Internal("Error verifying user".to_string())
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.info()))
}
