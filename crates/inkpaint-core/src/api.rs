//! JSON bodies exchanged with the InkPaint server.
//!
//! Request fields are optional so that the server can answer a missing
//! field with its own validation message instead of a decode failure.

use serde::{Deserialize, Serialize};

/// Identifier of a user row.
pub type UserId = i64;

/// Identifier of a drawing row.
pub type DrawingId = i64;

/// `POST /api/auth/register`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl RegisterRequest {
    pub fn new(username: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub id: UserId,
}

/// `POST /api/auth/login`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// `POST /api/drawings`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDrawing {
    #[serde(default)]
    pub name: Option<String>,
    /// Embedded image payload (data URI).
    #[serde(default)]
    pub data: Option<String>,
}

impl NewDrawing {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            data: Some(data.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedDrawing {
    pub id: DrawingId,
    pub message: String,
}

/// Listing entry; carries no payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawingSummary {
    pub id: DrawingId,
    pub name: String,
    pub created_at: String,
}

/// A stored drawing with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drawing {
    pub id: DrawingId,
    pub user_id: UserId,
    pub name: String,
    pub data: String,
    pub created_at: String,
}

impl Drawing {
    pub fn summary(&self) -> DrawingSummary {
        DrawingSummary {
            id: self.id,
            name: self.name.clone(),
            created_at: self.created_at.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Treat missing and empty strings alike.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
