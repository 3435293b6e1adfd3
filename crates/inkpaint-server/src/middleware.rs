use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::AppState;
use crate::auth::verify_token;
use crate::error::ApiError;

/// The token part of an `Authorization` header: its second word.
pub fn bearer_token(value: &str) -> Option<&str> {
    value.split_whitespace().nth(1)
}

/// Validate the bearer token and attach its [`Claims`](crate::auth::Claims)
/// to the request.
///
/// No token is a 401; a token that fails verification is a 403.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| ApiError::Unauthorized("Token required".to_string()))?;

    let claims = verify_token(&state.config.jwt_secret, token).map_err(|e| {
        tracing::warn!("Rejected token: {}", e);
        ApiError::Forbidden("Invalid or expired token".to_string())
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Token abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token(""), None);
    }
}
