//! HTTP client for the InkPaint server.

use super::{BoxFuture, DrawingStore, StorageError, StorageResult};
use crate::api::{
    Drawing, DrawingId, DrawingSummary, ErrorBody, LoginRequest, LoginResponse, MessageResponse,
    NewDrawing, RegisterRequest, RegisterResponse, SavedDrawing, UserInfo,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::RwLock;

/// Store backed by the server's `/api` endpoints.
///
/// Requests carry `Authorization: Bearer <token>` once a token is known
/// (after [`HttpStore::login`] or [`HttpStore::with_token`]); without one
/// they are sent bare.
pub struct HttpStore {
    client: Client,
    /// Base URL of the API, e.g. `http://localhost:3000/api`.
    base_url: String,
    token: RwLock<Option<String>>,
}

impl HttpStore {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            token: RwLock::new(None),
        }
    }

    /// Use an existing bearer token.
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.set_token(Some(token.into()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }

    /// Forget the bearer token.
    pub fn logout(&self) {
        self.set_token(None);
    }

    /// Create an account.
    pub async fn register(&self, request: &RegisterRequest) -> StorageResult<RegisterResponse> {
        self.send(self.client.post(self.url("/auth/register")).json(request))
            .await
    }

    /// Sign in and remember the returned token.
    pub async fn login(&self, username: &str, password: &str) -> StorageResult<LoginResponse> {
        let request = LoginRequest::new(username, password);
        let response: LoginResponse = self
            .send(self.client.post(self.url("/auth/login")).json(&request))
            .await?;
        self.set_token(Some(response.token.clone()));
        log::info!("Signed in as {}", response.user.username);
        Ok(response)
    }

    /// Check the current token and return the user it belongs to.
    pub async fn verify(&self) -> StorageResult<UserInfo> {
        self.send(self.client.get(self.url("/auth/verify"))).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> StorageResult<T> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| StorageError::Serialization(e.to_string()));
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        };
        log::warn!("Request failed with {}: {}", status, message);
        Err(StorageError::from_status(status.as_u16(), message))
    }
}

impl DrawingStore for HttpStore {
    fn save(&self, name: &str, data: &str) -> BoxFuture<'_, StorageResult<DrawingId>> {
        let body = NewDrawing::new(name, data);
        Box::pin(async move {
            let saved: SavedDrawing = self
                .send(self.client.post(self.url("/drawings")).json(&body))
                .await?;
            log::info!("Saved drawing {}", saved.id);
            Ok(saved.id)
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<DrawingSummary>>> {
        Box::pin(async move {
            self.send::<Vec<DrawingSummary>>(self.client.get(self.url("/drawings")))
                .await
        })
    }

    fn load(&self, id: DrawingId) -> BoxFuture<'_, StorageResult<Drawing>> {
        Box::pin(async move {
            self.send::<Drawing>(self.client.get(self.url(&format!("/drawings/{}", id))))
                .await
        })
    }

    fn delete(&self, id: DrawingId) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            let _: MessageResponse = self
                .send(self.client.delete(self.url(&format!("/drawings/{}", id))))
                .await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let store = HttpStore::new("http://localhost:3000/api/");
        assert_eq!(store.base_url(), "http://localhost:3000/api");
        assert_eq!(store.url("/drawings"), "http://localhost:3000/api/drawings");
    }

    #[test]
    fn test_token_lifecycle() {
        let store = HttpStore::new("http://localhost:3000/api").with_token("abc");
        assert_eq!(store.token().as_deref(), Some("abc"));
        store.logout();
        assert!(store.token().is_none());
    }
}
