use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::Client;

use super::credential::CredentialStore;
use super::refresh::Refresher;
use crate::client::{ApiClient, RequestOptions};
use crate::errors::ApiError;
use crate::models::token::TokenResponse;
use crate::models::user::User;

/// Login, logout and session queries against the remote auth service.
///
/// Login and logout talk to the server directly (they must not go through the
/// refresh-and-retry path); `current_user` goes through the gateway so an
/// expired token is refreshed transparently.
pub struct AuthService {
    http: Client,
    api: Arc<ApiClient>,
    credentials: Arc<CredentialStore>,
    refresher: Arc<Refresher>,
}

impl AuthService {
    pub fn new(
        http: Client,
        api: Arc<ApiClient>,
        credentials: Arc<CredentialStore>,
        refresher: Arc<Refresher>,
    ) -> Self {
        Self {
            http,
            api,
            credentials,
            refresher,
        }
    }

    /// `POST /login` with form-encoded credentials. The server also sets the
    /// refresh cookie, which lands in the shared cookie jar.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let resp = self
            .http
            .post(self.api.build_url("/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.bytes().await.unwrap_or_default();
            tracing::debug!(%status, username, "login rejected");
            return Err(ApiError::from_response_body(status, &body));
        }

        let token: TokenResponse = serde_json::from_slice(&resp.bytes().await?)?;
        self.credentials.set(token.access_token.clone(), token.expires_in);
        tracing::info!(username, expires_in = token.expires_in, "logged in");
        Ok(token)
    }

    /// End this session. The local credential is cleared whatever the server says.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.end_session("/logout").await
    }

    /// End every session of the current user. Clears locally like [`logout`](Self::logout).
    pub async fn logout_all(&self) -> Result<(), ApiError> {
        self.end_session("/logout-all").await
    }

    async fn end_session(&self, path: &str) -> Result<(), ApiError> {
        let result = self.post_session_end(path).await;
        self.credentials.clear();

        match &result {
            Ok(()) => tracing::info!(path, "logged out"),
            Err(e) => tracing::warn!(path, error = %e, "logout call failed, local credential cleared anyway"),
        }
        result
    }

    async fn post_session_end(&self, path: &str) -> Result<(), ApiError> {
        let mut req = self.http.post(self.api.build_url(path));
        if let Some(token) = self.credentials.get() {
            req = req.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.bytes().await.unwrap_or_default();
            return Err(ApiError::from_response_body(status, &body));
        }
        Ok(())
    }

    /// `GET /users/me`.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.api.get_json("/users/me", RequestOptions::get()).await
    }

    /// Force a refresh (joins one already in flight).
    pub async fn refresh(&self) -> bool {
        self.refresher.refresh_token_if_needed().await
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_authenticated()
    }
}
