//! Authenticated request gateway.
//!
//! Every resource call goes through [`ApiClient::fetch_with_auth`]:
//! 1. Read the in-memory credential; if there is none, try one refresh first
//!    (a fresh process may still hold a valid refresh cookie).
//! 2. No credential after that → [`ApiError::AuthRequired`], nothing is sent.
//! 3. Send with `Authorization: Bearer <token>` and the cookie jar attached.
//! 4. A 401 on the first attempt triggers exactly one refresh and one resend.
//!    If the refresh fails → [`ApiError::AuthExpired`].
//! 5. A 401 on the resend is handed back untouched; `fetch_json` turns it into
//!    a terminal `RequestFailed`.

pub mod request;

use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::credential::CredentialStore;
use crate::auth::refresh::Refresher;
use crate::errors::ApiError;

pub use request::{FilePart, RequestBody, RequestOptions};

/// Position in the at-most-one-retry state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Fresh,
    Retried,
}

pub struct ApiClient {
    http: Client,
    base_url: String,
    credentials: Arc<CredentialStore>,
    refresher: Arc<Refresher>,
}

impl ApiClient {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        credentials: Arc<CredentialStore>,
        refresher: Arc<Refresher>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            refresher,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join the configured base with a resource path.
    pub fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue a request with the current credential, refreshing and resending
    /// at most once on 401.
    ///
    /// Any response counts as success here; status interpretation is left to
    /// the caller.
    pub async fn fetch_with_auth(&self, url: &str, options: &RequestOptions) -> Result<Response, ApiError> {
        let mut attempt = Attempt::Fresh;

        loop {
            let mut token = self.credentials.get();
            if token.is_none() && attempt == Attempt::Fresh && self.refresher.refresh_token_if_needed().await {
                token = self.credentials.get();
            }
            let token = token.ok_or(ApiError::AuthRequired)?;

            let mut headers = options.effective_headers();
            let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::InvalidRequest("access token is not a valid header value".into()))?;
            bearer.set_sensitive(true);
            headers.insert(AUTHORIZATION, bearer);

            let mut builder = self.http.request(options.method.clone(), url).headers(headers);
            if !options.query.is_empty() {
                builder = builder.query(&options.query);
            }
            let resp = options.apply_body(builder)?.send().await?;

            if resp.status() != StatusCode::UNAUTHORIZED {
                return Ok(resp);
            }

            match attempt {
                Attempt::Fresh => {
                    debug!(method = %options.method, url, attempt = ?attempt, "got 401, refreshing credential");
                    if !self.refresher.refresh_token_if_needed().await {
                        return Err(ApiError::AuthExpired);
                    }
                    attempt = Attempt::Retried;
                }
                Attempt::Retried => {
                    warn!(method = %options.method, url, attempt = ?attempt, "still unauthorized after refresh");
                    return Ok(resp);
                }
            }
        }
    }

    /// [`fetch_with_auth`](Self::fetch_with_auth) plus status check and JSON decode.
    ///
    /// A 204 decodes `T` from `{}`; use [`crate::models::Empty`] or
    /// `serde_json::Value` for calls without a meaningful body.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str, options: &RequestOptions) -> Result<T, ApiError> {
        let resp = self.fetch_with_auth(url, options).await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.bytes().await.unwrap_or_default();
            return Err(ApiError::from_response_body(status, &body));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(serde_json::from_value(serde_json::json!({}))?);
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Convenience: `GET {base}{path}` decoded as `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> Result<T, ApiError> {
        self.fetch_json(&self.build_url(path), &options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> (Arc<CredentialStore>, ApiClient) {
        let store = Arc::new(CredentialStore::new());
        let http = Client::new();
        let refresher = Arc::new(Refresher::new(
            http.clone(),
            format!("{}/refresh", server.uri()),
            store.clone(),
        ));
        (store.clone(), ApiClient::new(http, server.uri(), store, refresher))
    }

    #[test]
    fn test_build_url_joins_with_single_slash() {
        let store = Arc::new(CredentialStore::new());
        let refresher = Arc::new(Refresher::new(Client::new(), "http://x/refresh", store.clone()));
        let api = ApiClient::new(Client::new(), "http://localhost:8000/api/", store, refresher);
        assert_eq!(api.build_url("/tasks"), "http://localhost:8000/api/tasks");
        assert_eq!(api.build_url("tasks/3"), "http://localhost:8000/api/tasks/3");
    }

    #[tokio::test]
    async fn test_bearer_header_is_attached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .and(header("authorization", "Bearer tok"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"tasks": [], "total": 0})))
            .expect(1)
            .mount(&server)
            .await;

        let (store, api) = client(&server);
        store.set("tok", 900);
        let v: serde_json::Value = api.get_json("/tasks", RequestOptions::get()).await.unwrap();
        assert_eq!(v["total"], 0);
    }

    #[tokio::test]
    async fn test_no_credential_and_failed_refresh_never_sends_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/refresh"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (_store, api) = client(&server);
        let err = api
            .fetch_with_auth(&api.build_url("/tasks"), &RequestOptions::get())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::AuthRequired));
    }

    #[tokio::test]
    async fn test_204_yields_empty_object() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/tasks/7"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let (store, api) = client(&server);
        store.set("tok", 900);
        let v: serde_json::Value = api
            .fetch_json(&api.build_url("/tasks/7"), &RequestOptions::delete())
            .await
            .unwrap();
        assert_eq!(v, serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_error_detail_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks/99"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({"detail": "X"})))
            .mount(&server)
            .await;

        let (store, api) = client(&server);
        store.set("tok", 900);
        let err = api
            .fetch_json::<serde_json::Value>(&api.build_url("/tasks/99"), &RequestOptions::get())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "X");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_non_2xx_status_is_returned_by_fetch_with_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (store, api) = client(&server);
        store.set("tok", 900);
        let resp = api
            .fetch_with_auth(&api.build_url("/tasks"), &RequestOptions::get())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_401_log_lines_carry_the_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"access_token": "new", "expires_in": 900})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(401))
            .expect(2)
            .mount(&server)
            .await;

        let (_guard, logs) = crate::test_support::capture_logs();
        let (store, api) = client(&server);
        store.set("old", 900);
        let resp = api
            .fetch_with_auth(&api.build_url("/tasks"), &RequestOptions::get())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let out = logs.contents();
        assert!(out.contains("got 401, refreshing credential"), "{out}");
        assert!(out.contains("attempt=Fresh"), "{out}");
        assert!(out.contains("still unauthorized after refresh"), "{out}");
        assert!(out.contains("attempt=Retried"), "{out}");
    }
}
