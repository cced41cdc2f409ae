//! Taskboard gateway — authenticated client for the Taskboard task service.
//!
//! [`Taskboard`] wires one credential store, one single-flight refresher and
//! one cookie-carrying HTTP client into the API client and the typed services.
//! Construct one per process (or per logged-in user) and share it.

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod services;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use auth::{AuthService, CredentialStore, Refresher};
use client::ApiClient;
use config::Config;
use errors::ApiError;
use services::{
    AttachmentService, CategoryService, CommentService, NotificationService, ProjectService,
    SearchService, TagService, TaskService,
};

pub struct Taskboard {
    pub auth: AuthService,
    pub tasks: TaskService,
    pub projects: ProjectService,
    pub categories: CategoryService,
    pub tags: TagService,
    pub notifications: NotificationService,
    pub comments: CommentService,
    pub attachments: AttachmentService,
    pub search: SearchService,
    api: Arc<ApiClient>,
    credentials: Arc<CredentialStore>,
}

impl Taskboard {
    pub fn new(cfg: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .cookie_store(true)
            .timeout(cfg.request_timeout)
            .connect_timeout(cfg.connect_timeout)
            .build()?;
        Ok(Self::with_client(http, &cfg.api_base_url))
    }

    /// Build from an existing HTTP client. The client must have its cookie
    /// store enabled for refresh to work against a real server.
    pub fn with_client(http: reqwest::Client, api_base_url: &str) -> Self {
        let credentials = Arc::new(CredentialStore::new());
        let base = api_base_url.trim_end_matches('/');
        let refresher = Arc::new(Refresher::new(
            http.clone(),
            format!("{}/refresh", base),
            credentials.clone(),
        ));
        let api = Arc::new(ApiClient::new(
            http.clone(),
            base,
            credentials.clone(),
            refresher.clone(),
        ));

        Self {
            auth: AuthService::new(http, api.clone(), credentials.clone(), refresher),
            tasks: TaskService::new(api.clone()),
            projects: ProjectService::new(api.clone()),
            categories: CategoryService::new(api.clone()),
            tags: TagService::new(api.clone()),
            notifications: NotificationService::new(api.clone()),
            comments: CommentService::new(api.clone()),
            attachments: AttachmentService::new(api.clone()),
            search: SearchService::new(api.clone()),
            api,
            credentials,
        }
    }

    /// The underlying gateway, for calls the typed services do not cover.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }
}
