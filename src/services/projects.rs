use std::sync::Arc;

use crate::client::{ApiClient, RequestOptions};
use crate::errors::ApiError;
use crate::models::project::{Project, ProjectCreate, ProjectUpdate};
use crate::models::Empty;

pub struct ProjectService {
    api: Arc<ApiClient>,
}

impl ProjectService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Project>, ApiError> {
        self.api.get_json("/projects", RequestOptions::get()).await
    }

    pub async fn get(&self, id: i64) -> Result<Project, ApiError> {
        self.api.get_json(&format!("/projects/{}", id), RequestOptions::get()).await
    }

    pub async fn create(&self, project: &ProjectCreate) -> Result<Project, ApiError> {
        let url = self.api.build_url("/projects");
        self.api.fetch_json(&url, &RequestOptions::post().json(project)?).await
    }

    pub async fn update(&self, id: i64, update: &ProjectUpdate) -> Result<Project, ApiError> {
        let url = self.api.build_url(&format!("/projects/{}", id));
        self.api.fetch_json(&url, &RequestOptions::put().json(update)?).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let url = self.api.build_url(&format!("/projects/{}", id));
        self.api.fetch_json::<Empty>(&url, &RequestOptions::delete()).await?;
        Ok(())
    }
}
