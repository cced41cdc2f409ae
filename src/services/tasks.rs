use std::sync::Arc;

use crate::client::{ApiClient, RequestOptions};
use crate::errors::ApiError;
use crate::models::task::{Task, TaskCreate, TaskFilter, TaskList, TaskUpdate};
use crate::models::Empty;

pub struct TaskService {
    api: Arc<ApiClient>,
}

impl TaskService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self, filter: &TaskFilter) -> Result<TaskList, ApiError> {
        self.api
            .get_json("/tasks", RequestOptions::get().queries(filter.to_query()))
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Task, ApiError> {
        self.api.get_json(&format!("/tasks/{}", id), RequestOptions::get()).await
    }

    pub async fn create(&self, task: &TaskCreate) -> Result<Task, ApiError> {
        let url = self.api.build_url("/tasks");
        self.api.fetch_json(&url, &RequestOptions::post().json(task)?).await
    }

    pub async fn update(&self, id: i64, update: &TaskUpdate) -> Result<Task, ApiError> {
        if update.is_empty() {
            return Err(ApiError::InvalidRequest("nothing to update".into()));
        }
        let url = self.api.build_url(&format!("/tasks/{}", id));
        self.api.fetch_json(&url, &RequestOptions::put().json(update)?).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let url = self.api.build_url(&format!("/tasks/{}", id));
        self.api.fetch_json::<Empty>(&url, &RequestOptions::delete()).await?;
        Ok(())
    }
}
