use std::sync::Arc;

use crate::client::{ApiClient, RequestOptions};
use crate::errors::ApiError;
use crate::models::comment::{Comment, CommentCreate};
use crate::models::Empty;

pub struct CommentService {
    api: Arc<ApiClient>,
}

impl CommentService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self, task_id: i64) -> Result<Vec<Comment>, ApiError> {
        self.api
            .get_json(&format!("/tasks/{}/comments", task_id), RequestOptions::get())
            .await
    }

    pub async fn create(&self, task_id: i64, content: impl Into<String>) -> Result<Comment, ApiError> {
        let url = self.api.build_url(&format!("/tasks/{}/comments", task_id));
        let body = CommentCreate { content: content.into() };
        self.api.fetch_json(&url, &RequestOptions::post().json(&body)?).await
    }

    pub async fn delete(&self, comment_id: i64) -> Result<(), ApiError> {
        let url = self.api.build_url(&format!("/comments/{}", comment_id));
        self.api.fetch_json::<Empty>(&url, &RequestOptions::delete()).await?;
        Ok(())
    }
}
