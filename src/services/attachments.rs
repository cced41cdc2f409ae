use std::sync::Arc;

use crate::client::{ApiClient, FilePart, RequestOptions};
use crate::errors::ApiError;
use crate::models::attachment::Attachment;
use crate::models::Empty;

pub struct AttachmentService {
    api: Arc<ApiClient>,
}

impl AttachmentService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self, task_id: i64) -> Result<Vec<Attachment>, ApiError> {
        self.api
            .get_json(&format!("/tasks/{}/attachments", task_id), RequestOptions::get())
            .await
    }

    /// Multipart upload; the `file` part carries the content.
    pub async fn upload(&self, task_id: i64, file: FilePart) -> Result<Attachment, ApiError> {
        let url = self.api.build_url(&format!("/tasks/{}/attachments", task_id));
        self.api
            .fetch_json(&url, &RequestOptions::post().multipart(vec![file]))
            .await
    }

    pub async fn delete(&self, attachment_id: i64) -> Result<(), ApiError> {
        let url = self.api.build_url(&format!("/attachments/{}", attachment_id));
        self.api.fetch_json::<Empty>(&url, &RequestOptions::delete()).await?;
        Ok(())
    }
}
