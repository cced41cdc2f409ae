use std::sync::Arc;

use crate::client::{ApiClient, RequestOptions};
use crate::errors::ApiError;
use crate::models::notification::{Notification, UnreadCount};
use crate::models::Empty;

pub struct NotificationService {
    api: Arc<ApiClient>,
}

impl NotificationService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self, unread_only: bool) -> Result<Vec<Notification>, ApiError> {
        let mut opts = RequestOptions::get();
        if unread_only {
            opts = opts.query("unread_only", true);
        }
        self.api.get_json("/notifications", opts).await
    }

    pub async fn unread_count(&self) -> Result<u64, ApiError> {
        let count: UnreadCount = self
            .api
            .get_json("/notifications/unread-count", RequestOptions::get())
            .await?;
        Ok(count.count)
    }

    pub async fn mark_read(&self, id: i64) -> Result<(), ApiError> {
        let url = self.api.build_url(&format!("/notifications/{}/read", id));
        self.api.fetch_json::<Empty>(&url, &RequestOptions::put()).await?;
        Ok(())
    }

    pub async fn mark_all_read(&self) -> Result<(), ApiError> {
        let url = self.api.build_url("/notifications/read-all");
        self.api.fetch_json::<Empty>(&url, &RequestOptions::put()).await?;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let url = self.api.build_url(&format!("/notifications/{}", id));
        self.api.fetch_json::<Empty>(&url, &RequestOptions::delete()).await?;
        Ok(())
    }
}
