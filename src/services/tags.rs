use std::sync::Arc;

use crate::client::{ApiClient, RequestOptions};
use crate::errors::ApiError;
use crate::models::tag::{Tag, TagInput};
use crate::models::Empty;

pub struct TagService {
    api: Arc<ApiClient>,
}

impl TagService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Tag>, ApiError> {
        self.api.get_json("/tags", RequestOptions::get()).await
    }

    pub async fn create(&self, input: &TagInput) -> Result<Tag, ApiError> {
        let url = self.api.build_url("/tags");
        self.api.fetch_json(&url, &RequestOptions::post().json(input)?).await
    }

    pub async fn update(&self, id: i64, input: &TagInput) -> Result<Tag, ApiError> {
        let url = self.api.build_url(&format!("/tags/{}", id));
        self.api.fetch_json(&url, &RequestOptions::put().json(input)?).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let url = self.api.build_url(&format!("/tags/{}", id));
        self.api.fetch_json::<Empty>(&url, &RequestOptions::delete()).await?;
        Ok(())
    }
}
