use std::sync::Arc;

use crate::client::{ApiClient, RequestOptions};
use crate::errors::ApiError;
use crate::models::category::{Category, CategoryInput};
use crate::models::Empty;

pub struct CategoryService {
    api: Arc<ApiClient>,
}

impl CategoryService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Category>, ApiError> {
        self.api.get_json("/categories", RequestOptions::get()).await
    }

    pub async fn create(&self, input: &CategoryInput) -> Result<Category, ApiError> {
        let url = self.api.build_url("/categories");
        self.api.fetch_json(&url, &RequestOptions::post().json(input)?).await
    }

    pub async fn update(&self, id: i64, input: &CategoryInput) -> Result<Category, ApiError> {
        let url = self.api.build_url(&format!("/categories/{}", id));
        self.api.fetch_json(&url, &RequestOptions::put().json(input)?).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let url = self.api.build_url(&format!("/categories/{}", id));
        self.api.fetch_json::<Empty>(&url, &RequestOptions::delete()).await?;
        Ok(())
    }
}
