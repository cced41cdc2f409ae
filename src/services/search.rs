use std::sync::Arc;

use crate::client::{ApiClient, RequestOptions};
use crate::errors::ApiError;
use crate::models::search::SearchResults;

pub struct SearchService {
    api: Arc<ApiClient>,
}

impl SearchService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Blank queries return no results without a round trip.
    pub async fn search(&self, query: &str, limit: Option<u32>) -> Result<SearchResults, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchResults::default());
        }

        let mut opts = RequestOptions::get().query("q", query);
        if let Some(limit) = limit {
            opts = opts.query("limit", limit);
        }
        self.api.get_json("/search", opts).await
    }
}
