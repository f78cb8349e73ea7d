use std::sync::Arc;

use serde_json::Value;
use tam_core::common_types::{Page, PagingContext};

use crate::api::{
    http::HttpClient,
    types::{ApiResponse, ApiResult},
};

/// Public site content under `blog/`.
#[derive(Clone)]
pub struct BlogApi {
    client: Arc<HttpClient>,
}

impl BlogApi {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Slider, latest news, videos, players and teams for the home page.
    pub async fn home_data(&self) -> ApiResult<ApiResponse<Value>> {
        self.client.get("blog/home-datas/").await
    }

    pub async fn articles(&self, paging: &PagingContext) -> ApiResult<ApiResponse<Page<Value>>> {
        self.client.get_with_query("blog/articles/", paging.to_query()).await
    }

    pub async fn article(&self, slug: &str) -> ApiResult<ApiResponse<Value>> {
        self.client.get(&format!("blog/articles/{}/", slug)).await
    }

    /// Likes the article, or takes the like back if the caller already liked it.
    pub async fn toggle_like(&self, slug: &str) -> ApiResult<ApiResponse<Value>> {
        self.client.get(&format!("blog/article-like/{}/", slug)).await
    }

    /// View and publishing statistics for the admin dashboard.
    pub async fn dashboard_data(&self) -> ApiResult<ApiResponse<Value>> {
        self.client.get("admin/admin-dashboard-data/").await
    }
}
