use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tam_core::common_types::{Page, PagingContext};

use crate::api::{
    http::HttpClient,
    types::{ApiResponse, ApiResult, MultipartBody},
};

/// Row of the admin news table. Bilingual fields keep the backend's shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: u64,
    pub title: Value,
    pub status: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub team: Option<Value>,
    #[serde(default)]
    pub hits_count: u64,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub updated_date: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
}

#[derive(Clone)]
pub struct AdminArticles {
    client: Arc<HttpClient>,
}

impl AdminArticles {
    pub(crate) fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        paging: &PagingContext,
    ) -> ApiResult<ApiResponse<Page<ArticleSummary>>> {
        self.client.get_with_query("admin/articles/", paging.to_query()).await
    }

    pub async fn get(&self, id: u64) -> ApiResult<ApiResponse<Value>> {
        self.client.get(&format!("admin/article-detail/{}/", id)).await
    }

    /// Articles carry a cover image, so they are sent as multipart forms.
    pub async fn create(&self, form: MultipartBody) -> ApiResult<ApiResponse<Value>> {
        self.client.post_multipart("admin/article-create/", form).await
    }

    pub async fn update(&self, id: u64, form: MultipartBody) -> ApiResult<ApiResponse<Value>> {
        self.client.patch_multipart(&format!("admin/article-update/{}/", id), form).await
    }

    pub async fn delete(&self, id: u64) -> ApiResult<ApiResponse<()>> {
        self.client.delete_status(&format!("admin/article-delete/{}/", id)).await
    }
}
