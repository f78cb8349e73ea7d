use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tam_core::common_types::{Page, PagingContext};

use crate::api::{
    http::HttpClient,
    types::{ApiResponse, ApiResult, MultipartBody},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub id: u64,
    pub name: Value,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Clone)]
pub struct AdminTeams {
    client: Arc<HttpClient>,
}

impl AdminTeams {
    pub(crate) fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self, paging: &PagingContext) -> ApiResult<ApiResponse<Page<TeamSummary>>> {
        self.client.get_with_query("admin/team-list/", paging.to_query()).await
    }

    pub async fn get(&self, id: u64) -> ApiResult<ApiResponse<Value>> {
        self.client.get(&format!("admin/team-detail/{}/", id)).await
    }

    pub async fn create(&self, form: MultipartBody) -> ApiResult<ApiResponse<Value>> {
        self.client.post_multipart("admin/team-create/", form).await
    }

    pub async fn update(&self, id: u64, form: MultipartBody) -> ApiResult<ApiResponse<Value>> {
        self.client.patch_multipart(&format!("admin/team-update/{}/", id), form).await
    }

    pub async fn delete(&self, id: u64) -> ApiResult<ApiResponse<()>> {
        self.client.delete_status(&format!("admin/team-delete/{}/", id)).await
    }
}
