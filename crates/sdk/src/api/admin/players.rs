use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tam_core::common_types::{Page, PagingContext};

use crate::api::{
    http::HttpClient,
    types::{ApiResponse, ApiResult, MultipartBody},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: u64,
    pub name: Value,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub goals: Option<u32>,
    #[serde(default)]
    pub games: Option<u32>,
}

#[derive(Clone)]
pub struct AdminPlayers {
    client: Arc<HttpClient>,
}

impl AdminPlayers {
    pub(crate) fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Use a `position` filter on `paging` to narrow by position key.
    pub async fn list(&self, paging: &PagingContext) -> ApiResult<ApiResponse<Page<PlayerSummary>>> {
        self.client.get_with_query("admin/players/", paging.to_query()).await
    }

    pub async fn get(&self, id: u64) -> ApiResult<ApiResponse<Value>> {
        self.client.get(&format!("admin/player-detail/{}/", id)).await
    }

    pub async fn create(&self, form: MultipartBody) -> ApiResult<ApiResponse<Value>> {
        self.client.post_multipart("admin/player-create/", form).await
    }

    pub async fn update(&self, id: u64, form: MultipartBody) -> ApiResult<ApiResponse<Value>> {
        self.client.patch_multipart(&format!("admin/player-update/{}/", id), form).await
    }

    pub async fn delete(&self, id: u64) -> ApiResult<ApiResponse<()>> {
        self.client.delete_status(&format!("admin/player-delete/{}/", id)).await
    }
}
