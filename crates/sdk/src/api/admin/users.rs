use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tam_core::common_types::{Page, PagingContext};

use crate::api::{
    http::{ApiRequest, HttpClient},
    types::{ApiResponse, ApiResult},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: u64,
    pub phone_number: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub permissions: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangeUserPasswordRequest {
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Clone)]
pub struct AdminUsers {
    client: Arc<HttpClient>,
}

impl AdminUsers {
    pub(crate) fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Use a `type` filter on `paging` to narrow by role.
    pub async fn list(&self, paging: &PagingContext) -> ApiResult<ApiResponse<Page<UserSummary>>> {
        self.client.get_with_query("admin/user-list/", paging.to_query()).await
    }

    pub async fn get(&self, id: u64) -> ApiResult<ApiResponse<Value>> {
        self.client.get(&format!("admin/user-detail/{}/", id)).await
    }

    pub async fn create(&self, user: &Value) -> ApiResult<ApiResponse<Value>> {
        self.client.post("admin/user-create/", user).await
    }

    pub async fn update(&self, id: u64, changes: &Value) -> ApiResult<ApiResponse<Value>> {
        self.client.patch(&format!("admin/user-update/{}/", id), changes).await
    }

    /// Activates or deactivates an account.
    ///
    /// Deactivating your own account first answers with
    /// `self_deactivation_pending`; repeat with `force` to confirm.
    pub async fn set_active(
        &self,
        id: u64,
        is_active: bool,
        force: bool,
    ) -> ApiResult<ApiResponse<Value>> {
        let mut request = ApiRequest::patch(format!("admin/user-deactivate/{}/", id))
            .with_body(json!({ "is_active": is_active }));
        if force {
            request = request.with_query(vec![("force_deactivate".to_string(), "true".to_string())]);
        }

        self.client.send(request).await
    }

    pub async fn change_password(
        &self,
        id: u64,
        request: &ChangeUserPasswordRequest,
    ) -> ApiResult<ApiResponse<Value>> {
        self.client.patch(&format!("admin/user-change-password/{}/", id), request).await
    }

    pub async fn permissions(&self) -> ApiResult<ApiResponse<Value>> {
        self.client.get("admin/user-permissions-list/").await
    }
}
