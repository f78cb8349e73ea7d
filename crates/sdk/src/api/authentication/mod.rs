use std::sync::Arc;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tam_core::authentication::{peek_claims, types::TokenPair};
use tracing::{info, warn};

use crate::api::{
    http::{ApiRequest, HttpClient},
    types::{ApiResponse, ApiResult, RequestBody},
};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub phone_number: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub phone_number: String,
    pub password: String,
    pub password1: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Sign-in, sign-up and account endpoints under `auth/`.
#[derive(Clone)]
pub struct AuthenticationApi {
    client: Arc<HttpClient>,
}

impl AuthenticationApi {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Exchanges credentials for a token pair and stores it.
    ///
    /// Bad credentials come back as a failure whose body carries `error`.
    pub async fn login(
        &self,
        phone_number: &str,
        password: &str,
    ) -> ApiResult<ApiResponse<LoginResponse>> {
        let body = LoginRequest {
            phone_number: phone_number.to_string(),
            password: password.to_string(),
        };
        let response: ApiResponse<LoginResponse> = self
            .client
            .send(
                ApiRequest::post("auth/get-access-token/")
                    .with_body(RequestBody::json(&body)?)
                    .anonymous(),
            )
            .await?;

        if let ApiResponse::Success(login) = &response {
            self.client
                .store_tokens(TokenPair::new(login.access.clone(), login.refresh.clone()))
                .await?;
            info!("Signed in as {}", phone_number);
        }

        Ok(response)
    }

    /// Drops the stored token pair. The backend keeps no session to end.
    pub async fn logout(&self) -> ApiResult<()> {
        self.client.clear_session().await
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<ApiResponse<Value>> {
        self.client
            .send(ApiRequest::post("auth/register/").with_body(RequestBody::json(request)?).anonymous())
            .await
    }

    /// Asks the backend to text a one-time code to `phone_number`.
    pub async fn send_otp(&self, phone_number: &str) -> ApiResult<ApiResponse<Value>> {
        self.client
            .send(
                ApiRequest::post("auth/otp_code/")
                    .with_query(vec![("send".to_string(), "true".to_string())])
                    .with_body(json!({ "phone_number": phone_number }))
                    .anonymous(),
            )
            .await
    }

    /// Verifies a one-time code. With `reset_password` the code unlocks a
    /// password reset instead of completing registration.
    pub async fn check_otp(
        &self,
        phone_number: &str,
        code: &str,
        reset_password: bool,
    ) -> ApiResult<ApiResponse<Value>> {
        let mut request = ApiRequest::post("auth/otp_code/")
            .with_body(json!({ "phone_number": phone_number, "code": code }))
            .anonymous();
        if reset_password {
            request = request.with_query(vec![("reset_password".to_string(), "true".to_string())]);
        }

        self.client.send(request).await
    }

    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> ApiResult<ApiResponse<Value>> {
        self.client.post("auth/change_password/", request).await
    }

    pub async fn user_info(&self) -> ApiResult<ApiResponse<Value>> {
        self.client.get("auth/user/").await
    }

    pub async fn update_profile(&self, profile: &Value) -> ApiResult<ApiResponse<Value>> {
        self.client.patch("auth/profile/", profile).await
    }

    /// Whether the signed-in user may open the admin panel.
    ///
    /// 403 means no; any other failure is logged and also treated as no.
    pub async fn has_admin_access(&self) -> ApiResult<bool> {
        match self.client.get::<Value>("auth/admin-access/").await? {
            ApiResponse::Success(_) => Ok(true),
            ApiResponse::Failure { status, .. } if status == StatusCode::FORBIDDEN => Ok(false),
            ApiResponse::Failure { status, content } => {
                warn!("Failed to check admin access ({}): {}", status, content);
                Ok(false)
            }
        }
    }

    /// Refreshes the stored token pair now.
    pub async fn refresh(&self) -> ApiResult<TokenPair> {
        self.client.refresh().await
    }

    /// Whether the stored access token belongs to a user. Reads the token
    /// locally; the backend may still reject it.
    pub async fn is_authenticated(&self) -> ApiResult<bool> {
        let Some(tokens) = self.client.token_store().get().await? else {
            return Ok(false);
        };

        match peek_claims(&tokens.access) {
            Ok(claims) => Ok(claims.user_id.is_some()),
            Err(e) => {
                warn!("Stored access token is unreadable, discarding it: {}", e);
                self.client.token_store().clear().await?;
                Ok(false)
            }
        }
    }
}
