use std::time::Duration;

use reqwest::{StatusCode, header::InvalidHeaderValue, multipart};
use serde::Serialize;
use serde_json::Value;
use tam_core::{ApiConfig, common_types::{ErrorContent, Locale}};
use thiserror::Error;

use crate::token_store::TokenStoreError;

#[derive(Debug, Clone)]
pub struct ApiBaseConfig {
    /// Root of the REST API, endpoints are joined onto it.
    pub server_url: String,
    pub locale: Locale,
    pub timeout: Option<Duration>,
}

impl ApiBaseConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self { server_url: server_url.into(), locale: Locale::default(), timeout: None }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl From<&ApiConfig> for ApiBaseConfig {
    fn from(config: &ApiConfig) -> Self {
        Self { server_url: config.base_url.clone(), locale: config.locale, timeout: config.timeout() }
    }
}

#[derive(Error, Debug)]
pub enum ApiSdkError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Token store error: {0}")]
    TokenStore(#[from] TokenStoreError),

    /// The access token expired and no new one could be obtained.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The backend rejected the token outright; the session was cleared.
    #[error("Session invalidated: {content}")]
    SessionInvalidated { content: ErrorContent },

    /// The request was still rejected as expired after a successful refresh.
    #[error("Access token still expired after refresh, sign in again")]
    ReauthenticationRequired,

    #[error("Request cancelled")]
    Cancelled,
}

pub type ApiResult<T> = Result<T, ApiSdkError>;

/// Outcome of a request that reached the backend.
///
/// HTTP-level failures are values, not errors, so callers can render the
/// backend's field messages inline.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Success(T),
    Failure { status: StatusCode, content: ErrorContent },
}

impl<T> ApiResponse<T> {
    pub fn is_error(&self) -> bool {
        matches!(self, ApiResponse::Failure { .. })
    }

    pub fn ok(self) -> Option<T> {
        match self {
            ApiResponse::Success(data) => Some(data),
            ApiResponse::Failure { .. } => None,
        }
    }

    pub fn error_content(&self) -> Option<&ErrorContent> {
        match self {
            ApiResponse::Success(_) => None,
            ApiResponse::Failure { content, .. } => Some(content),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiResponse::Success(_) => None,
            ApiResponse::Failure { status, .. } => Some(*status),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        match self {
            ApiResponse::Success(data) => ApiResponse::Success(f(data)),
            ApiResponse::Failure { status, content } => ApiResponse::Failure { status, content },
        }
    }

    pub fn into_result(self) -> Result<T, ErrorContent> {
        match self {
            ApiResponse::Success(data) => Ok(data),
            ApiResponse::Failure { content, .. } => Err(content),
        }
    }
}

#[derive(Debug, Clone)]
enum MultipartPart {
    Text { name: String, value: String },
    File { name: String, file_name: String, mime: Option<String>, bytes: Vec<u8> },
}

/// A multipart form kept as plain parts so it can be rebuilt for the retry
/// that follows a token refresh.
#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    parts: Vec<MultipartPart>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(MultipartPart::Text { name: name.into(), value: value.into() });
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        mime: Option<&str>,
    ) -> Self {
        self.parts.push(MultipartPart::File {
            name: name.into(),
            file_name: file_name.into(),
            mime: mime.map(str::to_string),
            bytes,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub(crate) fn to_form(&self) -> ApiResult<multipart::Form> {
        let mut form = multipart::Form::new();
        for part in &self.parts {
            form = match part {
                MultipartPart::Text { name, value } => form.text(name.clone(), value.clone()),
                MultipartPart::File { name, file_name, mime, bytes } => {
                    let mut file = multipart::Part::bytes(bytes.clone()).file_name(file_name.clone());
                    if let Some(mime) = mime {
                        file = file.mime_str(mime)?;
                    }
                    form.part(name.clone(), file)
                }
            };
        }
        Ok(form)
    }
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(Value),
    Multipart(MultipartBody),
}

impl RequestBody {
    pub fn json<B: Serialize + ?Sized>(body: &B) -> ApiResult<Self> {
        Ok(RequestBody::Json(serde_json::to_value(body)?))
    }

    pub fn is_json(&self) -> bool {
        matches!(self, RequestBody::Json(_))
    }
}

impl From<Value> for RequestBody {
    fn from(body: Value) -> Self {
        RequestBody::Json(body)
    }
}

impl From<MultipartBody> for RequestBody {
    fn from(body: MultipartBody) -> Self {
        RequestBody::Multipart(body)
    }
}
