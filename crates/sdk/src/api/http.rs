use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use reqwest::{
    Client, Method, RequestBuilder, StatusCode,
    header::{ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tam_core::{
    authentication::types::TokenPair,
    common_types::{ErrorContent, TokenFailure},
};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    api::types::{
        ApiBaseConfig, ApiResponse, ApiResult, ApiSdkError, MultipartBody, RequestBody,
    },
    session::{SessionEvent, SessionListener},
    token_store::TokenStore,
};

const REFRESH_ENDPOINT: &str = "auth/get-refresh-token/";

/// Where a single call is in its lifecycle.
///
/// `Sending → Success | Failed`, or on an expired token
/// `Sending → AwaitingRefresh → Retrying → Success | Failed`. The refresh
/// branch is taken at most once per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Sending,
    AwaitingRefresh,
    Retrying,
    Success,
    Failed,
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestPhase::Sending => "sending",
            RequestPhase::AwaitingRefresh => "awaiting-refresh",
            RequestPhase::Retrying => "retrying",
            RequestPhase::Success => "success",
            RequestPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API root, or an absolute http(s) URL.
    pub endpoint: String,
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    /// Applied over the defaults; `Authorization` is always set last.
    pub headers: Option<HeaderMap>,
    /// Sent without a bearer token and never refreshed, for sign-in and sign-up.
    pub anonymous: bool,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            query: Vec::new(),
            body: None,
            headers: None,
            anonymous: false,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PATCH, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    pub fn with_body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query.extend(query);
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }
}

struct RawResponse {
    status: StatusCode,
    content: Value,
    /// The body was present but not JSON.
    malformed: bool,
}

impl RawResponse {
    fn token_failure(&self) -> Option<TokenFailure> {
        if self.status != StatusCode::UNAUTHORIZED {
            return None;
        }

        ErrorContent::new(self.content.clone()).token_failure()
    }

    fn into_response(self) -> ApiResponse<Value> {
        // Every 404 reads the same, whatever page the server rendered.
        if self.status == StatusCode::NOT_FOUND {
            return ApiResponse::Failure {
                status: self.status,
                content: ErrorContent::page_not_found(),
            };
        }

        if self.malformed {
            return ApiResponse::Failure { status: self.status, content: ErrorContent::invalid_json() };
        }

        if self.status.is_success() {
            return ApiResponse::Success(self.content);
        }

        ApiResponse::Failure { status: self.status, content: ErrorContent::new(self.content) }
    }
}

/// Held behind the refresh guard.
#[derive(Debug, Default)]
struct RefreshState {
    /// Why the latest attempt failed; cleared by a successful one.
    last_failure: Option<String>,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

/// Sends requests with the stored bearer token and recovers once from an
/// expired access token.
///
/// Clones share the token store, the session listener and the refresh
/// guard, so concurrent calls that all hit an expired token trigger a single
/// refresh between them, and share its failure as well as its success.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_config: ApiBaseConfig,
    token_store: Arc<dyn TokenStore>,
    session_listener: Arc<dyn SessionListener>,
    refresh_guard: Arc<Mutex<RefreshState>>,
    /// Completed refresh attempts, bumped while the guard is held.
    refresh_attempts: Arc<AtomicU64>,
}

impl HttpClient {
    pub fn new(
        base_config: ApiBaseConfig,
        token_store: Arc<dyn TokenStore>,
        session_listener: Arc<dyn SessionListener>,
    ) -> ApiResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = base_config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_config,
            token_store,
            session_listener,
            refresh_guard: Arc::new(Mutex::new(RefreshState::default())),
            refresh_attempts: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn base_config(&self) -> &ApiBaseConfig {
        &self.base_config
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.token_store
    }

    fn notify(&self, event: SessionEvent) {
        debug!("Session event: {:?}", event);
        self.session_listener.on_event(event);
    }

    pub async fn store_tokens(&self, tokens: TokenPair) -> ApiResult<()> {
        self.token_store.set(tokens).await?;
        Ok(())
    }

    /// Forgets the stored tokens and reports [`SessionEvent::LoggedOut`].
    pub async fn clear_session(&self) -> ApiResult<()> {
        self.token_store.clear().await?;
        self.notify(SessionEvent::LoggedOut);
        Ok(())
    }

    fn build_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }

        format!(
            "{}/{}",
            self.base_config.server_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    fn build_headers(&self, request: &ApiRequest, access: Option<&str>) -> ApiResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(self.base_config.locale.as_header_value()),
        );

        // reqwest writes the multipart boundary into Content-Type itself.
        if request.body.as_ref().is_none_or(RequestBody::is_json) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        if let Some(additional) = &request.headers {
            for (key, value) in additional {
                headers.insert(key.clone(), value.clone());
            }
        }

        if let Some(access) = access {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", access))?);
        }

        Ok(headers)
    }

    async fn read_response(builder: RequestBuilder) -> ApiResult<RawResponse> {
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(RawResponse { status, content: Value::Null, malformed: false });
        }

        match serde_json::from_slice(&bytes) {
            Ok(content) => Ok(RawResponse { status, content, malformed: false }),
            Err(e) => {
                warn!("Response with status {} is not JSON: {}", status, e);
                Ok(RawResponse { status, content: Value::Null, malformed: true })
            }
        }
    }

    async fn execute(
        &self,
        request: &ApiRequest,
        access: Option<&str>,
        cancel: &CancellationToken,
    ) -> ApiResult<RawResponse> {
        let url = self.build_url(&request.endpoint);
        let headers = self.build_headers(request, access)?;

        let mut builder = self.client.request(request.method.clone(), &url).headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match &request.body {
            Some(RequestBody::Json(body)) => builder.json(body),
            Some(RequestBody::Multipart(body)) => builder.multipart(body.to_form()?),
            None => builder,
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ApiSdkError::Cancelled),
            response = Self::read_response(builder) => response,
        }
    }

    /// Sends `request` and normalises the outcome.
    ///
    /// * 2xx resolves to [`ApiResponse::Success`] with the parsed body.
    /// * 401 "Token is expired" refreshes the token pair once and retries once.
    ///   A failed refresh is [`ApiSdkError::AuthenticationFailed`]; a retry
    ///   that is still expired is [`ApiSdkError::ReauthenticationRequired`].
    /// * 401 "Token is invalid" clears the store, reports
    ///   [`SessionEvent::LoggedOut`] and is [`ApiSdkError::SessionInvalidated`].
    /// * 404 resolves to [`ApiResponse::Failure`] with `{"detail": "page not found."}`.
    /// * A body that is not JSON resolves to [`ApiResponse::Failure`] with
    ///   `{"message": "Invalid JSON response from server."}`, even on 2xx.
    /// * Any other status resolves to [`ApiResponse::Failure`] with the body.
    ///
    /// Transport failures and cancellation are errors.
    pub async fn send_request(
        &self,
        request: &ApiRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<ApiResponse<Value>> {
        let url = self.build_url(&request.endpoint);
        let access = if request.anonymous {
            None
        } else {
            self.token_store.get().await?.map(|tokens| tokens.access)
        };

        debug!("{} {} -> {}", request.method, url, RequestPhase::Sending);
        let response = self.execute(request, access.as_deref(), cancel).await?;

        let token_failure = if request.anonymous { None } else { response.token_failure() };
        let response = match token_failure {
            None => response,
            Some(TokenFailure::Invalid) => return Err(self.invalidate_session(response).await),
            Some(TokenFailure::Expired) => {
                debug!("{} {} -> {}", request.method, url, RequestPhase::AwaitingRefresh);
                let tokens = self.refresh_expired(access.as_deref(), cancel).await?;

                debug!("{} {} -> {}", request.method, url, RequestPhase::Retrying);
                let retried = self.execute(request, Some(&tokens.access), cancel).await?;

                match retried.token_failure() {
                    None => retried,
                    Some(TokenFailure::Invalid) => {
                        return Err(self.invalidate_session(retried).await);
                    }
                    Some(TokenFailure::Expired) => {
                        warn!("{} {} still reports an expired token after refresh", request.method, url);
                        self.notify(SessionEvent::ReauthenticationRequired);
                        return Err(ApiSdkError::ReauthenticationRequired);
                    }
                }
            }
        };

        let response = response.into_response();
        let phase = if response.is_error() { RequestPhase::Failed } else { RequestPhase::Success };
        debug!("{} {} -> {}", request.method, url, phase);

        Ok(response)
    }

    async fn invalidate_session(&self, response: RawResponse) -> ApiSdkError {
        warn!("Backend rejected the access token as invalid, signing out");
        if let Err(e) = self.token_store.clear().await {
            return e.into();
        }
        self.notify(SessionEvent::LoggedOut);

        ApiSdkError::SessionInvalidated { content: ErrorContent::new(response.content) }
    }

    /// Obtains a fresh pair after `stale_access` was rejected as expired.
    ///
    /// Refreshes are serialised. A caller that waited behind another
    /// attempt reuses its outcome: the new pair if it succeeded, or the
    /// same [`ApiSdkError::AuthenticationFailed`] if it did not.
    async fn refresh_expired(
        &self,
        stale_access: Option<&str>,
        cancel: &CancellationToken,
    ) -> ApiResult<TokenPair> {
        let observed = self.refresh_attempts.load(Ordering::Acquire);
        let mut state = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ApiSdkError::Cancelled),
            guard = self.refresh_guard.lock() => guard,
        };

        let Some(current) = self.token_store.get().await? else {
            return Err(ApiSdkError::AuthenticationFailed("no refresh token stored".to_string()));
        };

        if stale_access.is_some_and(|stale| stale != current.access) {
            debug!("Token pair already refreshed by a concurrent request");
            return Ok(current);
        }

        if self.refresh_attempts.load(Ordering::Acquire) != observed {
            if let Some(reason) = &state.last_failure {
                debug!("Concurrent token refresh failed, not repeating it");
                return Err(ApiSdkError::AuthenticationFailed(reason.clone()));
            }
        }

        self.attempt_refresh(&mut state, &current).await
    }

    /// Runs one refresh under the guard and records its outcome.
    async fn attempt_refresh(
        &self,
        state: &mut RefreshState,
        current: &TokenPair,
    ) -> ApiResult<TokenPair> {
        let result = self.refresh_tokens(current).await;

        state.last_failure = match &result {
            Err(ApiSdkError::AuthenticationFailed(reason)) => Some(reason.clone()),
            _ => None,
        };
        self.refresh_attempts.fetch_add(1, Ordering::AcqRel);

        result
    }

    /// Exchanges the refresh token for a new pair and stores it.
    ///
    /// Not cancellable: once the backend has rotated the refresh token the
    /// new pair has to reach the store.
    async fn refresh_tokens(&self, current: &TokenPair) -> ApiResult<TokenPair> {
        let request = ApiRequest::post(REFRESH_ENDPOINT)
            .with_body(json!({ "refresh": current.refresh }))
            .anonymous();

        let response = match self.execute(&request, None, &CancellationToken::new()).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Token refresh request failed: {}", e);
                return Err(ApiSdkError::AuthenticationFailed(e.to_string()));
            }
        };

        if response.malformed || !response.status.is_success() {
            let content = match response.into_response() {
                ApiResponse::Failure { content, .. } => content,
                ApiResponse::Success(body) => ErrorContent::new(body),
            };
            warn!("Token refresh rejected: {}", content);
            return Err(ApiSdkError::AuthenticationFailed(content.summary()));
        }

        let refreshed: RefreshResponse = serde_json::from_value(response.content).map_err(|e| {
            ApiSdkError::AuthenticationFailed(format!("unexpected refresh response: {}", e))
        })?;

        if refreshed.access.is_empty() {
            return Err(ApiSdkError::AuthenticationFailed(
                "refresh response carried no access token".to_string(),
            ));
        }

        // simplejwt only returns a refresh token when rotation is enabled.
        let tokens = TokenPair {
            access: refreshed.access,
            refresh: refreshed.refresh.unwrap_or_else(|| current.refresh.clone()),
        };

        self.token_store.set(tokens.clone()).await?;
        self.notify(SessionEvent::TokensRefreshed);
        info!("Access token refreshed");

        Ok(tokens)
    }

    /// Refreshes the stored pair now, regardless of whether it has expired.
    pub async fn refresh(&self) -> ApiResult<TokenPair> {
        let mut state = self.refresh_guard.lock().await;

        let Some(current) = self.token_store.get().await? else {
            return Err(ApiSdkError::AuthenticationFailed("no refresh token stored".to_string()));
        };

        self.attempt_refresh(&mut state, &current).await
    }

    /// Sends `request` and decodes a successful body into `T`.
    pub async fn send<T>(&self, request: ApiRequest) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        let response = self.send_request(&request, &CancellationToken::new()).await?;

        match response {
            ApiResponse::Success(body) => Ok(ApiResponse::Success(serde_json::from_value(body)?)),
            ApiResponse::Failure { status, content } => Ok(ApiResponse::Failure { status, content }),
        }
    }

    pub async fn get<T>(&self, endpoint: &str) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        self.send(ApiRequest::get(endpoint)).await
    }

    pub async fn get_with_query<T>(
        &self,
        endpoint: &str,
        query: Vec<(String, String)>,
    ) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        self.send(ApiRequest::get(endpoint).with_query(query)).await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(ApiRequest::post(endpoint).with_body(RequestBody::json(body)?)).await
    }

    pub async fn patch<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(ApiRequest::patch(endpoint).with_body(RequestBody::json(body)?)).await
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(ApiRequest::put(endpoint).with_body(RequestBody::json(body)?)).await
    }

    pub async fn post_multipart<T>(
        &self,
        endpoint: &str,
        body: MultipartBody,
    ) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        self.send(ApiRequest::post(endpoint).with_body(body)).await
    }

    pub async fn patch_multipart<T>(
        &self,
        endpoint: &str,
        body: MultipartBody,
    ) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        self.send(ApiRequest::patch(endpoint).with_body(body)).await
    }

    /// DELETE; 204 responses decode as `()`.
    pub async fn delete_status(&self, endpoint: &str) -> ApiResult<ApiResponse<()>> {
        let response = self.send::<Value>(ApiRequest::delete(endpoint)).await?;
        Ok(response.map(|_| ()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{session::NoopSessionListener, token_store::MemoryTokenStore};
    use reqwest::header::HeaderName;
    use tam_core::common_types::Locale;

    fn client(server_url: &str, tokens: Option<TokenPair>) -> HttpClient {
        let store = match tokens {
            Some(tokens) => MemoryTokenStore::with_tokens(tokens),
            None => MemoryTokenStore::new(),
        };
        HttpClient::new(
            ApiBaseConfig::new(server_url).with_locale(Locale::En),
            Arc::new(store),
            Arc::new(NoopSessionListener),
        )
        .unwrap()
    }

    #[test]
    fn test_build_url_joins_and_passes_absolute_urls() {
        let client = client("http://localhost:8000/api/", None);

        assert_eq!(client.build_url("/admin/players/"), "http://localhost:8000/api/admin/players/");
        assert_eq!(client.build_url("blog/articles/"), "http://localhost:8000/api/blog/articles/");
        assert_eq!(
            client.build_url("https://cdn.example/api/blog/home-datas/"),
            "https://cdn.example/api/blog/home-datas/"
        );
    }

    #[test]
    fn test_headers_bearer_is_applied_after_overrides() {
        let client = client("http://localhost:8000/api", None);
        let mut overrides = HeaderMap::new();
        overrides.insert(AUTHORIZATION, HeaderValue::from_static("Bearer forged"));
        overrides.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("fa"));
        overrides.insert(HeaderName::from_static("x-client"), HeaderValue::from_static("cli"));
        let request = ApiRequest::get("auth/user/").with_headers(overrides);

        let headers = client.build_headers(&request, Some("real-token")).unwrap();

        assert_eq!(headers[AUTHORIZATION], "Bearer real-token");
        assert_eq!(headers[ACCEPT_LANGUAGE], "fa");
        assert_eq!(headers["x-client"], "cli");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_headers_without_token_or_for_multipart() {
        let client = client("http://localhost:8000/api", None);
        let request = ApiRequest::post("admin/team-create/")
            .with_body(MultipartBody::new().text("name_fa", "استقلال"));

        let headers = client.build_headers(&request, None).unwrap();

        assert!(!headers.contains_key(AUTHORIZATION));
        assert!(!headers.contains_key(CONTENT_TYPE));
        assert_eq!(headers[ACCEPT_LANGUAGE], "en");
    }

    #[test]
    fn test_raw_response_normalisation() {
        let not_found = RawResponse {
            status: StatusCode::NOT_FOUND,
            content: json!({ "detail": "No Player matches the given query." }),
            malformed: false,
        };
        assert_eq!(
            not_found.into_response(),
            ApiResponse::Failure {
                status: StatusCode::NOT_FOUND,
                content: ErrorContent::page_not_found()
            }
        );

        let html_not_found =
            RawResponse { status: StatusCode::NOT_FOUND, content: Value::Null, malformed: true };
        assert_eq!(html_not_found.into_response().error_content(), Some(&ErrorContent::page_not_found()));

        let garbage = RawResponse { status: StatusCode::OK, content: Value::Null, malformed: true };
        assert_eq!(garbage.into_response().error_content(), Some(&ErrorContent::invalid_json()));

        let expired = RawResponse {
            status: StatusCode::UNAUTHORIZED,
            content: json!({ "messages": [{ "message": "Token is expired" }] }),
            malformed: false,
        };
        assert_eq!(expired.token_failure(), Some(TokenFailure::Expired));

        let forbidden = RawResponse {
            status: StatusCode::FORBIDDEN,
            content: json!({ "messages": [{ "message": "Token is expired" }] }),
            malformed: false,
        };
        assert_eq!(forbidden.token_failure(), None);
    }
}
