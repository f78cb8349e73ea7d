use reqwest::Method;
use serde_json::Value;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::api::{
    ApiResponse, ApiResult, ApiSdkError, RequestBody,
    http::{ApiRequest, HttpClient},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestError {
    pub is_error: bool,
    pub error_content: Option<Value>,
}

/// What a caller renders while and after a request runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestState {
    pub is_loading: bool,
    pub data: Option<Value>,
    pub error: RequestError,
}

/// A request slot owned by one view: remembers a default URL, tracks
/// [`RequestState`] for the latest call and cancels whatever is in flight
/// when dropped.
///
/// Calls are independent apart from the shared token pair; the state is
/// reset at the start of every call.
pub struct AuthHttp {
    client: HttpClient,
    url: Option<String>,
    state: watch::Sender<RequestState>,
    cancel: CancellationToken,
}

impl AuthHttp {
    pub fn new(client: HttpClient, url: Option<String>) -> Self {
        let (state, _) = watch::channel(RequestState::default());
        Self { client, url, state, cancel: CancellationToken::new() }
    }

    pub fn state(&self) -> RequestState {
        self.state.borrow().clone()
    }

    /// Receives every state transition, starting from the current state.
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn data(&self) -> Option<Value> {
        self.state.borrow().data.clone()
    }

    pub fn is_error(&self) -> bool {
        self.state.borrow().error.is_error
    }

    pub fn error_content(&self) -> Option<Value> {
        self.state.borrow().error.error_content.clone()
    }

    /// Aborts in-flight calls. Later calls on this handle fail with
    /// [`ApiSdkError::Cancelled`].
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// GETs the default URL, the equivalent of loading on mount.
    pub async fn load(&self) -> ApiResult<ApiResponse<Value>> {
        self.send_request(None, None, None).await
    }

    /// Sends to `url` (or the default URL) with `method` (default GET).
    pub async fn send_request(
        &self,
        url: Option<&str>,
        method: Option<Method>,
        body: Option<RequestBody>,
    ) -> ApiResult<ApiResponse<Value>> {
        let endpoint = match url.or(self.url.as_deref()) {
            Some(endpoint) => endpoint.to_string(),
            None => {
                return Err(ApiSdkError::ConfigError(
                    "no url given and no default url set".to_string(),
                ));
            }
        };

        let mut request = ApiRequest::new(method.unwrap_or(Method::GET), endpoint);
        request.body = body;

        self.state.send_replace(RequestState { is_loading: true, ..RequestState::default() });

        let result = self.client.send_request(&request, &self.cancel).await;

        self.state.send_modify(|state| {
            state.is_loading = false;
            match &result {
                Ok(ApiResponse::Success(data)) => state.data = Some(data.clone()),
                Ok(ApiResponse::Failure { content, .. }) => {
                    state.error =
                        RequestError { is_error: true, error_content: Some(content.body().clone()) }
                }
                Err(e) => {
                    state.error = RequestError {
                        is_error: true,
                        error_content: Some(Value::String(e.to_string())),
                    }
                }
            }
        });

        result
    }
}

impl Drop for AuthHttp {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
