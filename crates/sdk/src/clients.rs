use std::{sync::Arc, time::Duration};

use tam_core::{ApiConfig, common_types::Locale};

use crate::{
    api::{AdminApi, ApiBaseConfig, ApiResult, AuthenticationApi, BlogApi, http::HttpClient},
    request::AuthHttp,
    session::{NoopSessionListener, SessionListener},
    token_store::{MemoryTokenStore, TokenStore},
};

#[derive(Debug, Clone)]
pub struct CreateClientConfig {
    pub server_url: String,
    pub locale: Locale,
    pub timeout: Option<Duration>,
}

impl CreateClientConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self { server_url: server_url.into(), locale: Locale::default(), timeout: None }
    }
}

impl From<&ApiConfig> for CreateClientConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            server_url: config.base_url.clone(),
            locale: config.locale,
            timeout: config.timeout(),
        }
    }
}

/// Entry point: one shared token pair behind every API group.
#[derive(Clone)]
pub struct Client {
    http: Arc<HttpClient>,
    authentication_api: AuthenticationApi,
    blog_api: BlogApi,
    admin_api: AdminApi,
}

impl Client {
    pub fn new(
        config: CreateClientConfig,
        token_store: Arc<dyn TokenStore>,
        session_listener: Arc<dyn SessionListener>,
    ) -> ApiResult<Self> {
        let mut base_config = ApiBaseConfig::new(config.server_url).with_locale(config.locale);
        if let Some(timeout) = config.timeout {
            base_config = base_config.with_timeout(timeout);
        }

        let http = Arc::new(HttpClient::new(base_config, token_store, session_listener)?);

        Ok(Self {
            authentication_api: AuthenticationApi::new(Arc::clone(&http)),
            blog_api: BlogApi::new(Arc::clone(&http)),
            admin_api: AdminApi::new(Arc::clone(&http)),
            http,
        })
    }

    /// Client whose tokens live only as long as the process.
    pub fn in_memory(config: CreateClientConfig) -> ApiResult<Self> {
        Self::new(config, Arc::new(MemoryTokenStore::new()), Arc::new(NoopSessionListener))
    }

    pub fn auth(&self) -> &AuthenticationApi {
        &self.authentication_api
    }

    pub fn blog(&self) -> &BlogApi {
        &self.blog_api
    }

    pub fn admin(&self) -> &AdminApi {
        &self.admin_api
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// A stateful request slot, optionally bound to a default URL.
    pub fn request(&self, url: Option<String>) -> AuthHttp {
        AuthHttp::new(self.http.as_ref().clone(), url)
    }
}

pub fn create_client(config: CreateClientConfig) -> ApiResult<Client> {
    Client::in_memory(config)
}
