mod api;
mod clients;
mod request;
mod session;
mod token_store;

pub use api::{
    AdminApi, AdminArticles, AdminPlayers, AdminTeams, AdminUsers, ApiBaseConfig, ApiResponse,
    ApiResult, ApiSdkError, ArticleSummary, AuthenticationApi, BlogApi, ChangePasswordRequest,
    ChangeUserPasswordRequest, LoginRequest, LoginResponse, MultipartBody, PlayerSummary,
    RegisterRequest, RequestBody, TeamSummary, UserSummary,
    http::{ApiRequest, HttpClient, RequestPhase},
};
pub use clients::{Client, CreateClientConfig, create_client};
pub use request::{AuthHttp, RequestError, RequestState};
pub use session::{NoopSessionListener, SessionEvent, SessionListener};
pub use tam_core::{
    authentication::types::TokenPair,
    common_types::{ErrorContent, Locale, Page, PagingContext, TokenFailure},
};
pub use token_store::{MemoryTokenStore, TokenStore, TokenStoreError};
