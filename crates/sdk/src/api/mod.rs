mod admin;
mod authentication;
mod blog;
pub mod http;
mod types;

pub use admin::{
    AdminApi, AdminArticles, AdminPlayers, AdminTeams, AdminUsers, ArticleSummary,
    ChangeUserPasswordRequest, PlayerSummary, TeamSummary, UserSummary,
};
pub use authentication::{
    AuthenticationApi, ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest,
};
pub use blog::BlogApi;
pub use types::{
    ApiBaseConfig, ApiResponse, ApiResult, ApiSdkError, MultipartBody, RequestBody,
};
