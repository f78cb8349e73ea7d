mod articles;
mod players;
mod teams;
mod users;

pub use articles::{AdminArticles, ArticleSummary};
pub use players::{AdminPlayers, PlayerSummary};
pub use teams::{AdminTeams, TeamSummary};
pub use users::{AdminUsers, ChangeUserPasswordRequest, UserSummary};

use serde_json::Value;
use std::sync::Arc;

use crate::api::{
    http::HttpClient,
    types::{ApiResponse, ApiResult},
};

/// Admin panel endpoints under `admin/`. Every call needs a staff token.
#[derive(Clone)]
pub struct AdminApi {
    client: Arc<HttpClient>,
    pub articles: AdminArticles,
    pub players: AdminPlayers,
    pub teams: AdminTeams,
    pub users: AdminUsers,
}

impl AdminApi {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self {
            articles: AdminArticles::new(client.clone()),
            players: AdminPlayers::new(client.clone()),
            teams: AdminTeams::new(client.clone()),
            users: AdminUsers::new(client.clone()),
            client,
        }
    }

    /// Position keys mapped to their display names, with `""` meaning all.
    pub async fn player_positions(&self) -> ApiResult<ApiResponse<Value>> {
        self.client.get("admin/player-positions/").await
    }

    /// Teams, types and statuses offered by the article filters and forms.
    pub async fn article_filter_data(&self) -> ApiResult<ApiResponse<Value>> {
        self.client.get("admin/article-filter-data/").await
    }
}
