use thiserror::Error;

use crate::commands::error::{AuthError, ListError, ProjectLocationError, RequestCommandError};

/// Top-level CLI error that composes all module-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Request error: {0}")]
    Request(#[from] RequestCommandError),

    #[error("Listing error: {0}")]
    List(#[from] ListError),

    #[error("Project configuration error: {0}")]
    ProjectLocation(#[from] ProjectLocationError),

    #[error("Token store error: {0}")]
    TokenStore(#[from] tam::TokenStoreError),

    #[error("SDK API error: {0}")]
    SdkApi(#[from] tam::ApiSdkError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<String> for CliError {
    fn from(err: String) -> Self {
        CliError::Internal(err)
    }
}
