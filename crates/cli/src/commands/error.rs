use tam::{ApiSdkError, TokenStoreError};
use tam_core::ReadYamlError;
use thiserror::Error;

/// Errors that can occur during sign-in and session management
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Sign in rejected: {0}")]
    Rejected(String),

    #[error("Not signed in, run `tam auth login` first")]
    NotSignedIn,

    #[error("SDK API error: {0}")]
    SdkApi(#[from] ApiSdkError),

    #[error("Token store error: {0}")]
    TokenStore(#[from] TokenStoreError),

    #[error("Terminal interaction failed: {0}")]
    Terminal(#[from] dialoguer::Error),
}

/// Errors that can occur while sending a raw request
#[derive(Error, Debug)]
pub enum RequestCommandError {
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("Request body is not valid JSON: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("Request failed with status {0}")]
    Failed(u16),

    #[error("SDK API error: {0}")]
    SdkApi(#[from] ApiSdkError),
}

/// Errors that can occur while listing admin resources
#[derive(Error, Debug)]
pub enum ListError {
    #[error("Filter must be key=value, got '{0}'")]
    InvalidFilter(String),

    #[error("Listing failed: {0}")]
    Failed(String),

    #[error("SDK API error: {0}")]
    SdkApi(#[from] ApiSdkError),
}

/// Errors that can occur while resolving the project configuration
#[derive(Error, Debug)]
pub enum ProjectLocationError {
    #[error("Failed to read tam.yaml: {0}")]
    Yaml(#[from] ReadYamlError),
}
