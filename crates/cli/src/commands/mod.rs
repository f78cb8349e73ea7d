pub mod auth;
pub mod error;
pub mod list;
pub mod request;
