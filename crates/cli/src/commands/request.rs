use clap::Args;
use reqwest::Method;
use serde_json::Value;
use tam::{ApiResponse, Client, RequestBody};

use crate::{
    commands::error::RequestCommandError,
    console::{print_error_message, print_json},
};

#[derive(Args)]
pub struct RequestArgs {
    /// HTTP method, e.g. GET or PATCH
    pub method: String,

    /// Path under the API root, e.g. admin/players/
    pub path: String,

    /// optional - JSON request body
    #[clap(long)]
    pub body: Option<String>,
}

fn parse_method(method: &str) -> Result<Method, RequestCommandError> {
    Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| RequestCommandError::InvalidMethod(method.to_string()))
}

pub async fn handle_request(args: &RequestArgs, client: &Client) -> Result<(), RequestCommandError> {
    let method = parse_method(&args.method)?;
    let body = match &args.body {
        Some(raw) => Some(RequestBody::from(serde_json::from_str::<Value>(raw)?)),
        None => None,
    };

    let request = client.request(None);
    match request.send_request(Some(args.path.as_str()), Some(method), body).await? {
        ApiResponse::Success(data) => {
            print_json(&data);
            Ok(())
        }
        ApiResponse::Failure { status, content } => {
            print_error_message(&format!("{} {}", status, content.summary()));
            print_json(content.body());
            Err(RequestCommandError::Failed(status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method() {
        assert_eq!(parse_method("patch").unwrap(), Method::PATCH);
        assert_eq!(parse_method("GET").unwrap(), Method::GET);
        assert!(matches!(parse_method("not a method"), Err(RequestCommandError::InvalidMethod(_))));
    }
}
