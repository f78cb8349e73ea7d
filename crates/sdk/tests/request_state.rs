use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use reqwest::Method;
use serde_json::json;
use tam::{
    ApiSdkError, Client, CreateClientConfig, MemoryTokenStore, NoopSessionListener, RequestBody,
    RequestState, TokenPair, TokenStore,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

async fn client(server: &MockServer, store: Arc<MemoryTokenStore>) -> Client {
    Client::new(
        CreateClientConfig::new(format!("{}/api", server.uri())),
        store,
        Arc::new(NoopSessionListener),
    )
    .unwrap()
}

fn token(claims: serde_json::Value) -> String {
    format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}

#[tokio::test]
async fn test_load_tracks_data_then_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/blog/articles/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 0, "results": [] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/change_password/"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "old_password": ["Old password is not correct"] })),
        )
        .mount(&server)
        .await;
    let client = client(&server, Arc::new(MemoryTokenStore::new())).await;

    let request = client.request(Some("blog/articles/".to_string()));
    let states = request.subscribe();
    assert_eq!(request.state(), RequestState::default());

    request.load().await.unwrap();
    assert!(states.has_changed().unwrap());
    assert!(!request.is_loading());
    assert!(!request.is_error());
    assert_eq!(request.data(), Some(json!({ "count": 0, "results": [] })));

    let body = RequestBody::from(json!({ "old_password": "x", "new_password": "y" }));
    let response = request
        .send_request(Some("auth/change_password/"), Some(Method::POST), Some(body))
        .await
        .unwrap();

    assert!(response.is_error());
    assert!(request.is_error());
    assert_eq!(request.data(), None);
    assert_eq!(
        request.error_content(),
        Some(json!({ "old_password": ["Old password is not correct"] }))
    );
}

#[tokio::test]
async fn test_missing_url_is_a_config_error() {
    let server = MockServer::start().await;
    let client = client(&server, Arc::new(MemoryTokenStore::new())).await;

    let request = client.request(None);

    assert!(matches!(request.load().await, Err(ApiSdkError::ConfigError(_))));
    assert!(!request.is_loading());
}

#[tokio::test]
async fn test_cancelled_handle_fails_fast() {
    let server = MockServer::start().await;
    let client = client(&server, Arc::new(MemoryTokenStore::new())).await;

    let request = client.request(Some("blog/home-datas/".to_string()));
    request.cancel();

    assert!(matches!(request.load().await, Err(ApiSdkError::Cancelled)));
    assert!(request.is_error());
    assert!(!request.is_loading());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_is_authenticated_reads_stored_token() {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryTokenStore::new());
    let client = client(&server, store.clone()).await;

    assert!(!client.auth().is_authenticated().await.unwrap());

    store
        .set(TokenPair::new(
            token(json!({ "token_type": "access", "user_id": 12, "exp": 4102444800i64 })),
            "refresh-1",
        ))
        .await
        .unwrap();
    assert!(client.auth().is_authenticated().await.unwrap());

    store.set(TokenPair::new("not-a-jwt", "refresh-1")).await.unwrap();
    assert!(!client.auth().is_authenticated().await.unwrap());
    assert_eq!(store.get().await.unwrap(), None);
}
