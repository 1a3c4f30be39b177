//! HTTP Store Integration Tests
//!
//! Request shapes and status mapping of the REST store against a mock server.

mod support;

use brainlink::auth::{AuthToken, Credentials};
use brainlink::library::{ContentId, ContentKind, NewContent};
use brainlink::{ContentError, ContentStore, HttpStore};
use serde_json::json;
use support::capture_logs;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token() -> AuthToken {
    AuthToken::new("secret-token")
}

#[tokio::test]
async fn test_sign_in_returns_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/signin"))
        .and(body_json(json!({ "username": "alice", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "abc.def" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = HttpStore::new(mock_server.uri());
    let credentials = Credentials::new("alice", "hunter2").unwrap();
    let token = store.sign_in(&credentials).await.unwrap();

    assert_eq!(token.as_str(), "abc.def");
}

#[tokio::test]
async fn test_sign_in_failure_keeps_server_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/signin"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "message": "Incorrect credentials" })),
        )
        .mount(&mock_server)
        .await;

    let store = HttpStore::new(mock_server.uri());
    let credentials = Credentials::new("alice", "nope").unwrap();
    let err = store.sign_in(&credentials).await.unwrap_err();

    // Anonymous calls never turn into Unauthorized
    assert_eq!(
        err,
        ContentError::Remote {
            status: 403,
            message: Some("Incorrect credentials".to_string())
        }
    );
    assert_eq!(err.user_message(), "Incorrect credentials");
}

#[tokio::test]
async fn test_list_sends_bearer_and_decodes_wire_items() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/content"))
        .and(header("Authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                { "_id": "1", "title": "Thread", "link": "https://x.com/a/status/9", "type": "twitter",
                  "tags": [{ "_id": "t1", "title": "rust" }] },
                { "_id": "2", "title": "Talk", "link": "https://youtu.be/abc" },
                { "_id": "3", "title": "Odd", "link": "https://example.com", "type": "document" }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = HttpStore::new(mock_server.uri());
    let items = store.list_content(&token()).await.unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].kind, ContentKind::Twitter);
    assert!(items[0].tags.contains("rust"));
    assert_eq!(items[1].kind, ContentKind::YouTube);
    assert_eq!(items[2].kind, ContentKind::Other);
}

#[tokio::test]
async fn test_owner_call_rejected_is_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/content"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let store = HttpStore::new(mock_server.uri());
    let err = store.list_content(&token()).await.unwrap_err();

    assert_eq!(err, ContentError::Unauthorized);
}

#[tokio::test]
async fn test_create_sends_type_and_tags() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/content"))
        .and(header("Authorization", "Bearer secret-token"))
        .and(body_json(json!({
            "title": "Talk",
            "link": "https://youtu.be/abc",
            "type": "youtube",
            "tags": ["rust", "async"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Content added" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = NewContent::new(" Talk ", "https://youtu.be/abc")
        .with_tags(["rust", "async"])
        .validate()
        .unwrap();

    let store = HttpStore::new(mock_server.uri());
    store.create_content(&token(), &request).await.unwrap();
}

#[tokio::test]
async fn test_server_error_without_body_uses_generic_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/content"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let request = NewContent::new("Talk", "https://youtu.be/abc").validate().unwrap();
    let store = HttpStore::new(mock_server.uri());
    let err = store.create_content(&token(), &request).await.unwrap_err();

    assert!(matches!(err, ContentError::Remote { status: 500, message: None }));
    assert_eq!(err.user_message(), "Request failed, please try again");
}

#[tokio::test]
async fn test_delete_targets_item_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/content/64f1a2"))
        .and(header("Authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = HttpStore::new(mock_server.uri());
    store
        .delete_content(&token(), &ContentId::new("64f1a2"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_share_create_and_disable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/brain/share"))
        .and(body_json(json!({ "share": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hash": "k3y" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/brain/share"))
        .and(body_json(json!({ "share": false })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = HttpStore::new(mock_server.uri());
    assert_eq!(store.create_share_link(&token()).await.unwrap(), "k3y");
    store.disable_sharing(&token()).await.unwrap();
}

#[tokio::test]
async fn test_shared_lookup_is_anonymous() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/brain/k3y"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "alice",
            "content": [{ "_id": "1", "title": "Talk", "link": "https://youtu.be/abc" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = HttpStore::new(mock_server.uri());
    let items = store.list_shared("k3y").await.unwrap();

    assert_eq!(items.len(), 1);

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_unknown_share_token_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/brain/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Invalid link" })))
        .mount(&mock_server)
        .await;

    let store = HttpStore::new(mock_server.uri());
    let err = store.list_shared("gone").await.unwrap_err();

    assert_eq!(err, ContentError::NotFound);
}

#[tokio::test]
async fn test_share_token_not_in_request_logs() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/brain/s3cr3t-share"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let (logs, _guard) = capture_logs();
    let store = HttpStore::new(mock_server.uri());
    store.list_shared("s3cr3t-share").await.unwrap();

    // Transport errors must not echo the URL either
    let offline = HttpStore::new("http://127.0.0.1:9");
    let err = offline.list_shared("s3cr3t-share").await.unwrap_err();

    let output = logs.contents();
    assert!(output.contains("Store response"), "nothing captured: {}", output);
    assert!(!output.contains("s3cr3t-share"), "share token logged: {}", output);
    assert!(!err.to_string().contains("s3cr3t-share"));
}

#[tokio::test]
async fn test_unreachable_store_is_transport_error() {
    // Nothing listens on port 9 on a test host
    let store = HttpStore::new("http://127.0.0.1:9");
    let err = store.list_content(&token()).await.unwrap_err();

    assert!(matches!(err, ContentError::Transport(_)));
    assert!(!err.requires_sign_in());
}
