#![allow(clippy::unwrap_used)]
// Integration tests for `UserApiClient` using wiremock.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use csalt_api::{DeviceName, Error, TokenTtl, UserApiClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(token: Option<&str>) -> (MockServer, UserApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = UserApiClient::with_client(
        reqwest::Client::new(),
        base_url,
        "alice".into(),
        token.map(|t| SecretString::from(t.to_owned())),
    );
    (server, client)
}

fn password(p: &str) -> SecretString {
    SecretString::from(p.to_owned())
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_authenticate_success_sets_token() {
    let (server, mut client) = setup(None).await;

    Mock::given(method("POST"))
        .and(path("/authenticate_user"))
        .and(body_json(json!({ "nameOrEmail": "alice", "password": "hunter2" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "token": "JWT session" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    client.authenticate(&password("hunter2")).await.unwrap();

    assert!(client.has_token());
    assert_eq!(client.token().unwrap().expose_secret(), "JWT session");
}

#[tokio::test]
async fn test_authenticate_wrong_password() {
    let (server, mut client) = setup(None).await;

    Mock::given(method("POST"))
        .and(path("/authenticate_user"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "success": false, "messages": ["Wrong password or username."] })),
        )
        .mount(&server)
        .await;

    let result = client.authenticate(&password("nope")).await;

    match result {
        Err(Error::Authentication { message }) => {
            assert_eq!(message, "Wrong password or username.");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
    assert!(!client.has_token());
}

#[tokio::test]
async fn test_authenticate_server_error_is_not_auth_error() {
    let (server, mut client) = setup(None).await;

    Mock::given(method("POST"))
        .and(path("/authenticate_user"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client.authenticate(&password("x")).await.unwrap_err();
    assert!(!err.is_authentication());
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_request_long_token() {
    let (server, client) = setup(Some("JWT session")).await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(header("authorization", "JWT session"))
        .and(body_json(json!({ "ttl": "long", "access": { "devices": "r" } })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "token": "JWT long" })),
        )
        .mount(&server)
        .await;

    let token = client.request_token(TokenTtl::Long).await.unwrap();
    assert_eq!(token.expose_secret(), "JWT long");
}

#[tokio::test]
async fn test_request_token_without_token_field() {
    let (server, client) = setup(Some("JWT session")).await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let err = client.request_token(TokenTtl::Long).await.unwrap_err();
    assert!(err.is_authentication(), "got: {err:?}");
}

// ── Translation tests ───────────────────────────────────────────────

#[tokio::test]
async fn test_translate_names() {
    let (server, client) = setup(Some("JWT long")).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/devices/query"))
        .and(header("authorization", "JWT long"))
        .and(query_param("groups", r#"["group1"]"#))
        .and(query_param(
            "devices",
            r#"[{"groupname":"group2","devicename":"gp"},{"devicename":"solo"}]"#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "devices": [
                { "groupname": "group1", "devicename": "a", "saltId": 11 },
                { "groupname": "group2", "devicename": "gp", "saltId": 12 }
            ],
            "nameMatches": [
                { "groupname": "group3", "devicename": "solo", "saltId": 13 }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let devices = vec![
        DeviceName {
            group_name: "group2".into(),
            device_name: "gp".into(),
        },
        DeviceName {
            group_name: String::new(),
            device_name: "solo".into(),
        },
    ];
    let resp = client
        .translate_names(&["group1".to_owned()], &devices)
        .await
        .unwrap();

    assert_eq!(resp.devices.len(), 2);
    assert_eq!(resp.devices[1].salt_id, Some(12));
    assert_eq!(resp.name_matches.len(), 1);
    assert_eq!(resp.name_matches[0].group_name, "group3");
}

#[tokio::test]
async fn test_translate_missing_lists_default_to_empty() {
    let (server, client) = setup(Some("JWT long")).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/devices/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let resp = client.translate_names(&[], &[]).await.unwrap();
    assert!(resp.devices.is_empty());
    assert!(resp.name_matches.is_empty());
}

#[tokio::test]
async fn test_translate_device_without_salt_id() {
    let (server, client) = setup(Some("JWT long")).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/devices/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "devices": [
                { "groupname": "g1", "devicename": "new", "saltId": null },
                { "groupname": "g1", "devicename": "old", "saltId": 4 }
            ],
            "nameMatches": [{ "groupname": "g2", "devicename": "bare" }]
        })))
        .mount(&server)
        .await;

    let resp = client.translate_names(&["g1".to_owned()], &[]).await.unwrap();

    assert_eq!(resp.devices.len(), 2);
    assert_eq!(resp.devices[0].salt_id, None);
    assert_eq!(resp.devices[1].salt_id, Some(4));
    assert_eq!(resp.name_matches[0].salt_id, None);
}

#[tokio::test]
async fn test_translate_expired_token() {
    let (server, client) = setup(Some("JWT stale")).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/devices/query"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let err = client.translate_names(&[], &[]).await.unwrap_err();
    assert!(err.is_authentication(), "got: {err:?}");
}

#[tokio::test]
async fn test_translate_validation_error() {
    let (server, client) = setup(Some("JWT long")).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/devices/query"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "success": false, "messages": ["invalid devices"] })),
        )
        .mount(&server)
        .await;

    let err = client.translate_names(&[], &[]).await.unwrap_err();
    assert!(
        matches!(&err, Error::Validation { message } if message == "invalid devices"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn test_translate_without_token_sends_nothing() {
    let (server, client) = setup(None).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.translate_names(&[], &[]).await.unwrap_err();
    assert!(err.is_authentication());
}

#[tokio::test]
async fn test_translate_bad_json() {
    let (server, client) = setup(Some("JWT long")).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/devices/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.translate_names(&[], &[]).await.unwrap_err();
    assert!(
        matches!(&err, Error::Deserialization { body, .. } if body == "not json"),
        "got: {err:?}"
    );
}
