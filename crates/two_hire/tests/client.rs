//! HTTP-level tests for the 2hire client against a mock server.

use std::time::Duration;

use serde_json::json;
use two_hire::{ApiConfig, ApiError, TwoHireClient, WebhookConfig, WebhookService};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: server.uri(),
        bearer_token: "test-bearer".to_string(),
        service_token: "test-service".to_string(),
        request_timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn admin_listing_sends_auth_headers_and_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/api/sharing/vehicle"))
        .and(header("authorization", "Bearer test-bearer"))
        .and(header("x-service-token", "test-service"))
        .and(query_param("site", "milano"))
        .and(query_param("mode", "minimal"))
        .and(query_param(
            "filters",
            r#"{"_self":{"online":true,"type":["scooter"]}}"#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "v1" }, { "id": "v2" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = TwoHireClient::new(&config_for(&server)).unwrap();
    let vehicles = client.list_admin_vehicles("milano", "scooter").await.unwrap();

    assert_eq!(vehicles.len(), 2);
    assert_eq!(vehicles[0]["id"], "v1");
}

#[tokio::test]
async fn user_listing_filters_by_type_only() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/api/sharing/vehicle"))
        .and(query_param("site", "milano"))
        .and(query_param("filters", r#"{"_self":{"type":["bike"]}}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = TwoHireClient::new(&config_for(&server)).unwrap();
    let vehicles = client.list_user_vehicles("milano", "bike").await.unwrap();

    assert!(vehicles.is_empty());
}

#[tokio::test]
async fn settings_payload_is_returned_verbatim() {
    let server = MockServer::start().await;
    let payload = json!({ "data": { "specific": { "milano": { "service": {} } } } });

    Mock::given(method("GET"))
        .and(path("/admin/api/service/setting"))
        .and(query_param("site", "milano"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
        .mount(&server)
        .await;

    let client = TwoHireClient::new(&config_for(&server)).unwrap();

    assert_eq!(client.get_service_settings("milano").await.unwrap(), payload);
}

#[tokio::test]
async fn provider_error_body_is_kept() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/api/sharing/vehicle"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string(r#"{"error":"boom","code":"E42"}"#),
        )
        .mount(&server)
        .await;

    let client = TwoHireClient::new(&config_for(&server)).unwrap();
    let err = client.list_user_vehicles("milano", "car").await.unwrap_err();

    match &err {
        ApiError::Status { status, body } => {
            assert_eq!(*status, 500);
            assert!(body.contains("E42"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.provider_body(), Some(r#"{"error":"boom","code":"E42"}"#));
}

#[tokio::test]
async fn unauthorized_maps_to_authentication_failed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/api/sharing/vehicle"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
        .mount(&server)
        .await;

    let client = TwoHireClient::new(&config_for(&server)).unwrap();
    let err = client
        .list_admin_vehicles("milano", "scooter")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::AuthenticationFailed { status: 401, .. }));
}

#[tokio::test]
async fn missing_data_array_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/api/sharing/vehicle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .mount(&server)
        .await;

    let client = TwoHireClient::new(&config_for(&server)).unwrap();
    let err = client
        .list_admin_vehicles("milano", "scooter")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn slow_responses_time_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/api/sharing/vehicle"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [] }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.request_timeout = Duration::from_millis(100);
    let client = TwoHireClient::new(&config).unwrap();

    let err = client.list_user_vehicles("milano", "bike").await.unwrap_err();

    assert!(matches!(err, ApiError::Timeout));
}

#[tokio::test]
async fn subscribe_puts_hub_body() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/admin/api/webhooks"))
        .and(header("x-service-token", "test-service"))
        .and(body_json(json!({
            "hub": {
                "callback": "https://hooks.example.com/2h/callback",
                "mode": "subscribe",
                "topic": "vehicle:status",
                "secret": "shh"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = TwoHireClient::new(&config_for(&server)).unwrap();
    let service = WebhookService::new(
        client,
        WebhookConfig {
            callback_url: "https://hooks.example.com/2h/callback".to_string(),
            secret: "shh".to_string(),
        },
    );

    let response = service.subscribe("vehicle:status").await.unwrap();

    assert_eq!(response["data"], "ok");
}

#[tokio::test]
async fn unsubscribe_accepts_empty_body() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/admin/api/webhooks"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = TwoHireClient::new(&config_for(&server)).unwrap();
    let service = WebhookService::new(
        client,
        WebhookConfig {
            callback_url: "https://hooks.example.com/2h/callback".to_string(),
            secret: "shh".to_string(),
        },
    );

    assert!(service.unsubscribe("trip:end").await.unwrap().is_null());
}

#[tokio::test]
async fn list_webhooks_surfaces_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/api/webhooks"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let client = TwoHireClient::new(&config_for(&server)).unwrap();
    let service = WebhookService::new(
        client,
        WebhookConfig {
            callback_url: "https://hooks.example.com/2h/callback".to_string(),
            secret: "shh".to_string(),
        },
    );

    let err = service.list().await.unwrap_err();

    assert_eq!(err.provider_body(), Some("forbidden"));
}
