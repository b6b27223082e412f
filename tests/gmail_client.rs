use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use newsbrief::mail::gmail::GmailClient;
use newsbrief::mail::{ListCriteria, MailError, MailSource};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> GmailClient {
    GmailClient::new("test-token").with_base_url(server.uri())
}

#[tokio::test]
async fn list_labels_sends_bearer_token_and_parses() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/me/labels"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "labels": [
                {"id": "L1", "name": "뉴스요약"},
                {"id": "L2", "name": "Receipts"}
            ]
        })))
        .mount(&server)
        .await;

    let labels = client(&server).list_labels().await.unwrap();
    assert_eq!(labels.len(), 2);
    assert_eq!(labels[0].id, "L1");
    assert_eq!(labels[0].name, "뉴스요약");
}

#[tokio::test]
async fn listing_by_label_uses_label_ids_param() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/me/messages"))
        .and(query_param("labelIds", "L1"))
        .and(query_param("maxResults", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [{"id": "m1"}, {"id": "m2"}]
        })))
        .mount(&server)
        .await;

    let ids = client(&server)
        .list_message_ids(ListCriteria::for_label("L1", 5))
        .await
        .unwrap();
    assert_eq!(ids, vec!["m1".to_string(), "m2".to_string()]);
}

#[tokio::test]
async fn listing_by_query_uses_q_param() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/me/messages"))
        .and(query_param("q", "from:googlealerts-noreply@google.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [{"id": "m9"}]
        })))
        .mount(&server)
        .await;

    let ids = client(&server)
        .list_message_ids(ListCriteria::for_query(
            "from:googlealerts-noreply@google.com",
            8,
        ))
        .await
        .unwrap();
    assert_eq!(ids, vec!["m9".to_string()]);
}

#[tokio::test]
async fn empty_listing_deserializes_to_no_ids() {
    let server = MockServer::start().await;

    // Gmail omits the `messages` array entirely when nothing matches.
    Mock::given(method("GET"))
        .and(path("/users/me/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"resultSizeEstimate": 0})))
        .mount(&server)
        .await;

    let ids = client(&server)
        .list_message_ids(ListCriteria::for_query("nothing", 8))
        .await
        .unwrap();
    assert!(ids.is_empty());
}

#[tokio::test]
async fn get_message_requests_full_format_and_parses_payload() {
    let server = MockServer::start().await;
    let body = URL_SAFE_NO_PAD.encode("<p>hello</p>".as_bytes());

    Mock::given(method("GET"))
        .and(path("/users/me/messages/m1"))
        .and(query_param("format", "full"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "m1",
            "payload": {
                "mimeType": "text/html",
                "headers": [{"name": "Subject", "value": "Hello"}],
                "body": {"data": body},
                "parts": []
            }
        })))
        .mount(&server)
        .await;

    let message = client(&server).get_message("m1").await.unwrap();
    assert_eq!(message.id, "m1");
    let payload = message.payload.expect("payload");
    assert_eq!(payload.mime_type, "text/html");
    assert_eq!(payload.headers[0].value, "Hello");
}

#[tokio::test]
async fn unauthorized_maps_to_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/me/labels"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client(&server).list_labels().await.unwrap_err();
    assert!(err.is_auth(), "unexpected {err:?}");
}

#[tokio::test]
async fn server_error_maps_to_retriable_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/me/labels"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server).list_labels().await.unwrap_err();
    match err {
        MailError::Http { status, retriable } => {
            assert_eq!(status.as_u16(), 503);
            assert!(retriable);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_maps_to_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/me/labels"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client(&server).list_labels().await.unwrap_err();
    assert!(matches!(err, MailError::InvalidResponse(_)), "unexpected {err:?}");
}
