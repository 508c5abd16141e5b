//! Integration tests for BookingClient using wiremock
//!
//! These tests pin the client's wire shape and its response classification
//! against a mock portal.

use chrono::NaiveDateTime;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use qinfang::booking::outcome::{MSG_BAD_PLACE, MSG_COOKIE_EXPIRED, MSG_REQUEST_FAILED};
use qinfang::booking::{BookingChunk, BookingClient};
use qinfang::config::{RunConfig, UserProfile};

const BOOK_PATH: &str = "/a/field/book/bizFieldBookMain/saveData";
const RULE_ID: &str = "4b4d6e5c826c425b9a5ed7a02a46656a";

fn run_config() -> RunConfig {
    RunConfig {
        cookie: "JSESSIONID=abc; lang=zh_CN".to_string(),
        proxy: None,
        profile: UserProfile {
            id: "124060073".to_string(),
            name: "张三".to_string(),
            email: "124060073@link.cuhk.edu.cn".to_string(),
            phone: "13800000000".to_string(),
        },
        theme: "练琴".to_string(),
    }
}

fn chunk(place: &str) -> BookingChunk {
    BookingChunk {
        place: place.to_string(),
        start: NaiveDateTime::parse_from_str("2025-09-17 20:00", "%Y-%m-%d %H:%M").unwrap(),
        end: NaiveDateTime::parse_from_str("2025-09-17 22:00", "%Y-%m-%d %H:%M").unwrap(),
    }
}

/// Server message is returned verbatim
#[tokio::test]
async fn test_submit_returns_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(BOOK_PATH))
        .and(query_param("ruleId", RULE_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "保存成功"})))
        .mount(&server)
        .await;

    let client = BookingClient::with_base_url(run_config(), &server.uri()).unwrap();
    let msg = client
        .submit(&chunk("MPC327 管弦乐学部琴房（UP）"))
        .await
        .unwrap();
    assert_eq!(msg, "保存成功");
}

/// Free-text detail around the known substring is preserved
#[tokio::test]
async fn test_submit_keeps_message_suffix() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(BOOK_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "保存成功，房间MPC327"})),
        )
        .mount(&server)
        .await;

    let client = BookingClient::with_base_url(run_config(), &server.uri()).unwrap();
    let msg = client
        .submit(&chunk("MPC327 管弦乐学部琴房（UP）"))
        .await
        .unwrap();
    assert_eq!(msg, "保存成功，房间MPC327");
}

/// A non-JSON body (typically the login page) means the session expired
#[tokio::test]
async fn test_non_json_body_is_cookie_expiry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(BOOK_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>请登录</html>"))
        .mount(&server)
        .await;

    let client = BookingClient::with_base_url(run_config(), &server.uri()).unwrap();
    let msg = client
        .submit(&chunk("MPC327 管弦乐学部琴房（UP）"))
        .await
        .unwrap();
    assert_eq!(msg, MSG_COOKIE_EXPIRED);
}

/// Valid JSON without a string message field surfaces as an error
/// (the retry loop logs it as 异常 and keeps going)
#[tokio::test]
async fn test_json_without_message_field_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(BOOK_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 500})))
        .mount(&server)
        .await;

    let client = BookingClient::with_base_url(run_config(), &server.uri()).unwrap();
    let result = client.submit(&chunk("MPC327 管弦乐学部琴房（UP）")).await;
    assert!(result.is_err());
}

/// An unknown place short-circuits before any network call
#[tokio::test]
async fn test_unknown_place_makes_no_http_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "保存成功"})))
        .expect(0)
        .mount(&server)
        .await;

    let client = BookingClient::with_base_url(run_config(), &server.uri()).unwrap();
    let msg = client.submit(&chunk("NOT_A_REAL_ROOM")).await.unwrap();
    assert_eq!(msg, MSG_BAD_PLACE);

    server.verify().await;
}

/// The form body carries the facility id, profile, theme, and wire-format timestamps
#[tokio::test]
async fn test_form_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(BOOK_PATH))
        .and(query_param("ruleId", RULE_ID))
        .and(query_param("reBookMainId", ""))
        .and(body_string_contains(
            "bizFieldBookField.FId=34d88aa5f4fd476ab013dcc561ee1063",
        ))
        .and(body_string_contains("user.id=124060073"))
        .and(body_string_contains(
            "bizFieldBookField.startTime=2025-09-17+20%3A00",
        ))
        .and(body_string_contains(
            "bizFieldBookField.endTime=2025-09-17+22%3A00",
        ))
        .and(body_string_contains("isNewRecord=true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "保存成功"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = BookingClient::with_base_url(run_config(), &server.uri()).unwrap();
    let msg = client
        .submit(&chunk("MPC327 管弦乐学部琴房（UP）"))
        .await
        .unwrap();
    assert_eq!(msg, "保存成功");

    server.verify().await;
}

/// A dead endpoint collapses into the fixed request-failed message
#[tokio::test]
async fn test_unreachable_server_is_request_failed() {
    // Nothing listens on port 1.
    let client = BookingClient::with_base_url(run_config(), "http://127.0.0.1:1").unwrap();
    let msg = client
        .submit(&chunk("MPC327 管弦乐学部琴房（UP）"))
        .await
        .unwrap();
    assert_eq!(msg, MSG_REQUEST_FAILED);
}
