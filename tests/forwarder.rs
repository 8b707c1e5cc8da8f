//! HttpForwarder against a local mock backend.

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use url::Url;

use fto_scout_proxy::config::TimeoutConfig;
use fto_scout_proxy::{Forwarder, HttpForwarder, OutboundRequest, ProxyError};

mod common;

fn forwarder() -> HttpForwarder {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    HttpForwarder::from_client(client)
}

#[test]
fn test_builds_from_default_timeouts() {
    assert!(HttpForwarder::new(&TimeoutConfig::default()).is_ok());
}

#[tokio::test]
async fn test_post_sends_headers_and_body() {
    let (addr, mut captured) =
        common::start_recording_backend("201 Created", Some("application/json"), r#"{"ok":true}"#)
            .await;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer X"));
    let request = OutboundRequest {
        method: Method::POST,
        url: Url::parse(&format!("http://{addr}/scholarly/search?size=5")).unwrap(),
        headers,
        body: Some(Bytes::from_static(br#"{"query":"graphene"}"#)),
    };

    let response = forwarder().forward(request).await.unwrap();
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.content_type.unwrap(), "application/json");
    assert_eq!(&response.body[..], br#"{"ok":true}"#);

    let seen = captured.recv().await.unwrap();
    assert_eq!(seen.request_line(), "POST /scholarly/search?size=5 HTTP/1.1");
    assert_eq!(seen.header("authorization"), Some("Bearer X"));
    assert_eq!(seen.header("content-type"), Some("application/json"));
    assert_eq!(seen.body, br#"{"query":"graphene"}"#);
}

#[tokio::test]
async fn test_get_without_body_and_error_status() {
    let (addr, mut captured) = common::start_recording_backend("404 Not Found", None, "missing").await;

    let request = OutboundRequest {
        method: Method::GET,
        url: Url::parse(&format!("http://{addr}/api/query?id_list=1")).unwrap(),
        headers: HeaderMap::new(),
        body: None,
    };

    let response = forwarder().forward(request).await.unwrap();
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.content_type.is_none());
    assert_eq!(&response.body[..], b"missing");

    let seen = captured.recv().await.unwrap();
    assert_eq!(seen.request_line(), "GET /api/query?id_list=1 HTTP/1.1");
    assert!(seen.body.is_empty());
}

#[tokio::test]
async fn test_connection_refused_is_upstream_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let request = OutboundRequest {
        method: Method::GET,
        url: Url::parse(&format!("http://{addr}/")).unwrap(),
        headers: HeaderMap::new(),
        body: None,
    };

    let err = forwarder().forward(request).await.unwrap_err();
    assert!(matches!(err, ProxyError::Upstream(_)));
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}
