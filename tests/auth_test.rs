//! Bearer-token authentication coverage on the download route.
//!
//! These tests post an invalid URL so that a request passing the auth
//! check fails with 400 (validation) instead of invoking the extractor —
//! any non-401 status means authentication succeeded.

mod common;

use std::net::SocketAddr;

use serial_test::serial;

async fn post_download(addr: SocketAddr, auth: Option<&str>) -> reqwest::Response {
    let client = reqwest::Client::new();
    let mut req = client
        .post(format!("http://{addr}/download"))
        .json(&serde_json::json!({ "url": "not a url" }));
    if let Some(value) = auth {
        req = req.header("Authorization", value);
    }
    req.send().await.unwrap()
}

#[tokio::test]
#[serial]
async fn bearer_token_accepted() {
    std::env::set_var("AUTH_TOKENS", "abc");
    let addr = common::spawn_server().await;

    let resp = post_download(addr, Some("Bearer abc")).await;
    assert_eq!(resp.status(), 400);

    std::env::remove_var("AUTH_TOKENS");
}

#[tokio::test]
#[serial]
async fn bare_token_accepted() {
    std::env::set_var("AUTH_TOKENS", "abc");
    let addr = common::spawn_server().await;

    let resp = post_download(addr, Some("abc")).await;
    assert_eq!(resp.status(), 400);

    std::env::remove_var("AUTH_TOKENS");
}

#[tokio::test]
#[serial]
async fn wrong_token_rejected() {
    std::env::set_var("AUTH_TOKENS", "abc");
    let addr = common::spawn_server().await;

    let resp = post_download(addr, Some("Bearer xyz")).await;
    assert_eq!(resp.status(), 401);

    let json: serde_json::Value = resp.json().await.unwrap();
    assert!(json["detail"].as_str().unwrap().contains("invalid"));

    std::env::remove_var("AUTH_TOKENS");
}

#[tokio::test]
#[serial]
async fn missing_header_rejected() {
    std::env::set_var("AUTH_TOKENS", "abc");
    let addr = common::spawn_server().await;

    let resp = post_download(addr, None).await;
    assert_eq!(resp.status(), 401);

    std::env::remove_var("AUTH_TOKENS");
}

#[tokio::test]
#[serial]
async fn open_when_no_tokens_configured() {
    std::env::remove_var("AUTH_TOKENS");
    let addr = common::spawn_server().await;

    let resp = post_download(addr, None).await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
#[serial]
async fn any_token_from_the_list_works() {
    std::env::set_var("AUTH_TOKENS", "abc, def");
    let addr = common::spawn_server().await;

    let resp = post_download(addr, Some("Bearer def")).await;
    assert_eq!(resp.status(), 400);

    std::env::remove_var("AUTH_TOKENS");
}
