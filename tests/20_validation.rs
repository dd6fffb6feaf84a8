mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{error_body, TestServer};

fn fields(body: &Value) -> Vec<String> {
    body["inputErrors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["field"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn signup_reports_one_entry_per_invalid_field() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.signup("k", "not-an-email", "short").await?;
    let body = error_body(res, StatusCode::BAD_REQUEST, "/signup").await?;
    assert_eq!(body["message"], "Invalid input value");
    assert_eq!(fields(&body), vec!["email", "password", "username"]);

    let password = body["inputErrors"]
        .as_array()
        .and_then(|errors| errors.iter().find(|e| e["field"] == "password"))
        .cloned()
        .unwrap_or_default();
    assert_eq!(password["rejectedValue"], Value::Null);
    assert!(password["message"].is_string());

    assert_eq!(server.store.user_count().await, 0);
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_bad_request() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .client
        .post(server.url("/login"))
        .header("content-type", "application/json")
        .body("{\"email\": ")
        .send()
        .await?;
    let body = error_body(res, StatusCode::BAD_REQUEST, "/login").await?;
    assert_eq!(body["inputErrors"], json!([]));

    let res = server
        .client
        .post(server.url("/login"))
        .json(&json!({ "email": "kim@photoism.co.kr" }))
        .send()
        .await?;
    error_body(res, StatusCode::BAD_REQUEST, "/login").await?;
    Ok(())
}

#[tokio::test]
async fn empty_refresh_token_is_rejected_by_validation() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .client
        .post(server.url("/token/refresh"))
        .json(&json!({ "refreshToken": "" }))
        .send()
        .await?;
    let body = error_body(res, StatusCode::BAD_REQUEST, "/token/refresh").await?;
    assert_eq!(fields(&body), vec!["refreshToken"]);
    Ok(())
}

#[tokio::test]
async fn missing_and_null_fields_each_get_an_entry() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .client
        .post(server.url("/signup"))
        .json(&json!({ "username": "kim" }))
        .send()
        .await?;
    let body = error_body(res, StatusCode::BAD_REQUEST, "/signup").await?;
    assert_eq!(body["message"], "Invalid input value");
    assert_eq!(fields(&body), vec!["email", "password"]);

    let res = server
        .client
        .post(server.url("/signup"))
        .json(&json!({ "username": "kim", "email": null, "password": "password123" }))
        .send()
        .await?;
    let body = error_body(res, StatusCode::BAD_REQUEST, "/signup").await?;
    assert_eq!(fields(&body), vec!["email"]);

    let res = server
        .client
        .post(server.url("/login"))
        .json(&json!({}))
        .send()
        .await?;
    let body = error_body(res, StatusCode::BAD_REQUEST, "/login").await?;
    assert_eq!(fields(&body), vec!["email", "password"]);

    assert_eq!(server.store.user_count().await, 0);
    Ok(())
}

#[tokio::test]
async fn missing_correction_fields_are_named() -> Result<()> {
    let server = TestServer::spawn().await?;
    let tokens = server.register("kim@photoism.co.kr").await?;

    let res = server
        .client
        .post(server.url("/corrections"))
        .bearer_auth(&tokens.access)
        .json(&json!({ "shape": "OVAL", "skin": null, "eyes": 1, "nose": 0 }))
        .send()
        .await?;
    let body = error_body(res, StatusCode::BAD_REQUEST, "/corrections").await?;
    assert_eq!(fields(&body), vec!["chin", "lips", "skin"]);
    assert_eq!(body["inputErrors"][0]["rejectedValue"], Value::Null);

    let res = server
        .client
        .post(server.url("/photobooks"))
        .bearer_auth(&tokens.access)
        .json(&json!({}))
        .send()
        .await?;
    let body = error_body(res, StatusCode::BAD_REQUEST, "/photobooks").await?;
    assert_eq!(fields(&body), vec!["photoUrl"]);
    Ok(())
}
