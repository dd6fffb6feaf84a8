mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{error_body, TestServer, Tokens};
use photoism_server::auth::token_digest;

#[tokio::test]
async fn signup_then_login_returns_token_pair() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.signup("kim", "kim@photoism.co.kr", "password123").await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.text().await?.is_empty());

    let res = server.login("kim@photoism.co.kr", "password123").await?;
    assert_eq!(res.status(), StatusCode::OK);
    let tokens = Tokens::from_body(&res.json::<Value>().await?)?;
    assert_ne!(tokens.access, tokens.refresh);

    assert_eq!(
        server.store.stored_refresh_token(1).await,
        Some(token_digest(&tokens.refresh))
    );
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_conflict() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.signup("kim", "kim@photoism.co.kr", "password123").await?;

    let res = server.signup("lee", "kim@photoism.co.kr", "password456").await?;
    let body = error_body(res, StatusCode::CONFLICT, "/signup").await?;
    assert_eq!(body["message"], "Email already exists");
    assert_eq!(server.store.user_count().await, 1);
    Ok(())
}

#[tokio::test]
async fn login_failures_are_distinguished() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.signup("kim", "kim@photoism.co.kr", "password123").await?;

    let res = server.login("nobody@photoism.co.kr", "password123").await?;
    let body = error_body(res, StatusCode::UNAUTHORIZED, "/login").await?;
    assert_eq!(body["message"], "Email not found");

    // Login applies no format rule, so a malformed email is simply unknown
    let res = server.login("nobody", "x").await?;
    let body = error_body(res, StatusCode::UNAUTHORIZED, "/login").await?;
    assert_eq!(body["message"], "Email not found");

    let res = server.login("kim@photoism.co.kr", "not-the-password").await?;
    let body = error_body(res, StatusCode::UNAUTHORIZED, "/login").await?;
    assert_eq!(body["message"], "Invalid password");

    // A failed login stores nothing
    assert_eq!(server.store.stored_refresh_token(1).await, None);
    Ok(())
}

#[tokio::test]
async fn each_login_replaces_the_refresh_token() -> Result<()> {
    let server = TestServer::spawn().await?;
    let first = server.register("kim@photoism.co.kr").await?;

    let res = server.login("kim@photoism.co.kr", "password123").await?;
    let second = Tokens::from_body(&res.json::<Value>().await?)?;
    assert_ne!(first.refresh, second.refresh);

    // The earlier refresh token is no longer on record
    let res = server
        .client
        .post(server.url("/token/refresh"))
        .json(&json!({ "refreshToken": first.refresh }))
        .send()
        .await?;
    error_body(res, StatusCode::UNAUTHORIZED, "/token/refresh").await?;
    Ok(())
}

#[tokio::test]
async fn refresh_rotates_and_blocks_replay() -> Result<()> {
    let server = TestServer::spawn().await?;
    let tokens = server.register("kim@photoism.co.kr").await?;

    let res = server
        .client
        .post(server.url("/token/refresh"))
        .json(&json!({ "refreshToken": tokens.refresh }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let rotated = Tokens::from_body(&res.json::<Value>().await?)?;
    assert_ne!(rotated.refresh, tokens.refresh);

    let res = server
        .client
        .post(server.url("/token/refresh"))
        .json(&json!({ "refreshToken": tokens.refresh }))
        .send()
        .await?;
    let body = error_body(res, StatusCode::UNAUTHORIZED, "/token/refresh").await?;
    assert_eq!(body["message"], "Invalid refresh token");

    let res = server
        .client
        .get(server.url("/users/me"))
        .bearer_auth(&rotated.access)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn me_and_logout() -> Result<()> {
    let server = TestServer::spawn().await?;
    let tokens = server.register("kim@photoism.co.kr").await?;

    let res = server
        .client
        .get(server.url("/users/me"))
        .bearer_auth(&tokens.access)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let me = res.json::<Value>().await?;
    assert_eq!(me["email"], "kim@photoism.co.kr");
    assert_eq!(me["username"], "tester");
    assert!(me.get("passwordHash").is_none() && me.get("password_hash").is_none());

    let res = server
        .client
        .delete(server.url("/users/me/session"))
        .bearer_auth(&tokens.access)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = server
        .client
        .post(server.url("/token/refresh"))
        .json(&json!({ "refreshToken": tokens.refresh }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn protected_routes_reject_bad_credentials() -> Result<()> {
    let server = TestServer::spawn().await?;
    let tokens = server.register("kim@photoism.co.kr").await?;

    let res = server.client.get(server.url("/users/me")).send().await?;
    let body = error_body(res, StatusCode::UNAUTHORIZED, "/users/me").await?;
    assert_eq!(body["message"], "User authentication failed");

    let res = server
        .client
        .get(server.url("/users/me"))
        .bearer_auth("not-a-jwt")
        .send()
        .await?;
    error_body(res, StatusCode::UNAUTHORIZED, "/users/me").await?;

    // Refresh tokens do not open protected routes
    let res = server
        .client
        .get(server.url("/users/me"))
        .bearer_auth(&tokens.refresh)
        .send()
        .await?;
    let body = error_body(res, StatusCode::UNAUTHORIZED, "/users/me").await?;
    assert_eq!(body["message"], "User authentication failed");
    Ok(())
}
