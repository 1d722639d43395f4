mod common;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{http::StatusCode, routing::get, Router};
use schedule_api::auth::JwtKeys;
use schedule_api::cli::client::{ApiClient, ClientError};
use schedule_api::cli::token_store::{token_is_valid, MemoryTokenStore, TokenStore};
use url::Url;

#[tokio::test]
async fn alice_signs_up_logs_in_and_plans_her_day() -> Result<()> {
    let Some(server) = common::TestServer::start().await? else {
        return Ok(());
    };
    let client = server.client();

    let health = client.health().await?;
    assert_eq!(health["status"], "ok");

    client.signup("Alice", "alice@example.com", "password123").await?;
    let login = client.login("alice@example.com", "password123").await?;
    assert_eq!(login.user.name, "Alice");

    client.create_todo(Some("buy milk"), "2024-01-01", None).await?;

    let todos = client.list_todos("2024-01-01").await?;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].content, "buy milk");
    assert_eq!(todos[0].user_name, "Alice");
    assert_eq!(todos[0].user_id, login.user.id);
    Ok(())
}

#[tokio::test]
async fn forbidden_token_is_kept() -> Result<()> {
    let Some(server) = common::TestServer::start().await? else {
        return Ok(());
    };
    let client = server.client();
    client.logout()?;

    match client.list_todos("2024-01-01").await.unwrap_err() {
        ClientError::NotLoggedIn => {}
        other => panic!("unexpected error: {other}"),
    }

    // a token the server refuses with 403 is reported, not silently dropped
    let foreign = JwtKeys::new("not-the-server-secret", 1).issue(1, "x@example.com")?;
    client.store().set(&foreign)?;
    match client.feed(None, None).await.unwrap_err() {
        ClientError::Api { status, .. } => assert_eq!(status, 403),
        other => panic!("unexpected error: {other}"),
    }
    assert!(token_is_valid(client.store())?);
    Ok(())
}

#[tokio::test]
async fn unauthorized_response_clears_stored_token() -> Result<()> {
    // Server that refuses every session
    let router = Router::new().route("/api/todos", get(|| async { StatusCode::UNAUTHORIZED }));
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            eprintln!("stub server stopped: {}", e);
        }
    });

    let store = Arc::new(MemoryTokenStore::new());
    let token = JwtKeys::new("some-secret", 1).issue(1, "x@example.com")?;
    store.set(&token)?;
    let client = ApiClient::new(Url::parse(&format!("http://127.0.0.1:{}", port))?, store.clone());

    match client.list_todos("2024-01-01").await.unwrap_err() {
        ClientError::SessionExpired => {}
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.get()?, None);

    // the next call fails locally instead of reaching the server
    match client.list_todos("2024-01-01").await.unwrap_err() {
        ClientError::NotLoggedIn => {}
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}
