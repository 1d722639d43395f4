mod common;

use anyhow::Result;
use schedule_api::cli::client::{ClientError, ImageFile};

fn status_of(err: ClientError) -> u16 {
    match err {
        ClientError::Api { status, .. } => status,
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn todo_needs_content_or_image() -> Result<()> {
    let Some(server) = common::TestServer::start().await? else {
        return Ok(());
    };
    let (alice, _) = server.user("Alice", "alice@example.com").await?;

    let err = alice.create_todo(None, "2024-01-01", None).await.unwrap_err();
    assert_eq!(status_of(err), 400);

    let err = alice.create_todo(Some("   "), "2024-01-01", None).await.unwrap_err();
    assert_eq!(status_of(err), 400);

    // text only
    alice.create_todo(Some("stretch"), "2024-01-01", None).await?;

    // image only
    let scratch = tempfile::tempdir()?;
    let png = common::write_png(scratch.path(), "photo.png");
    alice
        .create_todo(None, "2024-01-01", Some(ImageFile::load(&png).await?))
        .await?;

    let todos = alice.list_todos("2024-01-01").await?;
    assert_eq!(todos.len(), 2);
    let with_image = todos.iter().find(|t| t.image_url.is_some()).expect("image todo");
    assert!(with_image.image_url.as_deref().unwrap_or_default().starts_with("/uploads/"));
    assert_eq!(with_image.content, "");
    Ok(())
}

#[tokio::test]
async fn list_is_scoped_to_caller_and_date() -> Result<()> {
    let Some(server) = common::TestServer::start().await? else {
        return Ok(());
    };
    let (alice, _) = server.user("Alice", "alice@example.com").await?;
    let (bob, _) = server.user("Bob", "bob@example.com").await?;

    alice.create_todo(Some("alice day one"), "2024-01-01", None).await?;
    alice.create_todo(Some("alice day two"), "2024-01-02", None).await?;
    bob.create_todo(Some("bob day one"), "2024-01-01", None).await?;

    let todos = alice.list_todos("2024-01-01").await?;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].content, "alice day one");
    assert_eq!(todos[0].date, "2024-01-01");
    Ok(())
}

#[tokio::test]
async fn only_owner_may_edit_or_delete() -> Result<()> {
    let Some(server) = common::TestServer::start().await? else {
        return Ok(());
    };
    let (alice, _) = server.user("Alice", "alice@example.com").await?;
    let (bob, _) = server.user("Bob", "bob@example.com").await?;

    let todo_id = alice.create_todo(Some("mine"), "2024-01-01", None).await?;

    assert_eq!(status_of(bob.update_todo(todo_id, Some("theirs"), None).await.unwrap_err()), 403);
    assert_eq!(status_of(bob.delete_todo(todo_id).await.unwrap_err()), 403);
    // a todo that does not exist looks the same as someone else's
    assert_eq!(status_of(bob.delete_todo(todo_id + 1000).await.unwrap_err()), 403);

    alice.update_todo(todo_id, Some("still mine"), None).await?;
    let todos = alice.list_todos("2024-01-01").await?;
    assert_eq!(todos[0].content, "still mine");
    Ok(())
}

#[tokio::test]
async fn replacing_image_removes_the_old_file() -> Result<()> {
    let Some(server) = common::TestServer::start().await? else {
        return Ok(());
    };
    let (alice, _) = server.user("Alice", "alice@example.com").await?;
    let scratch = tempfile::tempdir()?;

    let first = common::write_png(scratch.path(), "first.png");
    let todo_id = alice
        .create_todo(Some("with photo"), "2024-01-01", Some(ImageFile::load(&first).await?))
        .await?;
    let old_url = alice.list_todos("2024-01-01").await?[0].image_url.clone().expect("image url");
    let old_path = server.state.uploads.path_for(&old_url).expect("stored path");
    assert!(old_path.exists());

    let second = common::write_png(scratch.path(), "second.png");
    alice
        .update_todo(todo_id, None, Some(ImageFile::load(&second).await?))
        .await?;

    let todo = alice.list_todos("2024-01-01").await?.remove(0);
    assert_eq!(todo.content, "with photo");
    assert_ne!(todo.image_url.as_deref(), Some(old_url.as_str()));
    assert!(!old_path.exists());
    Ok(())
}

#[tokio::test]
async fn update_succeeds_when_old_image_cannot_be_removed() -> Result<()> {
    let Some(server) = common::TestServer::start().await? else {
        return Ok(());
    };
    let (alice, _) = server.user("Alice", "alice@example.com").await?;
    let scratch = tempfile::tempdir()?;

    let first = common::write_png(scratch.path(), "first.png");
    let todo_id = alice
        .create_todo(Some("old"), "2024-01-01", Some(ImageFile::load(&first).await?))
        .await?;
    let old_url = alice.list_todos("2024-01-01").await?[0].image_url.clone().expect("image url");

    // a directory in place of the stored file makes removal fail
    let old_path = server.state.uploads.path_for(&old_url).expect("stored path");
    std::fs::remove_file(&old_path)?;
    std::fs::create_dir(&old_path)?;

    let second = common::write_png(scratch.path(), "second.png");
    alice
        .update_todo(todo_id, Some("new"), Some(ImageFile::load(&second).await?))
        .await?;

    let todo = alice.list_todos("2024-01-01").await?.remove(0);
    assert_eq!(todo.content, "new");
    let new_url = todo.image_url.expect("new image url");
    assert_ne!(new_url, old_url);
    assert!(server.state.uploads.path_for(&new_url).expect("new path").exists());
    Ok(())
}

#[tokio::test]
async fn delete_cascades_and_removes_image() -> Result<()> {
    let Some(server) = common::TestServer::start().await? else {
        return Ok(());
    };
    let (alice, _) = server.user("Alice", "alice@example.com").await?;
    let (bob, _) = server.user("Bob", "bob@example.com").await?;
    let scratch = tempfile::tempdir()?;

    let png = common::write_png(scratch.path(), "cat.png");
    let todo_id = alice
        .create_todo(Some("cat"), "2024-01-01", Some(ImageFile::load(&png).await?))
        .await?;
    bob.toggle_like(todo_id).await?;
    bob.add_comment(todo_id, "cute").await?;

    let url = alice.list_todos("2024-01-01").await?[0].image_url.clone().expect("image url");
    let stored = server.state.uploads.path_for(&url).expect("stored path");
    assert!(stored.starts_with(server.upload_dir()));
    assert!(stored.exists());

    alice.delete_todo(todo_id).await?;

    assert_eq!(server.count("SELECT COUNT(*) FROM likes WHERE todo_id = $1", todo_id).await?, 0);
    assert_eq!(server.count("SELECT COUNT(*) FROM comments WHERE todo_id = $1", todo_id).await?, 0);
    assert!(!stored.exists());
    assert!(alice.list_todos("2024-01-01").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn stored_images_are_served() -> Result<()> {
    let Some(server) = common::TestServer::start().await? else {
        return Ok(());
    };
    let (alice, _) = server.user("Alice", "alice@example.com").await?;
    let scratch = tempfile::tempdir()?;

    let png = common::write_png(scratch.path(), "served.png");
    alice
        .create_todo(None, "2024-01-01", Some(ImageFile::load(&png).await?))
        .await?;
    let url = alice.list_todos("2024-01-01").await?[0].image_url.clone().expect("image url");

    let response = reqwest::get(server.base_url.join(&url)?).await?;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.bytes().await?.len(), std::fs::metadata(&png)?.len() as usize);
    Ok(())
}
