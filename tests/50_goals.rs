mod common;

use anyhow::Result;
use schedule_api::cli::client::ClientError;

#[tokio::test]
async fn goals_are_listed_per_day_and_completed() -> Result<()> {
    let Some(server) = common::TestServer::start().await? else {
        return Ok(());
    };
    let (alice, _) = server.user("Alice", "alice@example.com").await?;

    let run = alice.create_goal("run 5k", "2024-03-01").await?;
    alice.create_goal("read", "2024-03-01").await?;
    alice.create_goal("tomorrow", "2024-03-02").await?;

    let goals = alice.list_goals("2024-03-01").await?;
    assert_eq!(goals.len(), 2);
    assert!(goals.iter().all(|g| !g.is_completed && g.completed_at.is_none()));

    alice.complete_goal(run).await?;
    let goals = alice.list_goals("2024-03-01").await?;
    let done = goals.iter().find(|g| g.id == run).expect("completed goal");
    assert!(done.is_completed);
    assert!(done.completed_at.is_some());

    // completing again is accepted
    alice.complete_goal(run).await?;
    Ok(())
}

#[tokio::test]
async fn goals_are_private_to_their_owner() -> Result<()> {
    let Some(server) = common::TestServer::start().await? else {
        return Ok(());
    };
    let (alice, _) = server.user("Alice", "alice@example.com").await?;
    let (bob, _) = server.user("Bob", "bob@example.com").await?;

    let goal = alice.create_goal("secret plan", "2024-03-01").await?;
    assert!(bob.list_goals("2024-03-01").await?.is_empty());

    match bob.complete_goal(goal).await.unwrap_err() {
        ClientError::Api { status, .. } => assert_eq!(status, 403),
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn goal_requires_title_and_valid_date() -> Result<()> {
    let Some(server) = common::TestServer::start().await? else {
        return Ok(());
    };
    let (alice, _) = server.user("Alice", "alice@example.com").await?;

    for (title, date) in [("", "2024-03-01"), ("walk", "03/01/2024")] {
        match alice.create_goal(title, date).await.unwrap_err() {
            ClientError::Api { status, .. } => assert_eq!(status, 400),
            other => panic!("unexpected error: {other}"),
        }
    }
    Ok(())
}
