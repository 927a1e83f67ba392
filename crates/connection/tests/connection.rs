use colloquium_connection::RequestInput;
use colloquium_shared::{Actor, Error, connection::ConnectionStatus};
use temp_dir::TempDir;

mod helpers;

fn request(addressee_id: &str) -> RequestInput {
    RequestInput {
        addressee_id: addressee_id.to_owned(),
        message: Some("Nice talk yesterday".to_owned()),
    }
}

#[tokio::test]
async fn request_and_accept() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = colloquium_connection::Command(state.clone());
    let john = helpers::create_user(&state, "john").await?;
    let jane = helpers::create_user(&state, "jane").await?;

    let connection = cmd.request(&Actor::user(&john), request(&jane)).await?;
    assert_eq!(connection.status, ConnectionStatus::Pending);

    let resp = cmd.accept(&Actor::user(&john), &connection.id).await;
    assert!(matches!(resp, Err(Error::Forbidden)));

    let accepted = cmd.accept(&Actor::user(&jane), &connection.id).await?;
    assert_eq!(accepted.status, ConnectionStatus::Accepted);
    assert!(accepted.responded_at.is_some());

    let resp = cmd.decline(&Actor::user(&jane), &connection.id).await;
    assert_eq!(
        resp.unwrap_err().to_string(),
        "Connection request is no longer pending"
    );

    let listed = cmd
        .list(&Actor::user(&john), Some(ConnectionStatus::Accepted))
        .await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, connection.id);

    Ok(())
}

#[tokio::test]
async fn pair_invariants() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = colloquium_connection::Command(state.clone());
    let john = helpers::create_user(&state, "john").await?;
    let jane = helpers::create_user(&state, "jane").await?;

    let resp = cmd.request(&Actor::user(&john), request(&john)).await;
    assert_eq!(
        resp.unwrap_err().to_string(),
        "You cannot connect with yourself"
    );

    let resp = cmd.request(&Actor::user(&john), request("missing")).await;
    assert!(matches!(resp, Err(Error::NotFound(_))));

    let first = cmd.request(&Actor::user(&john), request(&jane)).await?;

    let resp = cmd.request(&Actor::user(&jane), request(&john)).await;
    assert_eq!(
        resp.unwrap_err().to_string(),
        "A connection with this user already exists"
    );

    cmd.decline(&Actor::user(&jane), &first.id).await?;
    cmd.request(&Actor::user(&jane), request(&john)).await?;

    assert_eq!(cmd.list(&Actor::user(&john), None).await?.len(), 2);

    let resp = cmd
        .request(&Actor::new(&john, false, true), request(&jane))
        .await;
    assert!(matches!(resp, Err(Error::Forbidden)));

    Ok(())
}
