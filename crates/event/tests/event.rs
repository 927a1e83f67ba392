use colloquium_event::UpdateInput;
use colloquium_notification::AdminEventKind;
use colloquium_notification::Notification;
use colloquium_shared::{Actor, Error, event::EventStatus};
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn create_publishes_and_alerts_admins() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = helpers::command(&state);
    helpers::create_user(&state, "admin", "Admin").await?;
    let host = helpers::create_user(&state, "host", "User").await?;

    let event = cmd
        .create(&Actor::user(&host), helpers::event_input(Some(10)))
        .await?;
    assert_eq!(event.status, EventStatus::Published);
    assert_eq!(event.host_id, host);

    let jobs = state.queue.list(None, 10).await?;
    assert_eq!(jobs.len(), 1);
    assert_eq!(
        jobs[0].notification()?,
        Notification::AdminEventNotification {
            event_id: event.id.to_owned(),
            variant: AdminEventKind::NewEvent,
            user_id: None,
        }
    );

    Ok(())
}

#[tokio::test]
async fn create_validates_input() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = helpers::command(&state);
    let host = helpers::create_user(&state, "host", "User").await?;

    let mut input = helpers::event_input(Some(0));
    input.title = "x".to_owned();
    let resp = cmd.create(&Actor::user(&host), input).await;
    assert!(matches!(resp, Err(Error::Validate(_))));

    let mut input = helpers::event_input(None);
    input.end_date = Some(input.start_date - 1);
    let resp = cmd.create(&Actor::user(&host), input).await;
    assert!(matches!(resp, Err(Error::Validate(_))));

    let banned = Actor::new(&host, false, true);
    let resp = cmd.create(&banned, helpers::event_input(None)).await;
    assert!(matches!(resp, Err(Error::Forbidden)));

    Ok(())
}

#[tokio::test]
async fn only_the_host_edits_and_never_once_banned() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = helpers::command(&state);
    let (host, event) = helpers::create_event(&state, None).await?;
    let other = helpers::create_user(&state, "john", "User").await?;

    let updated = cmd
        .update(
            &Actor::user(&host),
            &event,
            UpdateInput {
                title: Some("Async Rust Colloquium".to_owned()),
                capacity: Some(20),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.title, "Async Rust Colloquium");
    assert_eq!(updated.capacity, Some(20));

    let resp = cmd
        .update(&Actor::user(&other), &event, UpdateInput::default())
        .await;
    assert!(matches!(resp, Err(Error::Forbidden)));

    helpers::set_status(&state, &event, "Banned").await?;
    let resp = cmd
        .update(&Actor::user(&host), &event, UpdateInput::default())
        .await;
    assert!(matches!(resp, Err(Error::EventBanned)));

    let resp = cmd.cancel(&Actor::user(&host), &event).await;
    assert!(matches!(resp, Err(Error::EventBanned)));

    Ok(())
}

#[tokio::test]
async fn lifecycle_is_one_directional() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = helpers::command(&state);
    let (host, event) = helpers::create_event(&state, None).await?;
    let actor = Actor::user(&host);

    let completed = cmd.complete(&actor, &event).await?;
    assert_eq!(completed.status, EventStatus::Completed);

    let resp = cmd.cancel(&actor, &event).await;
    assert_eq!(
        resp.unwrap_err().to_string(),
        "Event is Completed and cannot become Cancelled"
    );

    let (host, event) = helpers::create_event(&state, None).await?;
    helpers::create_user(&state, "admin", "Admin").await?;
    let cancelled = cmd.cancel(&Actor::user(&host), &event).await?;
    assert_eq!(cancelled.status, EventStatus::Cancelled);

    let last = state.queue.list(None, 10).await?.pop().unwrap();
    assert_eq!(
        last.notification()?,
        Notification::AdminEventNotification {
            event_id: event.to_owned(),
            variant: AdminEventKind::EventCancelled,
            user_id: None,
        }
    );

    Ok(())
}

#[tokio::test]
async fn soft_deleted_events_disappear() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = helpers::command(&state);
    let (host, event) = helpers::create_event(&state, None).await?;
    let user = helpers::create_user(&state, "john", "User").await?;

    let resp = cmd.delete(&Actor::user(&user), &event).await;
    assert!(matches!(resp, Err(Error::Forbidden)));

    cmd.delete(&Actor::user(&host), &event).await?;
    assert!(cmd.find(&event).await?.is_none());

    let resp = cmd.registration.register(&event, &user, None).await;
    assert!(matches!(resp, Err(Error::NotFound(_))));

    let deleted = colloquium_event::find_event(&state.state.read_db, &event)
        .await?
        .unwrap();
    assert!(deleted.deleted_at.is_some());

    Ok(())
}
