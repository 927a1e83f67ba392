use colloquium_notification::{JobStatus, Notification, ReminderSweep, ReminderType};
use colloquium_shared::{HOUR, MINUTE, now};
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn day_reminders_are_jittered() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(&dir).await?;
    let at = now();

    let host = helpers::create_user(&state, "host", "User").await?;
    let event =
        helpers::create_event(&state, &host, at + 24 * HOUR + 2 * MINUTE, "Published", None)
            .await?;

    let mut users = vec![];
    for name in ["john", "jane", "albert"] {
        let id = helpers::create_user(&state, name, "User").await?;
        helpers::register(&state, &event, &id).await?;
        users.push(id);
    }

    let sweep = ReminderSweep::new(state.dispatcher.clone(), state.pool.clone());
    let report = sweep.sweep(at).await?;
    assert_eq!(report.day_events, 1);
    assert_eq!(report.hour_events, 0);
    assert_eq!(report.scheduled, 3);

    let jobs = state.queue.list(Some(JobStatus::Enqueued), 10).await?;
    assert_eq!(jobs.len(), 3);

    for job in jobs {
        assert!(job.run_at >= at + MINUTE && job.run_at <= at + 10 * MINUTE);

        let Notification::EventReminder {
            event_id,
            user_id,
            reminder,
        } = job.notification()?
        else {
            panic!("unexpected notification {}", job.kind);
        };
        assert_eq!(event_id, event);
        assert_eq!(reminder, ReminderType::Day);
        assert!(users.contains(&user_id));
    }

    Ok(())
}

#[tokio::test]
async fn hour_window_ignores_unpublished_events() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(&dir).await?;
    let at = now();

    let host = helpers::create_user(&state, "host", "User").await?;
    let john = helpers::create_user(&state, "john", "User").await?;

    let published =
        helpers::create_event(&state, &host, at + HOUR - 4 * MINUTE, "Published", None).await?;
    let banned = helpers::create_event(&state, &host, at + HOUR, "Banned", None).await?;
    let outside =
        helpers::create_event(&state, &host, at + 3 * HOUR, "Published", None).await?;

    for event in [&published, &banned, &outside] {
        helpers::register(&state, event, &john).await?;
    }

    let sweep = ReminderSweep::new(state.dispatcher.clone(), state.pool.clone());
    let report = sweep.sweep(at).await?;
    assert_eq!(report.hour_events, 1);
    assert_eq!(report.scheduled, 1);

    let jobs = state.queue.list(None, 10).await?;
    assert_eq!(jobs.len(), 1);
    assert!(jobs[0].run_at >= at + MINUTE && jobs[0].run_at <= at + 3 * MINUTE);
    assert_eq!(
        jobs[0].dedup_key.as_deref(),
        Some(format!("reminder:{published}:{john}:1h").as_str())
    );

    Ok(())
}

#[tokio::test]
async fn overlapping_sweeps_duplicate_unless_guarded() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(&dir).await?;
    let at = now();

    let host = helpers::create_user(&state, "host", "User").await?;
    let john = helpers::create_user(&state, "john", "User").await?;
    let event = helpers::create_event(&state, &host, at + 24 * HOUR, "Published", None).await?;
    helpers::register(&state, &event, &john).await?;

    let sweep = ReminderSweep::new(state.dispatcher.clone(), state.pool.clone());
    sweep.sweep(at).await?;
    sweep.sweep(at + 5 * MINUTE).await?;
    assert_eq!(state.queue.list(None, 10).await?.len(), 2);

    let guarded = sweep.clone().dedup_guard(true);
    let report = guarded.sweep(at + 10 * MINUTE).await?;
    assert_eq!(report.scheduled, 0);
    assert_eq!(state.queue.list(None, 10).await?.len(), 2);

    Ok(())
}
