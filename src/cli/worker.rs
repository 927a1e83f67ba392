use anyhow::Result;
use colloquium::Config;
use tokio::sync::watch;

async fn state(config: &Config) -> Result<colloquium_shared::State> {
    let write_db = colloquium::db::create_write_pool(&config.database.url).await?;
    colloquium::db::migrate(&write_db).await?;
    let read_db =
        colloquium::db::create_read_pool(&config.database.url, config.database.max_connections)
            .await?;

    Ok(colloquium_shared::State { read_db, write_db })
}

/// Runs the notification workers and the reminder scheduler until a shutdown
/// signal arrives.
#[tracing::instrument(skip(config))]
pub async fn work(config: Config) -> Result<()> {
    let state = state(&config).await?;

    let worker = colloquium::jobs::worker(&config, &state, colloquium::jobs::mailer(&config)?);
    worker.recover().await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handles = worker.spawn(shutdown_rx);

    let mut scheduler = colloquium_notification::scheduler(
        colloquium::jobs::sweep(&config, &state),
        &config.reminder.cron,
    )
    .await?;
    scheduler.start().await?;

    tracing::info!(
        concurrency = config.worker.concurrency,
        cron = %config.reminder.cron,
        "worker running"
    );

    super::shutdown_signal().await;

    shutdown_tx.send(true)?;
    for result in futures::future::join_all(handles).await {
        if let Err(e) = result {
            tracing::error!("{e}");
        }
    }
    scheduler.shutdown().await?;

    state.read_db.close().await;
    state.write_db.close().await;

    Ok(())
}

/// One reminder sweep at the current time.
#[tracing::instrument(skip(config))]
pub async fn sweep(config: Config) -> Result<()> {
    let state = state(&config).await?;

    let report = colloquium::jobs::sweep(&config, &state)
        .sweep(colloquium_shared::now())
        .await?;

    tracing::info!(
        day_events = report.day_events,
        hour_events = report.hour_events,
        scheduled = report.scheduled,
        "sweep finished"
    );

    state.read_db.close().await;
    state.write_db.close().await;

    Ok(())
}
