use anyhow::Result;
use colloquium::{AppState, Config};
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

#[tracing::instrument(skip(config))]
pub async fn serve(
    config: Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting colloquium server...");

    let host = host_override.unwrap_or(config.server.host.to_owned());
    let port = port_override.unwrap_or(config.server.port);

    // Write pool: 1 connection for all write operations
    let write_pool = colloquium::db::create_write_pool(&config.database.url).await?;
    colloquium::db::migrate(&write_pool).await?;

    // Read pool: multiple connections for read-only queries
    let read_pool =
        colloquium::db::create_read_pool(&config.database.url, config.database.max_connections)
            .await?;

    let state = colloquium_shared::State {
        read_db: read_pool.clone(),
        write_db: write_pool.clone(),
    };

    let app_state = AppState::new(config.clone(), state.clone());

    if let (Some(email), Some(password)) = (&config.root.email, &config.root.password) {
        let id = app_state.user_command.ensure_root(email, password).await?;
        tracing::info!(user_id = %id, "root admin ready");
    }

    let worker = colloquium::jobs::worker(&config, &state, colloquium::jobs::mailer(&config)?);
    worker.recover().await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker_handles = worker.spawn(shutdown_rx);

    let mut scheduler = colloquium_notification::scheduler(
        colloquium::jobs::sweep(&config, &state),
        &config.reminder.cron,
    )
    .await?;
    scheduler.start().await?;

    let app = colloquium::router(app_state).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(super::shutdown_signal())
        .await?;

    tracing::info!("Stopping notification workers...");

    shutdown_tx.send(true)?;
    for result in futures::future::join_all(worker_handles).await {
        if let Err(e) = result {
            tracing::error!("{e}");
        }
    }

    scheduler.shutdown().await?;

    tracing::info!("Closing database pools...");
    read_pool.close().await;
    write_pool.close().await;

    tracing::info!("Graceful shutdown complete");

    Ok(())
}
