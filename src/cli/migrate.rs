use anyhow::Result;
use colloquium::Config;
use sqlx::migrate::MigrateDatabase;

#[tracing::instrument(skip(config))]
pub async fn migrate(config: Config) -> Result<()> {
    tracing::info!("Running database migrations...");

    if !sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::info!(url = %config.database.url, "database does not exist, creating");
        sqlx::Sqlite::create_database(&config.database.url).await?;
    }

    let pool = colloquium::db::create_pool(&config.database.url, 1).await?;
    colloquium::db::migrate(&pool).await?;
    pool.close().await;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn reset(config: Config) -> Result<()> {
    tracing::info!("Resetting database...");

    if sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::warn!(url = %config.database.url, "dropping existing database");
        sqlx::Sqlite::drop_database(&config.database.url).await?;
    } else {
        tracing::info!("Database does not exist, nothing to drop");
    }

    migrate(config).await?;

    tracing::info!("Database reset completed successfully");

    Ok(())
}
