use clap::ValueEnum;
use colloquium_notification::{Dispatcher, Queue};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Role {
    User,
    Admin,
    Ban,
}

#[tracing::instrument(skip(config))]
pub async fn set_role(config: colloquium::Config, email: String, role: Role) -> anyhow::Result<()> {
    let pool = colloquium::db::create_pool(&config.database.url, 1).await?;
    let state = colloquium_shared::State::new(pool.clone());
    let dispatcher = Dispatcher::new(Queue::new(pool.clone()), pool.clone());
    let command = colloquium_user::Command::new(state, dispatcher);

    let Some(user) = command.find_by_email(&email).await? else {
        tracing::error!("user {email} not found");
        return Ok(());
    };

    match role {
        Role::User => {
            command.activate(&user.id).await?;
            command
                .set_role(&user.id, colloquium_shared::user::Role::User)
                .await?;
        }
        Role::Admin => command.made_admin(&user.id).await?,
        Role::Ban => command.suspend(&user.id, None).await?,
    }

    tracing::info!("{email} is now {role:?}");

    pool.close().await;

    Ok(())
}
