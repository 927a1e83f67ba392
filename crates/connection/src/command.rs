use std::ops::Deref;

use colloquium_db::table::User;
use colloquium_shared::{Actor, Error, connection::ConnectionStatus, now};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use ulid::Ulid;
use validator::Validate;

use crate::repository::{self, Connection};

#[derive(Validate, Deserialize)]
pub struct RequestInput {
    #[validate(length(min = 1, max = 26))]
    pub addressee_id: String,
    #[validate(length(max = 500))]
    pub message: Option<String>,
}

#[derive(Clone)]
pub struct Command(pub colloquium_shared::State);

impl Deref for Command {
    type Target = colloquium_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    pub async fn request(
        &self,
        actor: &Actor,
        input: RequestInput,
    ) -> colloquium_shared::Result<Connection> {
        actor.ensure_can_write()?;
        input.validate()?;

        if input.addressee_id == actor.user_id {
            colloquium_shared::user!("You cannot connect with yourself");
        }

        let mut tx = self.write_db.begin().await?;

        let statement = Query::select()
            .column(User::Id)
            .from(User::Table)
            .and_where(Expr::col(User::Id).eq(input.addressee_id.to_owned()))
            .to_owned();
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        if sqlx::query_with(&sql, values)
            .fetch_optional(&mut *tx)
            .await?
            .is_none()
        {
            colloquium_shared::not_found!("user");
        }

        if repository::find_live_between(&mut *tx, &actor.user_id, &input.addressee_id)
            .await?
            .is_some()
        {
            colloquium_shared::user!("A connection with this user already exists");
        }

        let connection = Connection {
            id: Ulid::new().to_string(),
            requester_id: actor.user_id.to_owned(),
            addressee_id: input.addressee_id,
            status: ConnectionStatus::Pending,
            message: input.message,
            responded_at: None,
            created_at: now(),
        };

        repository::create(&mut *tx, &connection).await?;
        tx.commit().await?;

        tracing::info!(
            connection_id = %connection.id,
            requester_id = %connection.requester_id,
            addressee_id = %connection.addressee_id,
            "connection requested"
        );

        Ok(connection)
    }

    pub async fn accept(
        &self,
        actor: &Actor,
        id: impl Into<String>,
    ) -> colloquium_shared::Result<Connection> {
        self.respond(actor, id.into(), ConnectionStatus::Accepted)
            .await
    }

    /// Declined requests are kept, the pair may ask again later.
    pub async fn decline(
        &self,
        actor: &Actor,
        id: impl Into<String>,
    ) -> colloquium_shared::Result<Connection> {
        self.respond(actor, id.into(), ConnectionStatus::Declined)
            .await
    }

    pub async fn list(
        &self,
        actor: &Actor,
        status: Option<ConnectionStatus>,
    ) -> colloquium_shared::Result<Vec<Connection>> {
        repository::list_for(&self.read_db, &actor.user_id, status).await
    }

    async fn respond(
        &self,
        actor: &Actor,
        id: String,
        status: ConnectionStatus,
    ) -> colloquium_shared::Result<Connection> {
        actor.ensure_can_write()?;

        let Some(mut connection) = repository::find(&self.write_db, &id).await? else {
            colloquium_shared::not_found!("connection");
        };

        if connection.addressee_id != actor.user_id {
            return Err(Error::Forbidden);
        }

        let now = now();
        if !repository::respond(&self.write_db, &id, status, now).await? {
            colloquium_shared::user!("Connection request is no longer pending");
        }

        tracing::info!(connection_id = %id, status = %status, "connection request answered");

        connection.status = status;
        connection.responded_at = Some(now);

        Ok(connection)
    }
}
