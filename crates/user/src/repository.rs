use colloquium_db::table::User as UserTable;
use colloquium_shared::user::{AccountStatus, Role};
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::{SqliteExecutor, prelude::FromRow};

#[derive(FromRow)]
pub(crate) struct UserRow {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: sqlx::types::Text<Role>,
    pub is_banned: bool,
    pub ban_reason: Option<String>,
    pub account_status: sqlx::types::Text<AccountStatus>,
    pub verification_token: Option<String>,
    pub institution: Option<String>,
    pub bio: Option<String>,
    pub created_at: i64,
}

/// Account as exposed to callers. The password hash never leaves the crate.
#[derive(Clone, Debug, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_admin: bool,
    pub is_banned: bool,
    pub ban_reason: Option<String>,
    pub account_status: AccountStatus,
    pub institution: Option<String>,
    pub bio: Option<String>,
    pub created_at: i64,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            is_admin: row.role.0 == Role::Admin,
            id: row.id,
            email: row.email,
            name: row.name,
            role: row.role.0,
            is_banned: row.is_banned,
            ban_reason: row.ban_reason,
            account_status: row.account_status.0,
            institution: row.institution,
            bio: row.bio,
            created_at: row.created_at,
        }
    }
}

pub(crate) enum FindType {
    Id(String),
    Email(String),
    VerificationToken(String),
}

fn columns() -> [UserTable; 12] {
    [
        UserTable::Id,
        UserTable::Email,
        UserTable::Name,
        UserTable::Password,
        UserTable::Role,
        UserTable::IsBanned,
        UserTable::BanReason,
        UserTable::AccountStatus,
        UserTable::VerificationToken,
        UserTable::Institution,
        UserTable::Bio,
        UserTable::CreatedAt,
    ]
}

pub(crate) async fn find<'e>(
    executor: impl SqliteExecutor<'e>,
    arg_type: FindType,
) -> colloquium_shared::Result<Option<UserRow>> {
    let mut statement = Query::select()
        .columns(columns())
        .from(UserTable::Table)
        .limit(1)
        .to_owned();

    match arg_type {
        FindType::Id(id) => statement.and_where(Expr::col(UserTable::Id).eq(id)),
        FindType::Email(email) => {
            statement.and_where(Expr::col(UserTable::Email).eq(email.to_lowercase()))
        }
        FindType::VerificationToken(token) => {
            statement.and_where(Expr::col(UserTable::VerificationToken).eq(token))
        }
    };

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, UserRow, _>(&sql, values)
        .fetch_optional(executor)
        .await?)
}

/// Loads the public view of an account, inside or outside a transaction.
pub async fn find_user<'e>(
    executor: impl SqliteExecutor<'e>,
    id: impl Into<String>,
) -> colloquium_shared::Result<Option<User>> {
    Ok(find(executor, FindType::Id(id.into())).await?.map(User::from))
}

pub(crate) async fn admins<'e>(
    executor: impl SqliteExecutor<'e>,
) -> colloquium_shared::Result<Vec<UserRow>> {
    let statement = Query::select()
        .columns(columns())
        .from(UserTable::Table)
        .and_where(Expr::col(UserTable::Role).eq(Role::Admin.as_ref()))
        .order_by(UserTable::CreatedAt, Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, UserRow, _>(&sql, values)
        .fetch_all(executor)
        .await?)
}

pub(crate) struct CreateInput {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password: String,
    pub verification_token: String,
    pub institution: Option<String>,
    pub now: i64,
}

pub(crate) async fn create<'e>(
    executor: impl SqliteExecutor<'e>,
    input: CreateInput,
) -> colloquium_shared::Result<()> {
    let statement = Query::insert()
        .into_table(UserTable::Table)
        .columns([
            UserTable::Id,
            UserTable::Email,
            UserTable::Name,
            UserTable::Password,
            UserTable::Role,
            UserTable::IsBanned,
            UserTable::AccountStatus,
            UserTable::VerificationToken,
            UserTable::Institution,
            UserTable::CreatedAt,
        ])
        .values_panic([
            input.id.into(),
            input.email.into(),
            input.name.into(),
            input.password.into(),
            Role::User.to_string().into(),
            false.into(),
            AccountStatus::Pending.to_string().into(),
            input.verification_token.into(),
            input.institution.into(),
            input.now.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    sqlx::query_with(&sql, values).execute(executor).await?;

    Ok(())
}

#[derive(Default)]
pub(crate) struct UpdateInput {
    pub id: String,
    pub role: Option<Role>,
    pub account_status: Option<AccountStatus>,
    pub clear_verification_token: bool,
    pub ban: Option<(bool, Option<String>)>,
}

pub(crate) async fn update<'e>(
    executor: impl SqliteExecutor<'e>,
    input: UpdateInput,
) -> colloquium_shared::Result<()> {
    let mut statement = Query::update()
        .table(UserTable::Table)
        .and_where(Expr::col(UserTable::Id).eq(input.id))
        .to_owned();

    if let Some(role) = input.role {
        statement.value(UserTable::Role, role.as_ref());
    }

    if let Some(status) = input.account_status {
        statement.value(UserTable::AccountStatus, status.as_ref());
    }

    if input.clear_verification_token {
        statement.value(UserTable::VerificationToken, Option::<String>::None);
    }

    if let Some((is_banned, reason)) = input.ban {
        statement.value(UserTable::IsBanned, is_banned);
        statement.value(UserTable::BanReason, reason);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(executor).await?;

    Ok(())
}
