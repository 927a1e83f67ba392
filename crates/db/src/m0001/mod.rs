mod admin_log;
mod connection;
mod event;
mod forum_post;
mod notification_job;
mod registration;
mod user;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "colloquium",
    "m0001",
    vec_box![],
    vec_box![
        user::CreateTable,
        user::CreateUk1,
        user::CreateIdx1,
        event::CreateTable,
        event::CreateIdx1,
        event::CreateIdx2,
        registration::CreateTable,
        registration::CreateUk1,
        registration::CreateIdx1,
        connection::CreateTable,
        connection::CreateIdx1,
        connection::CreateIdx2,
        forum_post::CreateTable,
        forum_post::CreateIdx1,
        admin_log::CreateTable,
        admin_log::CreateIdx1,
        notification_job::CreateTable,
        notification_job::CreateIdx1,
        notification_job::CreateIdx2
    ]
);
