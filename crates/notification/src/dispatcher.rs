use colloquium_shared::now;
use sqlx::SqlitePool;

use crate::{AdminEventKind, Notification, Queue, ReminderType, repository};

/// Turns domain facts into queued notification jobs. Dispatching never sends
/// anything itself.
#[derive(Clone)]
pub struct Dispatcher {
    queue: Queue,
    read_db: SqlitePool,
}

impl Dispatcher {
    pub fn new(queue: Queue, read_db: SqlitePool) -> Self {
        Self { queue, read_db }
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub async fn email_verification(
        &self,
        user_id: impl Into<String>,
    ) -> colloquium_shared::Result<String> {
        let notification = Notification::EmailVerification {
            user_id: user_id.into(),
        };

        self.queue.enqueue(&notification, now()).await
    }

    pub async fn registration_confirmation(
        &self,
        event_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> colloquium_shared::Result<String> {
        let notification = Notification::EventRegistrationConfirmation {
            event_id: event_id.into(),
            user_id: user_id.into(),
        };

        self.queue.enqueue(&notification, now()).await
    }

    /// Schedules a reminder for `run_at` (unix seconds).
    pub async fn event_reminder(
        &self,
        event_id: impl Into<String>,
        user_id: impl Into<String>,
        reminder: ReminderType,
        run_at: i64,
    ) -> colloquium_shared::Result<String> {
        let notification = Notification::EventReminder {
            event_id: event_id.into(),
            user_id: user_id.into(),
            reminder,
        };

        self.queue.enqueue(&notification, run_at).await
    }

    /// Returns `None` without enqueuing when nobody could receive it.
    pub async fn admin_event(
        &self,
        event_id: impl Into<String>,
        variant: AdminEventKind,
        user_id: Option<String>,
    ) -> colloquium_shared::Result<Option<String>> {
        if !repository::has_admin(&self.read_db).await? {
            tracing::debug!(?variant, "no admin to notify");
            return Ok(None);
        }

        let notification = Notification::AdminEventNotification {
            event_id: event_id.into(),
            variant,
            user_id,
        };

        Ok(Some(self.queue.enqueue(&notification, now()).await?))
    }
}
