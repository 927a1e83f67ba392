use std::ops::RangeInclusive;

use colloquium_shared::{HOUR, MINUTE};
use serde::Serialize;
use sqlx::SqlitePool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::{Dispatcher, Notification, ReminderType, repository};

/// Search window around a reminder's lead time and the jitter applied to
/// every reminder found in it.
#[derive(Clone, Debug)]
pub struct ReminderWindow {
    pub reminder: ReminderType,
    pub lead: i64,
    pub tolerance: i64,
    pub jitter: RangeInclusive<i64>,
}

impl ReminderWindow {
    pub fn day() -> Self {
        Self {
            reminder: ReminderType::Day,
            lead: 24 * HOUR,
            tolerance: 15 * MINUTE,
            jitter: MINUTE..=10 * MINUTE,
        }
    }

    pub fn hour() -> Self {
        Self {
            reminder: ReminderType::Hour,
            lead: HOUR,
            tolerance: 5 * MINUTE,
            jitter: MINUTE..=3 * MINUTE,
        }
    }

    /// Inclusive bounds on `start_date` for a sweep at `now`.
    pub fn bounds(&self, now: i64) -> (i64, i64) {
        let target = now + self.lead;

        (target - self.tolerance, target + self.tolerance)
    }

    fn jitter(&self) -> i64 {
        rand::random_range(self.jitter.clone())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub day_events: usize,
    pub hour_events: usize,
    pub scheduled: usize,
}

#[derive(Clone)]
pub struct ReminderSweep {
    dispatcher: Dispatcher,
    read_db: SqlitePool,
    dedup_guard: bool,
}

impl ReminderSweep {
    pub fn new(dispatcher: Dispatcher, read_db: SqlitePool) -> Self {
        Self {
            dispatcher,
            read_db,
            dedup_guard: false,
        }
    }

    /// Skip reminders that already have a live job for the same user, event
    /// and type.
    pub fn dedup_guard(mut self, enabled: bool) -> Self {
        self.dedup_guard = enabled;
        self
    }

    pub async fn sweep(&self, now: i64) -> colloquium_shared::Result<SweepReport> {
        let mut report = SweepReport::default();

        for window in [ReminderWindow::day(), ReminderWindow::hour()] {
            let (from, to) = window.bounds(now);
            let events = repository::published_starting_between(&self.read_db, from, to).await?;

            match window.reminder {
                ReminderType::Day => report.day_events += events.len(),
                ReminderType::Hour => report.hour_events += events.len(),
            }

            for event in events {
                let user_ids = repository::registered_user_ids(&self.read_db, &event.id).await?;

                for user_id in user_ids {
                    if self.dedup_guard && self.has_live(&event.id, &user_id, window.reminder).await? {
                        continue;
                    }

                    self.dispatcher
                        .event_reminder(
                            event.id.to_owned(),
                            user_id,
                            window.reminder,
                            now + window.jitter(),
                        )
                        .await?;

                    report.scheduled += 1;
                }
            }
        }

        tracing::info!(
            day_events = report.day_events,
            hour_events = report.hour_events,
            scheduled = report.scheduled,
            "reminder sweep done"
        );

        Ok(report)
    }

    async fn has_live(
        &self,
        event_id: &str,
        user_id: &str,
        reminder: ReminderType,
    ) -> colloquium_shared::Result<bool> {
        let key = Notification::EventReminder {
            event_id: event_id.to_owned(),
            user_id: user_id.to_owned(),
            reminder,
        }
        .dedup_key();

        match key {
            Some(key) => self.dispatcher.queue().has_live(&key).await,
            None => Ok(false),
        }
    }
}

pub async fn scheduler(
    sweep: ReminderSweep,
    cron: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let sched = JobScheduler::new().await?;

    sched
        .add(Job::new_async(cron, move |uuid, mut l| {
            let sweep = sweep.clone();

            Box::pin(async move {
                if let Err(err) = sweep.sweep(colloquium_shared::now()).await {
                    tracing::error!(err = %err, "failed to sweep event reminders");
                }

                if let Err(err) = l.next_tick_for_job(uuid).await {
                    tracing::error!(err = %err, "failed to get next tick for event reminders");
                }
            })
        })?)
        .await?;

    Ok(sched)
}
