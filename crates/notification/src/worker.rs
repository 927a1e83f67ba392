use std::{sync::Arc, time::Duration};

use anyhow::Context;
use colloquium_shared::{event::RegistrationStatus, now};
use sqlx::SqlitePool;
use tokio::{sync::watch, task::JoinHandle};

use crate::{
    FileStorage, Job, JobStatus, Mailer, Notification, Queue, RetryPolicy, content, repository,
};

#[derive(Clone, Debug)]
pub struct WorkerConfig {
    pub concurrency: usize,
    pub poll_interval: Duration,
    pub job_timeout: Duration,
    pub retry: RetryPolicy,
    /// Public address used in links inside mails.
    pub base_url: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            concurrency: 2,
            poll_interval: Duration::from_secs(1),
            job_timeout: Duration::from_secs(180),
            retry: RetryPolicy::default(),
            base_url: "http://localhost:3000".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Number of mails handed to the transport.
    Sent(usize),
    /// Nothing to do anymore, the job still counts as succeeded.
    Skipped(&'static str),
}

#[derive(Clone)]
pub struct Worker {
    queue: Queue,
    read_db: SqlitePool,
    mailer: Arc<dyn Mailer>,
    storage: Arc<dyn FileStorage>,
    config: WorkerConfig,
}

impl Worker {
    pub fn new(
        queue: Queue,
        read_db: SqlitePool,
        mailer: Arc<dyn Mailer>,
        storage: Arc<dyn FileStorage>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            queue,
            read_db,
            mailer,
            storage,
            config,
        }
    }

    /// Requeues jobs left `Running` for longer than the job timeout.
    pub async fn recover(&self) -> colloquium_shared::Result<u64> {
        let timeout = i64::try_from(self.config.job_timeout.as_secs()).unwrap_or(i64::MAX);
        let recovered = self
            .queue
            .recover_stale(now().saturating_sub(timeout))
            .await?;

        if recovered > 0 {
            tracing::warn!(recovered, "requeued notification jobs left running");
        }

        Ok(recovered)
    }

    /// Claims and executes at most one ready job. Returns the status the job
    /// ended in, or `None` when nothing was ready.
    pub async fn run_once(&self) -> colloquium_shared::Result<Option<JobStatus>> {
        let Some(job) = self.queue.claim(now()).await? else {
            return Ok(None);
        };

        let notification = match job.notification() {
            Ok(notification) => notification,
            Err(err) => {
                tracing::error!(
                    job_id = %job.id,
                    kind = %job.kind,
                    err = %err,
                    "undecodable notification payload"
                );
                self.queue.fail_permanently(&job.id, &err.to_string()).await?;
                return Ok(Some(JobStatus::Failed));
            }
        };

        let result = match tokio::time::timeout(
            self.config.job_timeout,
            self.execute(&job, &notification),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!(
                "timed out after {}s",
                self.config.job_timeout.as_secs()
            )),
        };

        match result {
            Ok(outcome) => {
                tracing::info!(
                    job_id = %job.id,
                    kind = %job.kind,
                    ?outcome,
                    "notification job succeeded"
                );
                self.queue.succeed(&job.id).await?;
                Ok(Some(JobStatus::Succeeded))
            }
            Err(err) => {
                let status = self
                    .queue
                    .fail(&job, &format!("{err:#}"), &self.config.retry, now())
                    .await?;

                if status == JobStatus::Failed {
                    tracing::error!(
                        job_id = %job.id,
                        kind = %job.kind,
                        event_id = notification.event_id(),
                        user_id = notification.user_id(),
                        attempt = job.attempt_count,
                        err = %err,
                        "notification job failed permanently"
                    );
                } else {
                    tracing::warn!(
                        job_id = %job.id,
                        kind = %job.kind,
                        event_id = notification.event_id(),
                        user_id = notification.user_id(),
                        attempt = job.attempt_count,
                        err = %err,
                        "notification job failed, will retry"
                    );
                }

                Ok(Some(status))
            }
        }
    }

    /// Runs ready jobs until the queue has nothing claimable left.
    pub async fn drain(&self) -> colloquium_shared::Result<usize> {
        let mut processed = 0;
        while self.run_once().await?.is_some() {
            processed += 1;
        }

        Ok(processed)
    }

    /// Starts `concurrency` polling tasks that stop once `shutdown` flips to
    /// true or its sender is dropped.
    pub fn spawn(&self, shutdown: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        (0..self.config.concurrency.max(1))
            .map(|index| {
                let worker = self.clone();
                let mut shutdown = shutdown.clone();

                tokio::spawn(async move {
                    tracing::info!(worker = index, "notification worker started");

                    loop {
                        if *shutdown.borrow() {
                            break;
                        }

                        match worker.run_once().await {
                            Ok(Some(_)) => continue,
                            Ok(None) => {}
                            Err(err) => {
                                tracing::error!(
                                    worker = index,
                                    err = %err,
                                    "failed to poll notification queue"
                                );
                            }
                        }

                        tokio::select! {
                            _ = tokio::time::sleep(worker.config.poll_interval) => {}
                            changed = shutdown.changed() => {
                                if changed.is_err() {
                                    break;
                                }
                            }
                        }
                    }

                    tracing::info!(worker = index, "notification worker stopped");
                })
            })
            .collect()
    }

    #[tracing::instrument(skip_all, fields(job_id = %job.id, kind = %job.kind, attempt = job.attempt_count))]
    async fn execute(&self, job: &Job, notification: &Notification) -> anyhow::Result<Outcome> {
        match notification {
            Notification::EmailVerification { user_id } => {
                let Some(recipient) = repository::find_recipient(&self.read_db, user_id).await?
                else {
                    return Ok(Outcome::Skipped("user no longer exists"));
                };

                let Some(token) = recipient.verification_token.to_owned() else {
                    return Ok(Outcome::Skipped("email already verified"));
                };

                let mail = content::email_verification(&recipient, &token, &self.config.base_url);
                self.mailer.send(mail).await?;

                Ok(Outcome::Sent(1))
            }
            Notification::EventRegistrationConfirmation { event_id, user_id } => {
                if repository::registration_status(&self.read_db, event_id, user_id).await?
                    != Some(RegistrationStatus::Registered)
                {
                    return Ok(Outcome::Skipped("registration no longer exists"));
                }

                let Some(event) = repository::find_event(&self.read_db, event_id).await? else {
                    return Ok(Outcome::Skipped("event no longer exists"));
                };

                let recipient = repository::find_recipient(&self.read_db, user_id)
                    .await?
                    .context("registered user not found")?;

                let poster_url = match &event.poster_path {
                    Some(path) if self.storage.exists(path).await => Some(self.storage.url(path)),
                    _ => None,
                };

                let mail = content::registration_confirmation(&recipient, &event, poster_url);
                self.mailer.send(mail).await?;

                Ok(Outcome::Sent(1))
            }
            Notification::EventReminder {
                event_id,
                user_id,
                reminder,
            } => {
                if repository::registration_status(&self.read_db, event_id, user_id).await?
                    != Some(RegistrationStatus::Registered)
                {
                    return Ok(Outcome::Skipped("registration no longer exists"));
                }

                let Some(event) = repository::find_event(&self.read_db, event_id).await? else {
                    return Ok(Outcome::Skipped("event no longer exists"));
                };

                if !event.is_active() {
                    return Ok(Outcome::Skipped("event is no longer active"));
                }

                let recipient = repository::find_recipient(&self.read_db, user_id)
                    .await?
                    .context("registered user not found")?;

                let mail = content::event_reminder(&recipient, &event, *reminder);
                self.mailer.send(mail).await?;

                Ok(Outcome::Sent(1))
            }
            Notification::AdminEventNotification {
                event_id,
                variant,
                user_id,
            } => {
                let Some(event) = repository::find_event(&self.read_db, event_id).await? else {
                    return Ok(Outcome::Skipped("event no longer exists"));
                };

                let user = match user_id {
                    Some(id) => repository::find_recipient(&self.read_db, id).await?,
                    None => None,
                };

                let admins = repository::admins(&self.read_db).await?;
                if admins.is_empty() {
                    return Ok(Outcome::Skipped("no admin to notify"));
                }

                for admin in admins.iter() {
                    let mail = content::admin_event(admin, &event, *variant, user.as_ref());
                    self.mailer.send(mail).await?;
                }

                Ok(Outcome::Sent(admins.len()))
            }
        }
    }
}
