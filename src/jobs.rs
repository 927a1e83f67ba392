use std::sync::Arc;

use colloquium_notification::{
    Dispatcher, FileStorage, LocalStorage, Mailer, MemoryMailer, Queue, ReminderSweep,
    SmtpMailer, Worker,
};

use crate::config::Config;

/// Mails kept by the in-memory outbox when no SMTP host is configured.
const OUTBOX_CAPACITY: usize = 100;

/// SMTP when a host is configured, a bounded in-memory outbox otherwise.
pub fn mailer(config: &Config) -> anyhow::Result<Arc<dyn Mailer>> {
    if config.email.smtp_host.is_empty() {
        tracing::warn!(
            capacity = OUTBOX_CAPACITY,
            "no smtp host configured, mails are not delivered and only the latest are kept in memory"
        );
        return Ok(Arc::new(MemoryMailer::bounded(OUTBOX_CAPACITY)));
    }

    Ok(Arc::new(SmtpMailer::new(&(&config.email).into())?))
}

pub fn storage(config: &Config) -> Arc<dyn FileStorage> {
    Arc::new(LocalStorage::new(
        &config.storage.root,
        &config.storage.base_url,
    ))
}

pub fn worker(
    config: &Config,
    state: &colloquium_shared::State,
    mailer: Arc<dyn Mailer>,
) -> Worker {
    Worker::new(
        Queue::new(state.write_db.clone()),
        state.read_db.clone(),
        mailer,
        storage(config),
        config.worker(),
    )
}

pub fn sweep(config: &Config, state: &colloquium_shared::State) -> ReminderSweep {
    let dispatcher = Dispatcher::new(Queue::new(state.write_db.clone()), state.read_db.clone());

    ReminderSweep::new(dispatcher, state.read_db.clone()).dedup_guard(config.reminder.dedup_guard)
}
