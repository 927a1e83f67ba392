use std::{collections::VecDeque, sync::Arc};

use serde::Serialize;
use tokio::sync::Mutex;

/// A rendered message ready for a transport.
#[derive(Clone, Debug, Serialize)]
pub struct Mail {
    pub to: String,
    pub template: String,
    pub subject: String,
    pub data: serde_json::Value,
    pub body: String,
}

#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: Mail) -> anyhow::Result<()>;
}

/// Keeps mails in memory. Used by tests, and by `serve` when no SMTP host is
/// configured, where it holds only the most recent `capacity` mails.
#[derive(Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<Mutex<VecDeque<Mail>>>,
    capacity: Option<usize>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounded(capacity: usize) -> Self {
        Self {
            sent: Arc::default(),
            capacity: Some(capacity),
        }
    }

    pub async fn sent(&self) -> Vec<Mail> {
        self.sent.lock().await.iter().cloned().collect()
    }

    pub async fn sent_to(&self, to: &str) -> Vec<Mail> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|mail| mail.to == to)
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, mail: Mail) -> anyhow::Result<()> {
        tracing::info!(to = %mail.to, template = %mail.template, "mail kept in memory, not delivered");

        let mut sent = self.sent.lock().await;
        if let Some(capacity) = self.capacity {
            while sent.len() >= capacity {
                sent.pop_front();
            }
            if capacity == 0 {
                return Ok(());
            }
        }
        sent.push_back(mail);

        Ok(())
    }
}

#[async_trait::async_trait]
impl<M: Mailer + ?Sized> Mailer for Arc<M> {
    async fn send(&self, mail: Mail) -> anyhow::Result<()> {
        (**self).send(mail).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail(to: &str) -> Mail {
        Mail {
            to: to.to_owned(),
            template: "email_verification".to_owned(),
            subject: "Verify".to_owned(),
            data: serde_json::Value::Null,
            body: String::new(),
        }
    }

    #[tokio::test]
    async fn bounded_outbox_keeps_latest() {
        let mailer = MemoryMailer::bounded(2);
        for to in ["a@x.test", "b@x.test", "c@x.test"] {
            mailer.send(mail(to)).await.unwrap();
        }

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "b@x.test");
        assert_eq!(sent[1].to, "c@x.test");

        let none = MemoryMailer::bounded(0);
        none.send(mail("a@x.test")).await.unwrap();
        assert!(none.sent().await.is_empty());
    }
}
