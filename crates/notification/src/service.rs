//! SMTP transport built on lettre

use lettre::{
    Message, SmtpTransport, Transport, message::header,
    transport::smtp::authentication::Credentials,
};
use serde::Deserialize;

use crate::{Mail, Mailer};

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_address: String,
    pub base_url: String,
}

#[derive(Clone)]
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: String,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> anyhow::Result<Self> {
        let transport = if config.smtp_username.is_empty() || config.smtp_password.is_empty() {
            tracing::info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                "SMTP credentials not configured, using unauthenticated connection"
            );

            SmtpTransport::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build()
        } else {
            tracing::info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                from = %config.from_address,
                "SMTP mailer initialized with authentication and TLS"
            );

            let creds =
                Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

            SmtpTransport::relay(&config.smtp_host)?
                .port(config.smtp_port)
                .credentials(creds)
                .build()
        };

        Ok(Self {
            transport,
            from: config.from_address.clone(),
        })
    }
}

#[async_trait::async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: Mail) -> anyhow::Result<()> {
        tracing::info!(to = %mail.to, template = %mail.template, "Sending email");

        let message = Message::builder()
            .from(self.from.parse()?)
            .to(mail.to.parse()?)
            .subject(mail.subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(mail.body)?;

        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&message)).await??;

        Ok(())
    }
}
