use anyhow::{Context, Result};
use async_trait::async_trait;
use esports_monitor::config::EmailConfig;
use esports_monitor::{AlertSink, MatchRecord};
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

use crate::digest_stamp;

/// STARTTLS SMTP channel; one message per digest.
pub struct EmailNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailNotifier {
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let from: Mailbox = config
            .email_user
            .trim()
            .parse()
            .with_context(|| format!("invalid sender address '{}'", config.email_user))?;
        let to: Mailbox = config
            .recipient
            .trim()
            .parse()
            .with_context(|| format!("invalid recipient address '{}'", config.recipient))?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(config.smtp_server.trim())
            .with_context(|| format!("cannot prepare SMTP relay {}", config.smtp_server))?
            .port(config.smtp_port)
            .credentials(Credentials::new(config.email_user.clone(), config.email_password.clone()))
            .timeout(Some(Duration::from_secs(30)))
            .build();

        Ok(Self { mailer, from, to })
    }
}

pub fn format_email_subject(stamp: &str) -> String {
    format!("🚨 New matches found - {}", stamp)
}

pub fn format_email_body(records: &[MatchRecord]) -> String {
    let mut body = String::from("New matches available for betting:\n\n");

    for rec in records {
        body.push_str(&format!("🎮 {} - {}\n", rec.source, rec.category.slug().to_uppercase()));
        body.push_str(&format!("🏟️ {}\n", rec.league));
        body.push_str(&format!("⚡ {}\n", rec.teams));
        body.push_str(&format!("💰 Odds: {}\n", rec.odds));
        body.push_str(&format!("⏰ Time: {}\n", rec.scheduled_time));
        body.push_str(&format!("🔗 Link: {}\n", rec.source_url));
        body.push_str(&"-".repeat(50));
        body.push_str("\n\n");
    }

    body
}

#[async_trait]
impl AlertSink for EmailNotifier {
    fn name(&self) -> &str {
        "email"
    }

    async fn send(&self, records: &[MatchRecord]) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(format_email_subject(&digest_stamp()))
            .multipart(MultiPart::mixed().singlepart(SinglePart::plain(format_email_body(records))))
            .context("cannot build email")?;

        self.mailer.send(message).await.context("SMTP delivery failed")?;
        Ok(())
    }
}
