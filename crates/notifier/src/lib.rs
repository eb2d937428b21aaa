/// Betting Monitor: Notifier
/// Digest channels: Telegram bot + SMTP email

mod email;
mod telegram;

pub use email::{format_email_body, format_email_subject, EmailNotifier};
pub use telegram::{escape_markdown, format_telegram_digest, TelegramNotifier};

use esports_monitor::config::NotificationMethods;
use esports_monitor::AlertSink;
use tracing::{info, warn};

/// Local wall-clock stamp used in digest headers.
pub fn digest_stamp() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}

/// Enabled and fully configured channels. Misconfigured ones are skipped
/// with a warning instead of failing every cycle.
pub fn build_sinks(methods: &NotificationMethods) -> Vec<Box<dyn AlertSink>> {
    let mut sinks: Vec<Box<dyn AlertSink>> = Vec::new();

    let email = &methods.email;
    if email.enabled {
        let missing = email.missing_fields();
        if !missing.is_empty() {
            warn!("Email enabled but missing {:?}, channel disabled", missing);
        } else {
            match EmailNotifier::new(email) {
                Ok(n) => {
                    info!("Email channel → {}", email.recipient);
                    sinks.push(Box::new(n));
                }
                Err(e) => warn!("Email channel disabled: {:#}", e),
            }
        }
    }

    let telegram = &methods.telegram;
    if telegram.enabled {
        let missing = telegram.missing_fields();
        if !missing.is_empty() {
            warn!("Telegram enabled but missing {:?}, channel disabled", missing);
        } else {
            info!("Telegram channel → chat {}", telegram.chat_id);
            sinks.push(Box::new(TelegramNotifier::new(&telegram.bot_token, &telegram.chat_id)));
        }
    }

    if sinks.is_empty() {
        warn!("No notification channel active, new matches will only be logged");
    }
    sinks
}
