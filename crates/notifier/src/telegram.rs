use anyhow::{Context, Result};
use async_trait::async_trait;
use esports_monitor::{AlertSink, MatchRecord};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::warn;

use crate::digest_stamp;

const TELEGRAM_API: &str = "https://api.telegram.org";

pub struct TelegramNotifier {
    client: reqwest::Client,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(token: &str, chat_id: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            token: token.trim().to_string(),
            chat_id: chat_id.trim().to_string(),
        }
    }

    async fn send_message(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", TELEGRAM_API, self.token);
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "Markdown",
            "disable_web_page_preview": true,
        });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Telegram request failed")?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            warn!("Telegram sendMessage failed: {}: {}", status, body);
            let snippet: String = body.chars().take(200).collect();
            anyhow::bail!("Telegram sendMessage failed: {}: {}", status, snippet);
        }
        Ok(())
    }
}

/// Escape legacy-Markdown control characters in scraped text.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

pub fn format_telegram_digest(records: &[MatchRecord], stamp: &str) -> String {
    let mut msg = format!("🚨 *New matches found* - {}\n\n", stamp);

    for rec in records {
        msg.push_str(&format!("🎮 *{}* - {}\n", rec.source, rec.category.slug().to_uppercase()));
        msg.push_str(&format!("🏟️ {}\n", escape_markdown(&rec.league.to_string())));
        msg.push_str(&format!("⚡ {}\n", escape_markdown(&rec.teams)));
        // code spans cannot be escaped; just keep backticks out
        msg.push_str(&format!("💰 Odds: `{}`\n", rec.odds.replace('`', "'")));
        msg.push_str(&format!("⏰ Time: {}\n", escape_markdown(&rec.scheduled_time)));
        msg.push_str(&format!("🔗 [Bet]({})\n", rec.source_url));
        msg.push_str("➖➖➖➖➖➖➖➖➖➖\n\n");
    }

    msg
}

#[async_trait]
impl AlertSink for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, records: &[MatchRecord]) -> Result<()> {
        let text = format_telegram_digest(records, &digest_stamp());
        self.send_message(&text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esports_monitor::{classify, Category, Source};

    fn record() -> MatchRecord {
        MatchRecord::new(
            Source::Pinnacle,
            Category::CounterStrike,
            "Team_Spirit vs *MOUZ*",
            "1.45 | 2.75",
            Some("Sat 14:30"),
            classify(Category::CounterStrike, "IEM Dallas"),
            "https://www.pinnacle.com/en/esports/counter-strike",
        )
    }

    #[test]
    fn escapes_markdown_controls() {
        assert_eq!(escape_markdown("a_b*c`d[e]"), "a\\_b\\*c\\`d\\[e]");
        assert_eq!(escape_markdown("T1 vs DK"), "T1 vs DK");
    }

    #[test]
    fn digest_layout() {
        let msg = format_telegram_digest(&[record()], "18:05");
        assert!(msg.starts_with("🚨 *New matches found* - 18:05\n\n"));
        assert!(msg.contains("🎮 *Pinnacle* - COUNTER_STRIKE\n"));
        assert!(msg.contains("🏟️ 👑 IEM\n"));
        assert!(msg.contains("⚡ Team\\_Spirit vs \\*MOUZ\\*\n"));
        assert!(msg.contains("💰 Odds: `1.45 | 2.75`\n"));
        assert!(msg.contains("⏰ Time: Sat 14:30\n"));
        assert!(msg.contains("🔗 [Bet](https://www.pinnacle.com/en/esports/counter-strike)\n"));
    }

    #[test]
    fn one_block_per_record() {
        let msg = format_telegram_digest(&[record(), record()], "00:00");
        assert_eq!(msg.matches("➖➖➖➖➖➖➖➖➖➖").count(), 2);
    }

    #[test]
    fn sink_name() {
        assert_eq!(TelegramNotifier::new(" 1:a ", "42").name(), "telegram");
    }
}
