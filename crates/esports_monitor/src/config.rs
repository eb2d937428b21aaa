//! JSON configuration (`config.json`).
//!
//! Every struct is `#[serde(default)]`, so a partial file is completed from
//! the defaults at any depth. The completed config is used in memory only;
//! the file is written just once, when it does not exist yet.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::category::Category;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Raw category slugs; see [`AppConfig::categories`].
    pub monitored_categories: Vec<String>,
    pub notification_methods: NotificationMethods,
    /// Seconds between cycles.
    pub check_interval: u64,
    pub duelbits_enabled: bool,
    pub pinnacle_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            monitored_categories: Category::ALL.iter().map(|c| c.slug().to_string()).collect(),
            notification_methods: NotificationMethods::default(),
            check_interval: 300,
            duelbits_enabled: true,
            pinnacle_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationMethods {
    pub email: EmailConfig,
    pub telegram: TelegramConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub enabled: bool,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub email_user: String,
    pub email_password: String,
    pub recipient: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_server: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            email_user: String::new(),
            email_password: String::new(),
            recipient: String::new(),
        }
    }
}

impl EmailConfig {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("smtp_server", &self.smtp_server),
            ("email_user", &self.email_user),
            ("email_password", &self.email_password),
            ("recipient", &self.recipient),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub enabled: bool,
    pub bot_token: String,
    #[serde(deserialize_with = "string_or_number")]
    pub chat_id: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self { enabled: true, bot_token: String::new(), chat_id: String::new() }
    }
}

impl TelegramConfig {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [("bot_token", &self.bot_token), ("chat_id", &self.chat_id)]
            .into_iter()
            .filter(|(_, v)| v.trim().is_empty())
            .map(|(k, _)| k)
            .collect()
    }
}

/// Chat ids are often pasted as bare numbers.
fn string_or_number<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(de)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!("expected chat id, got {}", other))),
    }
}

impl AppConfig {
    /// Read `path`, or create it with defaults when it does not exist.
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config {} not found, writing defaults", path.display());
            let config = Self::default();
            let json = serde_json::to_string_pretty(&config)?;
            std::fs::write(path, json)
                .with_context(|| format!("cannot write default config to {}", path.display()))?;
            return Ok(config);
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Secrets from the environment win over the file.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = present("TELEGRAM_BOT_TOKEN") {
            self.notification_methods.telegram.bot_token = token;
        }
        if let Some(chat) = present("TELEGRAM_CHAT_ID") {
            self.notification_methods.telegram.chat_id = chat;
        }
        if let Some(password) = present("SMTP_PASSWORD") {
            self.notification_methods.email.email_password = password;
        }
    }

    /// Parsed categories in config order; unknown and repeated slugs are dropped.
    pub fn categories(&self) -> Vec<Category> {
        let mut out = Vec::new();
        for raw in &self.monitored_categories {
            match raw.parse::<Category>() {
                Ok(cat) if !out.contains(&cat) => out.push(cat),
                Ok(_) => {}
                Err(e) => warn!("Ignoring monitored category: {}", e),
            }
        }
        out
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval.max(1))
    }
}
