/// Betting Monitor: Logger
/// JSONL event stream (one file per UTC day)

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct EventLogger {
    log_dir: PathBuf,
}

impl EventLogger {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        let dir = log_dir.into();
        fs::create_dir_all(&dir).ok();
        Self { log_dir: dir }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn log<T: Serialize>(&self, event: &T) -> Result<()> {
        let date  = Utc::now().format("%Y-%m-%d").to_string();
        let path  = self.log_dir.join(format!("{date}.jsonl"));
        let line  = serde_json::to_string(event)?;
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("cannot open event log {}", path.display()))?;
        writeln!(f, "{line}")?;
        Ok(())
    }
}

pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

// ── Event typy ────────────────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
pub struct MatchAlertEvent {
    pub ts:             String,
    pub event:          &'static str,   // "MATCH_ALERT"
    pub id:             String,
    pub platform:       String,
    pub category:       String,
    pub league:         String,
    pub teams:          String,
    pub odds:           String,
    pub scheduled_time: String,
    pub url:            String,
}

#[derive(Serialize, Debug)]
pub struct ApiStatusEvent {
    pub ts:           String,
    pub event:        &'static str,   // "API_STATUS"
    pub source:       String,
    pub scope:        String,         // category slug
    pub ok:           bool,
    pub status_code:  Option<u16>,
    pub message:      String,
    pub items_logged: usize,
}

#[derive(Serialize, Debug)]
pub struct NotifyStatusEvent {
    pub ts:      String,
    pub event:   &'static str,   // "NOTIFY_STATUS"
    pub channel: String,
    pub ok:      bool,
    pub matches: usize,
    pub message: String,
}

#[derive(Serialize, Debug)]
pub struct CycleHeartbeatEvent {
    pub ts:               String,
    pub event:            &'static str,   // "CYCLE_HEARTBEAT"
    pub check_interval_secs: u64,
    pub enabled_sources:  usize,
    pub new_matches:      usize,
    pub dispatched:       bool,
    pub registry_size:    usize,
}
