//! Orchestrator: one cycle = every enabled adapter in turn, one digest to
//! every channel, then registry update. The loop never exits on its own;
//! only the shutdown signal ends it.

use anyhow::Result;
use async_trait::async_trait;
use logger::{now_iso, ApiStatusEvent, CycleHeartbeatEvent, EventLogger, MatchAlertEvent, NotifyStatusEvent};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::adapters::{SourceAdapter, SourceReport};
use crate::category::Category;
use crate::record::MatchRecord;
use crate::registry::DedupRegistry;

/// Wait after a failed cycle.
pub const RETRY_BACKOFF: Duration = Duration::from_secs(60);

/// Outbound notification channel.
#[async_trait]
pub trait AlertSink: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver one digest covering all `records`.
    async fn send(&self, records: &[MatchRecord]) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    /// Records dispatched (or attempted) this cycle.
    pub new_matches: Vec<MatchRecord>,
    pub delivered: Vec<String>,
    pub failed: Vec<String>,
}

pub struct Monitor {
    adapters: Vec<Box<dyn SourceAdapter>>,
    sinks: Vec<Box<dyn AlertSink>>,
    categories: Vec<Category>,
    registry: DedupRegistry,
    logger: EventLogger,
    check_interval: Duration,
    retry_backoff: Duration,
}

impl Monitor {
    pub fn new(categories: Vec<Category>, logger: EventLogger, check_interval: Duration) -> Self {
        Self {
            adapters: Vec::new(),
            sinks: Vec::new(),
            categories,
            registry: DedupRegistry::new(),
            logger,
            check_interval,
            retry_backoff: RETRY_BACKOFF,
        }
    }

    pub fn with_adapter(mut self, adapter: Box<dyn SourceAdapter>) -> Self {
        self.adapters.push(adapter);
        self
    }

    pub fn with_sink(mut self, sink: Box<dyn AlertSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn registry(&self) -> &DedupRegistry {
        &self.registry
    }

    pub fn adapter_count(&self) -> usize {
        self.adapters.len()
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// One full pass. Adapter and channel failures are absorbed here; an
    /// `Err` means the cycle itself broke (e.g. the event log is unwritable).
    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        info!("--- Monitoring cycle ---");

        let mut batch = Vec::new();
        for adapter in &self.adapters {
            info!("Scraping {}...", adapter.source());
            let report = adapter.fetch(&self.categories, &self.registry).await;
            self.log_source_report(&report);
            batch.extend(report.records);
        }

        let fresh = self.registry.fresh(batch);
        let mut report = CycleReport::default();

        if fresh.is_empty() {
            info!("No new matches this cycle");
        } else {
            info!("Found {} new matches, notifying {} channel(s)", fresh.len(), self.sinks.len());
            self.dispatch(&fresh, &mut report).await;

            // Marked even when every channel failed.
            if report.delivered.is_empty() && !self.sinks.is_empty() {
                warn!("Every channel failed for {} matches", fresh.len());
            }
            self.registry.mark_all(&fresh);
            for rec in &fresh {
                let _ = self.logger.log(&alert_event(rec));
            }
            report.new_matches = fresh;
        }

        self.logger.log(&CycleHeartbeatEvent {
            ts: now_iso(),
            event: "CYCLE_HEARTBEAT",
            check_interval_secs: self.check_interval.as_secs(),
            enabled_sources: self.adapters.len(),
            new_matches: report.new_matches.len(),
            dispatched: !report.new_matches.is_empty(),
            registry_size: self.registry.len(),
        })?;

        Ok(report)
    }

    async fn dispatch(&self, records: &[MatchRecord], report: &mut CycleReport) {
        for sink in &self.sinks {
            let (ok, message) = match sink.send(records).await {
                Ok(()) => {
                    info!("{}: sent digest with {} matches", sink.name(), records.len());
                    report.delivered.push(sink.name().to_string());
                    (true, "ok".to_string())
                }
                Err(e) => {
                    warn!("{}: delivery failed: {:#}", sink.name(), e);
                    report.failed.push(sink.name().to_string());
                    (false, format!("{:#}", e))
                }
            };

            let _ = self.logger.log(&NotifyStatusEvent {
                ts: now_iso(),
                event: "NOTIFY_STATUS",
                channel: sink.name().to_string(),
                ok,
                matches: records.len(),
                message,
            });
        }

        if self.sinks.is_empty() {
            for rec in records {
                info!("[no channel] {} {} | {} | {}", rec.source, rec.league, rec.teams, rec.odds);
            }
        }
    }

    fn log_source_report(&self, report: &SourceReport) {
        for outcome in &report.categories {
            let _ = self.logger.log(&ApiStatusEvent {
                ts: now_iso(),
                event: "API_STATUS",
                source: report.source.slug().to_string(),
                scope: outcome.category.slug().to_string(),
                ok: outcome.ok,
                status_code: None,
                message: outcome.message.clone(),
                items_logged: outcome.items,
            });
        }
    }

    /// Cycle, sleep, repeat until `shutdown` turns true. The flag is checked
    /// between cycles; a running cycle always finishes.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        loop {
            if *shutdown.borrow() {
                info!("Shutdown requested, monitoring stopped");
                break;
            }

            let wait = match self.run_cycle().await {
                Ok(_) => {
                    info!("Sleeping {}s until next cycle", self.check_interval.as_secs());
                    self.check_interval
                }
                Err(e) => {
                    error!("Monitoring cycle failed: {:#}", e);
                    info!("Retrying in {}s", self.retry_backoff.as_secs());
                    self.retry_backoff
                }
            };

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                Ok(()) = shutdown.changed() => {}
            }
        }
    }
}

/// Turns the first interrupt into a shutdown request for [`Monitor::run`].
/// Returns `true` when a second interrupt arrives, meaning the caller should
/// abort without waiting for the running cycle.
pub async fn forward_interrupts<S, F>(mut interrupt: S, shutdown: watch::Sender<bool>) -> bool
where
    S: FnMut() -> F,
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = interrupt().await {
        warn!("Cannot listen for Ctrl-C: {}", e);
        return false;
    }
    info!("Ctrl-C received, finishing current cycle (press again to abort)...");
    let _ = shutdown.send(true);

    if interrupt().await.is_err() {
        return false;
    }
    warn!("Second Ctrl-C, aborting");
    true
}

fn alert_event(rec: &MatchRecord) -> MatchAlertEvent {
    MatchAlertEvent {
        ts: now_iso(),
        event: "MATCH_ALERT",
        id: rec.id.to_string(),
        platform: rec.source.to_string(),
        category: rec.category.slug().to_string(),
        league: rec.league.to_string(),
        teams: rec.teams.clone(),
        odds: rec.odds.clone(),
        scheduled_time: rec.scheduled_time.clone(),
        url: rec.source_url.clone(),
    }
}
