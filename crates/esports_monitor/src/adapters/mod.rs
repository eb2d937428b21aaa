//! Per-platform scrape adapters.
//!
//! Every adapter follows the same pipeline: fetch page → locate containers →
//! (optional category filter) → extract fields → classify → identity →
//! registry check. Pages are parsed synchronously in [`scan_page`] so no
//! parsed DOM is ever held across an `.await`.

mod duelbits;
mod pinnacle;

pub use duelbits::DuelbitsAdapter;
pub use pinnacle::PinnacleAdapter;

use anyhow::Result;
use async_trait::async_trait;
use scraper::Html;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::category::{Category, Source};
use crate::classifier;
use crate::container::{MatchContainer, SelectorChain};
use crate::fetch::Page;
use crate::filter::filter_by_category;
use crate::record::MatchRecord;
use crate::registry::DedupRegistry;

/// Pause after each category request.
pub const CATEGORY_DELAY: Duration = Duration::from_secs(1);

/// How odds are read from a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OddsMode {
    /// One element holds the whole odds line.
    First,
    /// Each price is its own element; join them with `" | "`.
    JoinAll,
}

/// Selector chains describing one platform's markup.
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub containers: SelectorChain,
    pub teams: SelectorChain,
    pub odds: SelectorChain,
    pub odds_mode: OddsMode,
    pub time: SelectorChain,
    pub league_hint: Option<SelectorChain>,
}

/// Outcome of one category on one platform, for the event log.
#[derive(Debug, Clone)]
pub struct CategoryOutcome {
    pub category: Category,
    pub ok: bool,
    pub items: usize,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct SourceReport {
    pub source: Source,
    pub records: Vec<MatchRecord>,
    pub categories: Vec<CategoryOutcome>,
}

#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn source(&self) -> Source;

    fn category_delay(&self) -> Duration {
        CATEGORY_DELAY
    }

    /// New records of one category. Errors abort only this category.
    async fn fetch_category(&self, category: Category, registry: &DedupRegistry) -> Result<Vec<MatchRecord>>;

    /// Scrape every requested category. Never fails: a broken category
    /// contributes zero records and an error outcome.
    async fn fetch(&self, categories: &[Category], registry: &DedupRegistry) -> SourceReport {
        let source = self.source();
        let mut records = Vec::new();
        let mut outcomes = Vec::with_capacity(categories.len());

        for &category in categories {
            match self.fetch_category(category, registry).await {
                Ok(mut found) => {
                    info!("{} {}: {} new matches", source, category, found.len());
                    outcomes.push(CategoryOutcome {
                        category,
                        ok: true,
                        items: found.len(),
                        message: "ok".to_string(),
                    });
                    records.append(&mut found);
                }
                Err(e) => {
                    warn!("{} {} scrape failed: {:#}", source, category, e);
                    outcomes.push(CategoryOutcome {
                        category,
                        ok: false,
                        items: 0,
                        message: format!("{:#}", e),
                    });
                }
            }

            tokio::time::sleep(self.category_delay()).await;
        }

        SourceReport { source, records, categories: outcomes }
    }
}

#[derive(Debug, Default)]
pub(crate) struct PageScan {
    /// Containers left after location (and filtering, when requested).
    pub containers: usize,
    pub records: Vec<MatchRecord>,
}

/// Parse one page and turn its containers into unseen records.
pub(crate) fn scan_page(
    page: &Page,
    layout: &PageLayout,
    source: Source,
    category: Category,
    filter: bool,
    registry: &DedupRegistry,
) -> PageScan {
    if !page.is_success() {
        warn!("{} {}: HTTP {} on {}", source, category, page.status, page.url);
        return PageScan::default();
    }

    let document = Html::parse_document(&page.body);
    let mut containers = layout.containers.locate(&document);
    if filter && !containers.is_empty() {
        let before = containers.len();
        containers = filter_by_category(containers, category);
        debug!("{} {}: filter kept {}/{} containers on {}", source, category, containers.len(), before, page.url);
    }

    let records = containers
        .iter()
        .filter_map(|c| extract_record(c, layout, source, category, &page.url))
        .filter(|rec| {
            let seen = registry.contains(&rec.id);
            if seen {
                debug!("already alerted: {} ({})", rec.teams, rec.id);
            }
            !seen
        })
        .collect();

    PageScan { containers: containers.len(), records }
}

/// Build a record from one container; `None` when teams or odds are missing.
pub(crate) fn extract_record<C: MatchContainer>(
    container: &C,
    layout: &PageLayout,
    source: Source,
    category: Category,
    url: &str,
) -> Option<MatchRecord> {
    let Some(teams) = container.first_text(&layout.teams) else {
        debug!("{} {}: skipping container without teams", source, category);
        return None;
    };

    let odds = match layout.odds_mode {
        OddsMode::First => container.first_text(&layout.odds),
        OddsMode::JoinAll => {
            let prices = container.all_texts(&layout.odds);
            (!prices.is_empty()).then(|| prices.join(" | "))
        }
    };
    let Some(odds) = odds else {
        debug!("{} {}: skipping '{}' without odds", source, category, teams);
        return None;
    };

    let time = container.first_text(&layout.time);
    let full_text = container.full_text();
    let league = classifier::classify(category, &full_text);

    if let Some(hint) = layout.league_hint.as_ref().and_then(|h| container.first_text(h)) {
        if hint != league.name {
            debug!("{} {}: scraped league '{}' replaced by '{}'", source, category, hint, league);
        }
    }

    Some(MatchRecord::new(source, category, &teams, &odds, time.as_deref(), league, url))
}
