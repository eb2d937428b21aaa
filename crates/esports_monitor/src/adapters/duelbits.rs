//! DuelBits: div-based match cards.
//!
//! Category pages are unreliable (often empty or 404), so when one yields no
//! cards the generic esports listings are scanned and narrowed with the
//! category filter.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{scan_page, OddsMode, PageLayout, SourceAdapter, CATEGORY_DELAY};
use crate::category::{Category, Source};
use crate::container::SelectorChain;
use crate::fetch::PageFetcher;
use crate::record::MatchRecord;
use crate::registry::DedupRegistry;

pub const LOL_URL: &str = "https://duelbits.com/esports/league-of-legends";
pub const CS_URL: &str = "https://duelbits.com/esports/counter-strike";

/// General listings, tried in order.
pub const FALLBACK_URLS: [&str; 4] = [
    "https://duelbits.com/esports",
    "https://duelbits.com/sports/esports",
    "https://duelbits.com/esports/lol",
    "https://duelbits.com/esports/cs2",
];

const CONTAINERS: &[&str] = &["div.match-card", "div.event-item", "div.game-row", "div.match-row", "div.esports-event"];
const TEAMS: &[&str] = &["div.teams", "div.match-teams", "div.participants", "div.competitors"];
const ODDS: &[&str] = &["div.odds", "div.match-odds", "div.prices", "div.betting-odds"];
const TIME: &[&str] = &["div.time", "div.match-time", "div.start-time", "div.event-time"];
const LEAGUE: &[&str] = &["div.league", "div.tournament", "div.competition", "div.event-league"];

pub struct DuelbitsAdapter {
    fetcher: Arc<dyn PageFetcher>,
    layout: PageLayout,
    delay: Duration,
}

impl DuelbitsAdapter {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        let layout = PageLayout {
            containers: SelectorChain::parse(CONTAINERS)?,
            teams: SelectorChain::parse(TEAMS)?,
            odds: SelectorChain::parse(ODDS)?,
            odds_mode: OddsMode::First,
            time: SelectorChain::parse(TIME)?,
            league_hint: Some(SelectorChain::parse(LEAGUE)?),
        };
        Ok(Self { fetcher, layout, delay: CATEGORY_DELAY })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn category_url(category: Category) -> &'static str {
        match category {
            Category::Lol => LOL_URL,
            Category::CounterStrike => CS_URL,
        }
    }

    async fn fetch_fallback(&self, category: Category, registry: &DedupRegistry) -> Vec<MatchRecord> {
        for url in FALLBACK_URLS {
            let page = match self.fetcher.fetch(url).await {
                Ok(page) => page,
                Err(e) => {
                    debug!("DuelBits fallback {} failed: {:#}", url, e);
                    continue;
                }
            };

            let scan = scan_page(&page, &self.layout, Source::DuelBits, category, true, registry);
            if scan.containers > 0 {
                info!("DuelBits {}: {} containers via fallback {}", category, scan.containers, url);
                return scan.records;
            }
        }

        warn!("DuelBits {}: no containers on any fallback listing", category);
        Vec::new()
    }
}

#[async_trait]
impl SourceAdapter for DuelbitsAdapter {
    fn source(&self) -> Source {
        Source::DuelBits
    }

    fn category_delay(&self) -> Duration {
        self.delay
    }

    async fn fetch_category(&self, category: Category, registry: &DedupRegistry) -> Result<Vec<MatchRecord>> {
        let url = Self::category_url(category);
        let page = self.fetcher.fetch(url).await?;

        let scan = scan_page(&page, &self.layout, Source::DuelBits, category, false, registry);
        if scan.containers > 0 {
            return Ok(scan.records);
        }

        debug!("DuelBits {}: no containers on {}, trying fallback listings", category, url);
        Ok(self.fetch_fallback(category, registry).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::tests::FakeFetcher;

    const LOL_PAGE: &str = r#"
        <html><body>
          <div class="match-card">
            <div class="league">LCK</div>
            <div class="teams">T1 vs Gen.G</div>
            <div class="odds">1.65 2.20</div>
            <div class="time">Today 10:00</div>
          </div>
          <div class="match-card">
            <div class="teams">Hanwha Life vs DRX</div>
          </div>
        </body></html>
    "#;

    const GENERAL_PAGE: &str = r#"
        <html><body>
          <div class="esports-event">
            <div class="tournament">League of Legends - LEC</div>
            <div class="competitors">G2 vs Fnatic</div>
            <div class="betting-odds">1.55 2.40</div>
          </div>
          <div class="esports-event">
            <div class="tournament">Dota 2 - The International</div>
            <div class="competitors">Team Spirit vs Tundra</div>
            <div class="betting-odds">1.90 1.90</div>
          </div>
          <div class="esports-event">
            <div class="tournament">LoL - LCK Challengers</div>
            <div class="competitors">T1 Academy vs KT Academy</div>
            <div class="betting-odds">1.70 2.10</div>
            <div class="event-time">Tomorrow 08:00</div>
          </div>
          <div class="esports-event">
            <div class="tournament">Valorant Champions Tour</div>
            <div class="competitors">Sentinels vs Fnatic</div>
            <div class="betting-odds">2.00 1.80</div>
          </div>
        </body></html>
    "#;

    fn adapter(fetcher: FakeFetcher) -> (Arc<FakeFetcher>, DuelbitsAdapter) {
        let fetcher = Arc::new(fetcher);
        let adapter = DuelbitsAdapter::new(fetcher.clone()).unwrap().with_delay(Duration::ZERO);
        (fetcher, adapter)
    }

    #[tokio::test]
    async fn category_page_extracts_and_skips_incomplete_cards() {
        let (fetcher, adapter) = adapter(FakeFetcher::default().page(LOL_URL, LOL_PAGE));
        let registry = DedupRegistry::new();

        let records = adapter.fetch_category(Category::Lol, &registry).await.unwrap();
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.teams, "T1 vs Gen.G");
        assert_eq!(rec.odds, "1.65 2.20");
        assert_eq!(rec.scheduled_time, "Today 10:00");
        assert_eq!(rec.league.to_string(), "🏆 LCK");
        assert_eq!(rec.source_url, LOL_URL);
        assert_eq!(fetcher.requested(), vec![LOL_URL]);
    }

    #[tokio::test]
    async fn empty_category_page_falls_back_and_filters() {
        let fetcher = FakeFetcher::default()
            .page(LOL_URL, "<html><body><p>No events</p></body></html>")
            .page(FALLBACK_URLS[0], GENERAL_PAGE);
        let (fetcher, adapter) = adapter(fetcher);

        let records = adapter.fetch_category(Category::Lol, &DedupRegistry::new()).await.unwrap();
        let teams: Vec<&str> = records.iter().map(|r| r.teams.as_str()).collect();
        assert_eq!(teams, vec!["G2 vs Fnatic", "T1 Academy vs KT Academy"]);
        assert!(records.iter().all(|r| r.source_url == FALLBACK_URLS[0]));
        assert_eq!(records[0].league.name, "LEC EMEA");
        assert_eq!(records[1].scheduled_time, "Tomorrow 08:00");
        // stopped at the first productive listing
        assert_eq!(fetcher.requested(), vec![LOL_URL, FALLBACK_URLS[0]]);
    }

    #[tokio::test]
    async fn fallback_skips_dead_and_unrelated_listings() {
        let only_valorant = r#"<div class="match-row"><div class="teams">SEN vs FNC</div><div class="odds">2.0</div>Valorant</div>"#;
        let cs_listing = r#"<div class="game-row"><div class="teams">NAVI vs FaZe</div><div class="odds">1.9 1.9</div>CS2 - IEM Cologne</div>"#;
        let fetcher = FakeFetcher::default()
            .status(CS_URL, 404)
            // FALLBACK_URLS[0] is not served → transport error
            .page(FALLBACK_URLS[1], only_valorant)
            .page(FALLBACK_URLS[2], cs_listing)
            .page(FALLBACK_URLS[3], cs_listing);
        let (fetcher, adapter) = adapter(fetcher);

        let records = adapter
            .fetch_category(Category::CounterStrike, &DedupRegistry::new())
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].league.to_string(), "👑 IEM");
        assert_eq!(records[0].source_url, FALLBACK_URLS[2]);
        assert_eq!(fetcher.requested().len(), 4);
    }

    #[tokio::test]
    async fn unreachable_category_page_is_a_category_failure() {
        let (_, adapter) = adapter(FakeFetcher::default().page(CS_URL, LOL_PAGE));
        let report = adapter
            .fetch(&[Category::Lol, Category::CounterStrike], &DedupRegistry::new())
            .await;

        assert_eq!(report.source, Source::DuelBits);
        assert_eq!(report.categories.len(), 2);
        assert!(!report.categories[0].ok);
        assert!(report.categories[1].ok);
        // the CS page still yields records
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].category, Category::CounterStrike);
    }
}
