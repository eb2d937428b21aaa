//! Pinnacle: event rows with span fields, one span per price.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::{scan_page, OddsMode, PageLayout, SourceAdapter, CATEGORY_DELAY};
use crate::category::{Category, Source};
use crate::container::SelectorChain;
use crate::fetch::PageFetcher;
use crate::record::MatchRecord;
use crate::registry::DedupRegistry;

pub const LOL_URL: &str = "https://www.pinnacle.com/en/esports/league-of-legends";
pub const CS_URL: &str = "https://www.pinnacle.com/en/esports/counter-strike";

const CONTAINERS: &[&str] = &["div.event", "div.match", "div.game-row"];
const TEAMS: &[&str] = &["span.participants", "span.teams"];
const ODDS: &[&str] = &["span.price", "span.odd"];
const TIME: &[&str] = &["span.start-time", "span.time"];

pub struct PinnacleAdapter {
    fetcher: Arc<dyn PageFetcher>,
    layout: PageLayout,
    delay: Duration,
}

impl PinnacleAdapter {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        let layout = PageLayout {
            containers: SelectorChain::parse(CONTAINERS)?,
            teams: SelectorChain::parse(TEAMS)?,
            odds: SelectorChain::parse(ODDS)?,
            odds_mode: OddsMode::JoinAll,
            time: SelectorChain::parse(TIME)?,
            league_hint: None,
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
}

#[async_trait]
impl SourceAdapter for PinnacleAdapter {
    fn source(&self) -> Source {
        Source::Pinnacle
    }

    fn category_delay(&self) -> Duration {
        self.delay
    }

    async fn fetch_category(&self, category: Category, registry: &DedupRegistry) -> Result<Vec<MatchRecord>> {
        let page = self.fetcher.fetch(Self::category_url(category)).await?;
        Ok(scan_page(&page, &self.layout, Source::Pinnacle, category, false, registry).records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::tests::FakeFetcher;

    const CS_PAGE: &str = r#"
        <html><body>
          <div class="match">
            <span class="participants">Vitality vs MOUZ</span>
            <span class="price">1.45</span><span class="price">2.75</span>
            <span class="time">Sat 14:30</span>
            <span class="league-name">BLAST Premier Spring Final</span>
          </div>
          <div class="match">
            <span class="teams">Eternal Fire vs 3DMAX</span>
            <span class="odd">1.95</span>
          </div>
          <div class="match">
            <span class="teams">Team with no prices</span>
          </div>
        </body></html>
    "#;

    #[tokio::test]
    async fn joins_prices_and_classifies() {
        let fetcher = Arc::new(FakeFetcher::default().page(CS_URL, CS_PAGE));
        let adapter = PinnacleAdapter::new(fetcher).unwrap().with_delay(Duration::ZERO);

        let records = adapter
            .fetch_category(Category::CounterStrike, &DedupRegistry::new())
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].teams, "Vitality vs MOUZ");
        assert_eq!(records[0].odds, "1.45 | 2.75");
        assert_eq!(records[0].scheduled_time, "Sat 14:30");
        assert_eq!(records[0].league.to_string(), "👑 BLAST Premier");
        assert_eq!(records[1].odds, "1.95");
        assert_eq!(records[1].scheduled_time, "unknown");
        assert_eq!(records[1].league.to_string(), "🔫 CS - Tournament not identified");
        assert!(records.iter().all(|r| r.source == Source::Pinnacle && r.source_url == CS_URL));
    }

    #[tokio::test]
    async fn mixed_price_spans_are_all_joined() {
        let page = r#"<div class="event">
            <span class="teams">FURIA vs paiN</span>
            <span class="odd">1.90</span><span class="price">2.00</span>
        </div>"#;
        let fetcher = Arc::new(FakeFetcher::default().page(CS_URL, page));
        let adapter = PinnacleAdapter::new(fetcher).unwrap().with_delay(Duration::ZERO);

        let records = adapter
            .fetch_category(Category::CounterStrike, &DedupRegistry::new())
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].odds, "1.90 | 2.00");
    }

    #[tokio::test]
    async fn error_status_yields_no_records() {
        let fetcher = Arc::new(FakeFetcher::default().status(LOL_URL, 403));
        let adapter = PinnacleAdapter::new(fetcher).unwrap().with_delay(Duration::ZERO);
        let report = adapter.fetch(&[Category::Lol], &DedupRegistry::new()).await;
        assert!(report.records.is_empty());
        assert!(report.categories[0].ok);
    }

    #[tokio::test]
    async fn registry_hits_are_dropped() {
        let fetcher = Arc::new(FakeFetcher::default().page(CS_URL, CS_PAGE));
        let adapter = PinnacleAdapter::new(fetcher).unwrap().with_delay(Duration::ZERO);

        let mut registry = DedupRegistry::new();
        let first = adapter.fetch_category(Category::CounterStrike, &registry).await.unwrap();
        registry.mark_all(&first);

        let again = adapter.fetch_category(Category::CounterStrike, &registry).await.unwrap();
        assert!(again.is_empty());
    }
}
