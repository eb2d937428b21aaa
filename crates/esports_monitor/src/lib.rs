/// Betting Monitor: Esports Monitor
///
/// Scrapes DuelBits and Pinnacle esports listings (LoL, CS), classifies
/// every match into a league tier and hands unseen matches to the
/// notification channels.
///
/// Pipeline per cycle:
///   adapter → containers → (category filter) → fields → classifier
///   → identity → dedup registry → digest → registry update

pub mod adapters;
pub mod category;
pub mod classifier;
pub mod config;
pub mod container;
pub mod fetch;
pub mod filter;
pub mod monitor;
pub mod record;
pub mod registry;

pub use adapters::{DuelbitsAdapter, PinnacleAdapter, SourceAdapter, SourceReport};
pub use category::{Category, Source};
pub use classifier::{classify, LeagueLabel, Tier};
pub use config::AppConfig;
pub use fetch::{HttpFetcher, Page, PageFetcher};
pub use filter::filter_by_category;
pub use monitor::{forward_interrupts, AlertSink, CycleReport, Monitor};
pub use record::{MatchId, MatchRecord};
pub use registry::DedupRegistry;
