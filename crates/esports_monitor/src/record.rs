use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

use crate::category::{Category, Source};
use crate::classifier::LeagueLabel;

/// Placeholder for a missing scheduled time.
pub const UNKNOWN_TIME: &str = "unknown";

/// NFKC + collapse whitespace runs + trim.
pub fn normalize_text(raw: &str) -> String {
    static WS: OnceLock<Regex> = OnceLock::new();
    let ws = WS.get_or_init(|| Regex::new(r"\s+").expect("static regex"));
    let nfkc: String = raw.nfkc().collect();
    ws.replace_all(nfkc.trim(), " ").into_owned()
}

/// Dedup key of a scraped match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    /// `<source>_<category>_<sha256 hex>` over the normalized tuple.
    ///
    /// Two listings with the same teams, time and league on the same
    /// source/category collapse into one id.
    pub fn derive(
        source: Source,
        category: Category,
        teams: &str,
        scheduled_time: &str,
        league: &LeagueLabel,
    ) -> Self {
        let teams = normalize_text(teams);
        let scheduled_time = normalize_text(scheduled_time);
        let league = league.to_string();

        let mut hasher = Sha256::new();
        for part in [source.slug(), category.slug(), teams.as_str(), scheduled_time.as_str(), league.as_str()] {
            hasher.update(part.as_bytes());
            hasher.update([0x1fu8]);
        }
        MatchId(format!("{}_{}_{}", source.slug(), category.slug(), hex::encode(hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MatchId {
    fn from(raw: &str) -> Self {
        MatchId(raw.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub id: MatchId,
    pub source: Source,
    pub category: Category,
    pub teams: String,
    pub odds: String,
    pub scheduled_time: String,
    pub league: LeagueLabel,
    pub source_url: String,
}

impl MatchRecord {
    /// Normalizes display fields and derives the identity.
    pub fn new(
        source: Source,
        category: Category,
        teams: &str,
        odds: &str,
        scheduled_time: Option<&str>,
        league: LeagueLabel,
        source_url: &str,
    ) -> Self {
        let teams = normalize_text(teams);
        let scheduled_time = scheduled_time
            .map(normalize_text)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNKNOWN_TIME.to_string());
        let id = MatchId::derive(source, category, &teams, &scheduled_time, &league);

        Self {
            id,
            source,
            category,
            teams,
            odds: normalize_text(odds),
            scheduled_time,
            league,
            source_url: source_url.to_string(),
        }
    }
}
