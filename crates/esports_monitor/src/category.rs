use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Monitored esports title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "lol")]
    Lol,
    #[serde(rename = "counter_strike")]
    CounterStrike,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Lol, Category::CounterStrike];

    /// Config / identity slug.
    pub fn slug(self) -> &'static str {
        match self {
            Category::Lol => "lol",
            Category::CounterStrike => "counter_strike",
        }
    }

    /// Title keywords used by the fallback filter, lowercase.
    pub fn title_keywords(self) -> &'static [&'static str] {
        match self {
            Category::Lol => &["league of legends", "lol", "rift"],
            Category::CounterStrike => &["counter-strike", "cs2", "cs:go"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lol" | "league_of_legends" => Ok(Category::Lol),
            "counter_strike" | "cs2" | "cs" => Ok(Category::CounterStrike),
            other => Err(anyhow::anyhow!("unknown category '{}'", other)),
        }
    }
}

/// Betting platform a record was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    DuelBits,
    Pinnacle,
}

impl Source {
    pub fn slug(self) -> &'static str {
        match self {
            Source::DuelBits => "duelbits",
            Source::Pinnacle => "pinnacle",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::DuelBits => f.write_str("DuelBits"),
            Source::Pinnacle => f.write_str("Pinnacle"),
        }
    }
}
