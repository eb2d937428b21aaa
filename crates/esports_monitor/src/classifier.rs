//! League / tournament classifier.
//!
//! Ordered keyword cascade per category: first rule whose keywords appear in
//! the lowercased text wins. Rules never compete on specificity, so table
//! order is the whole contract (e.g. "emea masters" is caught by the LEC
//! rule before the EMEA Masters rule is reached).

use crate::category::Category;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Premier,
    Top,
    Second,
    Tournament,
    Unresolved,
}

#[derive(Debug)]
pub struct LeagueRule {
    pub tier: Tier,
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    /// Rule is skipped when any of these appear.
    pub excludes: &'static [&'static str],
}

impl LeagueRule {
    const fn new(tier: Tier, name: &'static str, keywords: &'static [&'static str]) -> Self {
        Self { tier, name, keywords, excludes: &[] }
    }

    fn matches(&self, lower: &str) -> bool {
        self.keywords.iter().any(|k| lower.contains(k))
            && !self.excludes.iter().any(|x| lower.contains(x))
    }
}

const LOL_RULES: &[LeagueRule] = &[
    LeagueRule::new(Tier::Top, "LTA Norte", &["lta norte", "lta north", "americas north"]),
    LeagueRule::new(Tier::Top, "LTA Sul", &["lta sul", "lta south", "americas south"]),
    LeagueRule::new(Tier::Top, "LEC EMEA", &["lec", "emea"]),
    LeagueRule::new(Tier::Top, "LCK", &["lck"]),
    LeagueRule::new(Tier::Top, "LPL", &["lpl"]),
    LeagueRule::new(Tier::Top, "LCP", &["lcp", "pacific"]),
    LeagueRule::new(Tier::Second, "EMEA Masters", &["emea masters", "masters emea"]),
    LeagueRule::new(Tier::Second, "TCL", &["tcl"]),
    LeagueRule::new(Tier::Second, "LVP", &["lvp"]),
    LeagueRule::new(Tier::Second, "Prime League", &["prime league", "primeleague"]),
    LeagueRule::new(Tier::Second, "Ultraliga", &["ultraliga"]),
    LeagueRule::new(Tier::Second, "VCS", &["vcs"]),
    LeagueRule::new(Tier::Second, "LJL", &["ljl"]),
    LeagueRule::new(Tier::Second, "PCS", &["pcs"]),
    LeagueRule::new(Tier::Tournament, "Worlds", &["worlds", "world championship"]),
    LeagueRule::new(Tier::Tournament, "MSI", &["msi", "mid-season"]),
    LeagueRule::new(Tier::Tournament, "First Stand", &["first stand"]),
];

const CS_RULES: &[LeagueRule] = &[
    LeagueRule::new(Tier::Premier, "PGL Major", &["pgl major", "major championship"]),
    LeagueRule::new(Tier::Premier, "BLAST Premier", &["blast premier", "blast pro"]),
    LeagueRule::new(Tier::Premier, "IEM", &["iem", "intel extreme masters"]),
    LeagueRule::new(Tier::Top, "ESL Pro League", &["esl pro league", "pro league"]),
    LeagueRule::new(Tier::Top, "ESL Pro Tour", &["esl pro tour", "pro tour"]),
    LeagueRule {
        tier: Tier::Top,
        name: "PGL Tournament",
        keywords: &["pgl"],
        excludes: &["major"],
    },
    LeagueRule::new(Tier::Second, "ESL Challenger", &["esl challenger", "challenger league"]),
    LeagueRule::new(Tier::Second, "FACEiT", &["faceit"]),
    LeagueRule::new(Tier::Second, "ESEA", &["esea"]),
    LeagueRule::new(Tier::Second, "Qualifier", &["qualifier", "qualif"]),
];

/// Rule table for a category, in evaluation order.
pub fn rules(category: Category) -> &'static [LeagueRule] {
    match category {
        Category::Lol => LOL_RULES,
        Category::CounterStrike => CS_RULES,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeagueLabel {
    pub category: Category,
    pub tier: Tier,
    pub name: &'static str,
}

impl LeagueLabel {
    pub fn unresolved(category: Category) -> Self {
        let name = match category {
            Category::Lol => "LoL - League not identified",
            Category::CounterStrike => "CS - Tournament not identified",
        };
        Self { category, tier: Tier::Unresolved, name }
    }

    pub fn is_resolved(&self) -> bool {
        self.tier != Tier::Unresolved
    }

    fn marker(&self) -> &'static str {
        match (self.tier, self.category) {
            (Tier::Premier, _) => "👑",
            (Tier::Top, _) => "🏆",
            (Tier::Second, _) => "🥈",
            (Tier::Tournament, _) => "🌍",
            (Tier::Unresolved, Category::Lol) => "🎮",
            (Tier::Unresolved, Category::CounterStrike) => "🔫",
        }
    }
}

impl fmt::Display for LeagueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.marker(), self.name)
    }
}

/// Classify free text (usually a container's full text) into a league label.
pub fn classify(category: Category, text: &str) -> LeagueLabel {
    let lower = text.to_lowercase();
    rules(category)
        .iter()
        .find(|rule| rule.matches(&lower))
        .map(|rule| LeagueLabel { category, tier: rule.tier, name: rule.name })
        .unwrap_or_else(|| LeagueLabel::unresolved(category))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_beats_qualifier() {
        let label = classify(Category::CounterStrike, "PGL Major Copenhagen qualifier");
        assert_eq!(label.name, "PGL Major");
        assert_eq!(label.tier, Tier::Premier);
        assert_eq!(label.to_string(), "👑 PGL Major");
    }

    #[test]
    fn top_tier_beats_second_tier() {
        let label = classify(Category::Lol, "LCK Spring vs Prime League relegation");
        assert_eq!(label.name, "LCK");
        assert_eq!(label.tier, Tier::Top);
    }

    #[test]
    fn emea_masters_is_shadowed_by_lec() {
        let label = classify(Category::Lol, "EMEA Masters Summer");
        assert_eq!(label.name, "LEC EMEA");
    }

    #[test]
    fn pgl_without_major_is_pgl_tournament() {
        assert_eq!(classify(Category::CounterStrike, "PGL Bucharest").name, "PGL Tournament");
        // "major" present but not as "pgl major" → neither PGL rule
        assert_eq!(classify(Category::CounterStrike, "PGL Astana Major").tier, Tier::Unresolved);
    }

    #[test]
    fn case_insensitive_and_synonyms() {
        assert_eq!(classify(Category::CounterStrike, "INTEL EXTREME MASTERS Katowice").name, "IEM");
        assert_eq!(classify(Category::Lol, "Americas South week 3").name, "LTA Sul");
        assert_eq!(classify(Category::Lol, "Mid-Season Invitational").name, "MSI");
    }

    #[test]
    fn unmatched_text_is_unresolved_sentinel() {
        let lol = classify(Category::Lol, "Team A vs Team B 1.85 1.95");
        assert!(!lol.is_resolved());
        assert_eq!(lol.to_string(), "🎮 LoL - League not identified");

        let cs = classify(Category::CounterStrike, "");
        assert_eq!(cs, LeagueLabel::unresolved(Category::CounterStrike));
        assert_eq!(cs.to_string(), "🔫 CS - Tournament not identified");
    }

    #[test]
    fn classification_is_deterministic() {
        let text = "BLAST Premier World Final - NAVI vs Vitality";
        let first = classify(Category::CounterStrike, text);
        for _ in 0..5 {
            assert_eq!(classify(Category::CounterStrike, text), first);
        }
    }

    #[test]
    fn tables_are_partitioned_by_category() {
        // "lck" means nothing to the CS table
        assert!(!classify(Category::CounterStrike, "LCK").is_resolved());
        assert!(!classify(Category::Lol, "ESEA Advanced").is_resolved());
    }
}
