//! Match containers: one scraped element per candidate match, queried through
//! prioritized selector chains so the pipeline never depends on one layout.

use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};

use crate::record::normalize_text;

/// Ordered CSS selector alternatives; the first one that hits wins.
#[derive(Debug, Clone)]
pub struct SelectorChain {
    hints: Vec<(String, Selector)>,
}

impl SelectorChain {
    pub fn parse(hints: &[&str]) -> Result<Self> {
        let hints = hints
            .iter()
            .map(|h| {
                Selector::parse(h)
                    .map(|sel| (h.to_string(), sel))
                    .map_err(|e| anyhow!("invalid selector '{}': {:?}", h, e))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { hints })
    }

    /// Selector sources in priority order.
    #[cfg(test)]
    pub(crate) fn sources(&self) -> impl Iterator<Item = &str> {
        self.hints.iter().map(|(src, _)| src.as_str())
    }

    pub fn selectors(&self) -> impl Iterator<Item = &Selector> {
        self.hints.iter().map(|(_, sel)| sel)
    }

    /// Containers matched by the first selector that yields any.
    pub fn locate<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        self.selectors()
            .map(|sel| document.select(sel).collect::<Vec<_>>())
            .find(|found| !found.is_empty())
            .unwrap_or_default()
    }
}

/// A raw container supporting full-text access and lookup by selector chain.
pub trait MatchContainer {
    /// All text in the container, whitespace-normalized.
    fn full_text(&self) -> String;

    /// Text of the first element hit by the chain, if any non-empty one exists.
    fn first_text(&self, hints: &SelectorChain) -> Option<String>;

    /// Texts of every element hit by any selector in the chain, in
    /// document order.
    fn all_texts(&self, hints: &SelectorChain) -> Vec<String>;
}

fn element_text(el: &ElementRef<'_>) -> String {
    normalize_text(&el.text().collect::<Vec<_>>().join(" "))
}

impl MatchContainer for ElementRef<'_> {
    fn full_text(&self) -> String {
        element_text(self)
    }

    fn first_text(&self, hints: &SelectorChain) -> Option<String> {
        hints.selectors().find_map(|sel| {
            self.select(sel)
                .map(|el| element_text(&el))
                .find(|text| !text.is_empty())
        })
    }

    fn all_texts(&self, hints: &SelectorChain) -> Vec<String> {
        self.descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .filter(|el| hints.selectors().any(|sel| sel.matches(el)))
            .map(|el| element_text(&el))
            .filter(|text| !text.is_empty())
            .collect()
    }
}
