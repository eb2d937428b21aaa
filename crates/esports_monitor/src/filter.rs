//! Recall-oriented category filter for generic esports listing pages.

use crate::category::Category;
use crate::classifier;
use crate::container::MatchContainer;

/// Alternate spellings of league names seen on listing pages, lowercase.
fn league_aliases(category: Category) -> &'static [&'static str] {
    match category {
        Category::Lol => &["world championship", "mid-season invitational"],
        Category::CounterStrike => &["intel extreme masters", "pgl"],
    }
}

/// True when the lowercased text mentions the title or a league name the
/// classifier knows for this category. Only names count: short classifier
/// keywords (`emea`, `lec`, `pacific`) also occur in other titles' leagues.
pub fn mentions_category(category: Category, text: &str) -> bool {
    let lower = text.to_lowercase();

    if category.title_keywords().iter().any(|k| lower.contains(k)) {
        return true;
    }

    classifier::rules(category)
        .iter()
        .any(|rule| lower.contains(&rule.name.to_lowercase()))
        || league_aliases(category).iter().any(|a| lower.contains(a))
}

/// Keep containers belonging to `category`, preserving order.
pub fn filter_by_category<C: MatchContainer>(containers: Vec<C>, category: Category) -> Vec<C> {
    containers
        .into_iter()
        .filter(|c| mentions_category(category, &c.full_text()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::tests::FakeContainer;

    fn texts(containers: &[FakeContainer]) -> Vec<&str> {
        containers.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn empty_in_empty_out() {
        let kept = filter_by_category(Vec::<FakeContainer>::new(), Category::Lol);
        assert!(kept.is_empty());
    }

    #[test]
    fn all_matching_list_is_unchanged() {
        let input = vec![
            FakeContainer::text("League of Legends: T1 vs Gen.G"),
            FakeContainer::text("league of legends — G2 vs FNC"),
            FakeContainer::text("LEAGUE OF LEGENDS BLG vs JDG"),
        ];
        let expected: Vec<String> = input.iter().map(|c| c.text.clone()).collect();
        let kept = filter_by_category(input, Category::Lol);
        assert_eq!(texts(&kept), expected);
    }

    #[test]
    fn keeps_only_category_subset() {
        let input = vec![
            FakeContainer::text("Counter-Strike 2 | NAVI vs FaZe"),
            FakeContainer::text("LCK | T1 vs KT Rolster"),
            FakeContainer::text("Dota 2 | Team Spirit vs Tundra"),
            FakeContainer::text("CS2 FACEIT league | Apeks vs Sashi"),
        ];
        let kept = filter_by_category(input, Category::CounterStrike);
        assert_eq!(
            texts(&kept),
            vec!["Counter-Strike 2 | NAVI vs FaZe", "CS2 FACEIT league | Apeks vs Sashi"]
        );
    }

    #[test]
    fn league_names_alone_are_enough() {
        assert!(mentions_category(Category::Lol, "Ultraliga week 4: Zero Tenacity vs Forsaken"));
        assert!(mentions_category(Category::CounterStrike, "Intel Extreme Masters Cologne"));
        assert!(!mentions_category(Category::CounterStrike, "Valorant Champions Tour"));
        assert!(mentions_category(Category::Lol, "World Championship Finals"));
    }

    #[test]
    fn other_titles_sharing_league_keywords_are_rejected() {
        assert!(!mentions_category(Category::Lol, "Valorant VCT EMEA | Fnatic vs Heretics"));
        assert!(!mentions_category(Category::Lol, "VCT Pacific | PRX vs DRX"));
        assert!(!mentions_category(Category::Lol, "Dota 2 | Team Selection Cup"));
        assert!(!mentions_category(Category::CounterStrike, "Valorant Pro Tour Open Qualif"));
        assert!(mentions_category(Category::Lol, "EMEA Masters | Karmine Corp Blue vs BDS Academy"));
    }
}
