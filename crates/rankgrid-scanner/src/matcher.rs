//! Locates the target business inside one grid point's result list.

use crate::types::{ItemKind, RankItem};

/// What to look for in a result list. Either field may be absent; a target
/// with neither never matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchTarget {
    pub place_id: Option<String>,
    pub business_name: Option<String>,
}

impl MatchTarget {
    #[must_use]
    pub fn new(place_id: Option<String>, business_name: Option<String>) -> Self {
        let place_id = place_id.filter(|p| !p.trim().is_empty());
        let business_name = business_name.filter(|n| !n.trim().is_empty());
        Self {
            place_id,
            business_name,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.place_id.is_none() && self.business_name.is_none()
    }
}

/// Outcome of matching one point's results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointMatch {
    /// 1-based position among organic items.
    pub rank: Option<u32>,
    /// Title of the best organic item, matched or not.
    pub top_result: Option<String>,
    /// Title of the matched item.
    pub business_found: Option<String>,
}

/// Finds the target's organic rank.
///
/// Paid items are dropped before ranking and never take a slot. The organic
/// items are then scanned once in provider order; at each item a place-id
/// match is checked before a case-insensitive title substring match, and the
/// first item satisfying either wins.
#[must_use]
pub fn match_business(items: &[RankItem], target: &MatchTarget) -> PointMatch {
    let organic: Vec<&RankItem> = items
        .iter()
        .filter(|item| item.kind == ItemKind::Organic)
        .collect();

    let top_result = organic.first().map(|item| item.title.clone());
    let needle = target
        .business_name
        .as_deref()
        .map(|name| name.trim().to_lowercase())
        .filter(|name| !name.is_empty());
    let place_id = target.place_id.as_deref().filter(|pid| !pid.is_empty());

    for (idx, item) in organic.iter().enumerate() {
        let id_hit = place_id.is_some_and(|pid| item.place_id == pid);
        let name_hit = needle
            .as_deref()
            .is_some_and(|n| item.title.to_lowercase().contains(n));

        if id_hit || name_hit {
            return PointMatch {
                rank: u32::try_from(idx + 1).ok(),
                top_result,
                business_found: Some(item.title.clone()),
            };
        }
    }

    PointMatch {
        rank: None,
        top_result,
        business_found: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(kind: ItemKind, rank: u32, place_id: &str, title: &str) -> RankItem {
        RankItem {
            kind,
            rank_absolute: rank,
            place_id: place_id.to_owned(),
            title: title.to_owned(),
            lat: 47.6,
            lng: -122.3,
            rating: None,
        }
    }

    fn organic(rank: u32, place_id: &str, title: &str) -> RankItem {
        item(ItemKind::Organic, rank, place_id, title)
    }

    #[test]
    fn paid_items_do_not_take_a_rank_slot() {
        let items = vec![
            item(ItemKind::Paid, 1, "AD", "Sponsored Pizza"),
            organic(2, "A", "Tony's Slices"),
            organic(3, "T", "Joe's Pizza"),
        ];
        let target = MatchTarget::new(Some("T".to_owned()), None);
        let m = match_business(&items, &target);
        assert_eq!(m.rank, Some(2));
        assert_eq!(m.business_found.as_deref(), Some("Joe's Pizza"));
        assert_eq!(m.top_result.as_deref(), Some("Tony's Slices"));
    }

    #[test]
    fn paid_item_matching_target_is_ignored() {
        let items = vec![
            item(ItemKind::Paid, 1, "T", "Joe's Pizza"),
            organic(2, "B", "Other Place"),
        ];
        let target = MatchTarget::new(Some("T".to_owned()), Some("Joe's".to_owned()));
        assert_eq!(match_business(&items, &target).rank, None);
    }

    #[test]
    fn first_match_wins_even_with_mismatched_place_id() {
        let items = vec![
            organic(1, "O", "Other Pizza"),
            organic(2, "X", "Joe's Pizza"),
        ];
        let target = MatchTarget::new(Some("Y".to_owned()), Some("Joe's Pizza".to_owned()));
        assert_eq!(match_business(&items, &target).rank, Some(2));
    }

    #[test]
    fn earlier_name_hit_beats_later_place_id_hit() {
        let items = vec![
            organic(1, "Q", "Joe's Pizza Downtown"),
            organic(2, "P", "Joe's Pizza"),
        ];
        let target = MatchTarget::new(Some("P".to_owned()), Some("joe's pizza".to_owned()));
        let m = match_business(&items, &target);
        assert_eq!(m.rank, Some(1));
        assert_eq!(m.business_found.as_deref(), Some("Joe's Pizza Downtown"));
    }

    #[test]
    fn name_match_is_case_folded_and_trimmed() {
        let items = vec![organic(1, "A", "BEST BAGELS & CO")];
        let target = MatchTarget::new(None, Some("  best bagels ".to_owned()));
        assert_eq!(match_business(&items, &target).rank, Some(1));
    }

    #[test]
    fn no_match_still_reports_top_result() {
        let items = vec![organic(1, "A", "Alpha Diner"), organic(2, "B", "Beta Cafe")];
        let target = MatchTarget::new(Some("Z".to_owned()), Some("Zeta".to_owned()));
        let m = match_business(&items, &target);
        assert_eq!(m.rank, None);
        assert_eq!(m.business_found, None);
        assert_eq!(m.top_result.as_deref(), Some("Alpha Diner"));
    }

    #[test]
    fn empty_list_yields_nothing() {
        let target = MatchTarget::new(Some("A".to_owned()), None);
        assert_eq!(match_business(&[], &target), PointMatch::default());
    }

    #[test]
    fn blank_target_fields_never_match() {
        let items = vec![organic(1, "", "Anything")];
        let target = MatchTarget::new(Some(String::new()), Some("   ".to_owned()));
        assert!(target.is_empty());
        assert_eq!(match_business(&items, &target).rank, None);
    }

    #[test]
    fn rank_never_exceeds_organic_count() {
        let items = vec![
            item(ItemKind::Paid, 1, "P1", "Ad One"),
            item(ItemKind::Paid, 2, "P2", "Ad Two"),
            organic(3, "A", "Alpha"),
            organic(4, "B", "Bravo"),
        ];
        let target = MatchTarget::new(None, Some("bravo".to_owned()));
        let rank = match_business(&items, &target).rank.unwrap();
        assert!(rank as usize <= 2);
    }
}
