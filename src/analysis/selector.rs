//! Contest selection.
//!
//! Picks the most recent finished contests whose name contains a
//! category label such as `"Div. 2"`.

use crate::models::{ContestRecord, Phase};
use std::collections::HashSet;
use tracing::debug;

/// Select the ids of the `count` most recent finished contests in `category`.
///
/// `category` is matched as a substring of the contest name. Higher ids are
/// treated as more recent. Fewer matches than `count` keeps all of them.
pub fn select_contests(contests: &[ContestRecord], category: &str, count: usize) -> HashSet<i64> {
    let mut matching: Vec<&ContestRecord> = contests
        .iter()
        .filter(|c| c.name.contains(category) && c.phase == Phase::Finished)
        .collect();

    matching.sort_by_key(|c| std::cmp::Reverse(c.id));
    debug!(
        "{} of {} contests match category {:?}",
        matching.len(),
        contests.len(),
        category
    );

    matching.truncate(count);
    matching.into_iter().map(|c| c.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contest(id: i64, name: &str, phase: Phase) -> ContestRecord {
        ContestRecord {
            id,
            name: name.to_string(),
            phase,
        }
    }

    #[test]
    fn test_filters_by_category_and_phase() {
        let contests = vec![
            contest(100, "Codeforces Round (Div. 2)", Phase::Finished),
            contest(99, "Codeforces Round (Div. 1)", Phase::Finished),
            contest(98, "Educational Round (Div. 2)", Phase::Coding),
            contest(97, "Div. 2 Extended", Phase::Finished),
        ];

        let selected = select_contests(&contests, "Div. 2", 10);

        assert_eq!(selected, HashSet::from([100, 97]));
    }

    #[test]
    fn test_keeps_highest_ids() {
        let contests: Vec<ContestRecord> = [5, 42, 17, 8, 30]
            .into_iter()
            .map(|id| contest(id, "Round (Div. 2)", Phase::Finished))
            .collect();

        let selected = select_contests(&contests, "Div. 2", 3);

        assert_eq!(selected, HashSet::from([42, 30, 17]));
    }

    #[test]
    fn test_fewer_matches_than_count() {
        let contests = vec![
            contest(1, "Round (Div. 2)", Phase::Finished),
            contest(2, "Round (Div. 3)", Phase::Finished),
        ];

        let selected = select_contests(&contests, "Div. 2", 200);

        assert_eq!(selected, HashSet::from([1]));
    }

    #[test]
    fn test_never_exceeds_count() {
        let contests: Vec<ContestRecord> = (1..=50)
            .map(|id| {
                let phase = if id % 3 == 0 {
                    Phase::SystemTest
                } else {
                    Phase::Finished
                };
                contest(id, &format!("Round {} (Div. 2)", id), phase)
            })
            .collect();

        for count in [0, 1, 7, 33, 34, 100] {
            let selected = select_contests(&contests, "Div. 2", count);
            assert!(selected.len() <= count);
            assert_eq!(selected.len(), count.min(34));
            for id in &selected {
                assert!(id % 3 != 0, "unfinished contest {} selected", id);
            }
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(select_contests(&[], "Div. 2", 5).is_empty());
    }

    #[test]
    fn test_scenario_selection() {
        let contests = vec![
            contest(100, "Div. 2 Round", Phase::Finished),
            contest(99, "Div. 1 Round", Phase::Finished),
        ];

        assert_eq!(select_contests(&contests, "Div. 2", 5), HashSet::from([100]));
    }
}
