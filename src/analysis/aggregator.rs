//! Problem aggregation.
//!
//! Collapses sub-indexed problems (`C1`, `C2`) into their slot and builds
//! the rating table and per-slot tag counts for the selected contests.

use crate::models::{Bucket, ProblemRecord, RatingRow, RatingTable, TagFrequencyTable};
use std::collections::HashSet;
use tracing::debug;

/// Output of a single aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    pub ratings: RatingTable,
    pub tags: TagFrequencyTable,
}

impl Aggregation {
    /// Whether neither table holds any data.
    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty() && self.tags.is_empty()
    }
}

/// Aggregate problems from the retained contests, in feed order.
///
/// Problems outside `retained_ids`, without an index, or whose index does
/// not start with `A..=F` contribute nothing.
pub fn aggregate(problems: &[ProblemRecord], retained_ids: &HashSet<i64>) -> Aggregation {
    let mut aggregation = Aggregation::default();
    let mut skipped_slots = 0usize;

    for problem in problems {
        let Some(contest_id) = problem.contest_id.filter(|id| retained_ids.contains(id)) else {
            continue;
        };
        let Some(index) = problem.index.as_deref() else {
            continue;
        };
        let Some(bucket) = Bucket::from_index(index) else {
            skipped_slots += 1;
            continue;
        };

        if let Some(rating) = problem.rating {
            aggregation.ratings.push(RatingRow {
                contest_id,
                bucket,
                rating,
            });
        }

        if let Some(ref tags) = problem.tags {
            let counter = aggregation.tags.bucket_mut(bucket);
            for tag in tags {
                counter.increment(tag);
            }
        }
    }

    debug!(
        "Aggregated {} rated problems and {} tag occurrences, dropped {} outside A-F",
        aggregation.ratings.len(),
        aggregation.tags.iter().map(|(_, c)| c.total()).sum::<usize>(),
        skipped_slots
    );

    aggregation
}
