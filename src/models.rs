//! Data models for contest statistics.
//!
//! This module contains the records decoded from the Codeforces API
//! and the tables produced by the aggregation pass.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Lifecycle phase of a contest as reported by the contest feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Phase {
    Before,
    Coding,
    PendingSystemTest,
    SystemTest,
    /// The completed status; only finished contests are selected.
    Finished,
    Other(String),
}

impl From<String> for Phase {
    fn from(s: String) -> Self {
        match s.as_str() {
            "BEFORE" => Phase::Before,
            "CODING" => Phase::Coding,
            "PENDING_SYSTEM_TEST" => Phase::PendingSystemTest,
            "SYSTEM_TEST" => Phase::SystemTest,
            "FINISHED" => Phase::Finished,
            _ => Phase::Other(s),
        }
    }
}

impl From<Phase> for String {
    fn from(phase: Phase) -> Self {
        phase.to_string()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Before => write!(f, "BEFORE"),
            Phase::Coding => write!(f, "CODING"),
            Phase::PendingSystemTest => write!(f, "PENDING_SYSTEM_TEST"),
            Phase::SystemTest => write!(f, "SYSTEM_TEST"),
            Phase::Finished => write!(f, "FINISHED"),
            Phase::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A single entry of `contest.list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestRecord {
    pub id: i64,
    pub name: String,
    pub phase: Phase,
}

/// A single entry of `problemset.problems`.
///
/// Every field is optional on the wire; records missing the fields
/// the aggregator needs are skipped rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemRecord {
    #[serde(default)]
    pub contest_id: Option<i64>,
    #[serde(default)]
    pub index: Option<String>,
    #[serde(default)]
    pub rating: Option<u32>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Problem slot that sub-indexed problems collapse into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Bucket {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Bucket {
    /// All buckets in display order.
    pub const ALL: [Bucket; 6] = [
        Bucket::A,
        Bucket::B,
        Bucket::C,
        Bucket::D,
        Bucket::E,
        Bucket::F,
    ];

    /// Derive the bucket from a problem index by its first character.
    ///
    /// `"C1"` and `"C2"` both map to `C`. Returns `None` for an empty index
    /// or a first character outside `A..=F`; such problems are discarded.
    pub fn from_index(index: &str) -> Option<Self> {
        match index.chars().next()? {
            'A' => Some(Bucket::A),
            'B' => Some(Bucket::B),
            'C' => Some(Bucket::C),
            'D' => Some(Bucket::D),
            'E' => Some(Bucket::E),
            'F' => Some(Bucket::F),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::A => "A",
            Bucket::B => "B",
            Bucket::C => "C",
            Bucket::D => "D",
            Bucket::E => "E",
            Bucket::F => "F",
        }
    }

    /// Position within [`Bucket::ALL`].
    pub fn ordinal(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rated problem that survived selection and bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingRow {
    pub contest_id: i64,
    pub bucket: Bucket,
    pub rating: u32,
}

/// Rating rows in feed order. Not deduplicated by contest and bucket.
pub type RatingTable = Vec<RatingRow>;

/// Tag occurrence counts that remember first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagCounter {
    entries: Vec<(String, usize)>,
    positions: HashMap<String, usize>,
}

impl TagCounter {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `tag`.
    pub fn increment(&mut self, tag: &str) {
        match self.positions.get(tag) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.positions.insert(tag.to_string(), self.entries.len());
                self.entries.push((tag.to_string(), 1));
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, tag: &str) -> usize {
        self.positions
            .get(tag)
            .map(|&pos| self.entries[pos].1)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// The `n` most frequent tags, highest count first.
    ///
    /// Equal counts keep first-seen order (stable sort), so the result
    /// depends on the order problems appear in the feed.
    pub fn most_common(&self, n: usize) -> Vec<(String, usize)> {
        let mut sorted = self.entries.clone();
        sorted.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
        sorted.truncate(n);
        sorted
    }
}

/// Per-bucket tag counters. All six buckets are always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFrequencyTable {
    counters: [TagCounter; 6],
}

impl Default for TagFrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TagFrequencyTable {
    pub fn new() -> Self {
        Self {
            counters: Default::default(),
        }
    }

    pub fn bucket(&self, bucket: Bucket) -> &TagCounter {
        &self.counters[bucket.ordinal()]
    }

    pub fn bucket_mut(&mut self, bucket: Bucket) -> &mut TagCounter {
        &mut self.counters[bucket.ordinal()]
    }

    /// Buckets with their counters in `A..F` order.
    pub fn iter(&self) -> impl Iterator<Item = (Bucket, &TagCounter)> {
        Bucket::ALL.into_iter().zip(self.counters.iter())
    }

    /// Whether no bucket has any tag.
    pub fn is_empty(&self) -> bool {
        self.counters.iter().all(TagCounter::is_empty)
    }
}

/// Response envelope shared by every Codeforces API method.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub status: String,
    pub comment: Option<String>,
    pub result: Option<T>,
}

/// Result payload of `problemset.problems`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProblemSet {
    pub problems: Vec<ProblemRecord>,
}
