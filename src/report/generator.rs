//! Console and JSON summary generation.
//!
//! This module turns the rating and tag tables into per-slot statistics
//! and renders them as plain text or JSON.

use crate::models::{Bucket, RatingTable, TagFrequencyTable};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Descriptive statistics for the ratings of one slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingStats {
    pub bucket: Bucket,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: u32,
    pub max: u32,
}

/// One tag with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Most frequent tags of one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketTags {
    pub bucket: Bucket,
    pub tags: Vec<TagCount>,
}

/// Everything printed at the end of a run.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub generated_at: DateTime<Utc>,
    pub category: String,
    pub contests_requested: usize,
    pub contests_selected: usize,
    pub rated_problems: usize,
    pub ratings: Vec<RatingStats>,
    pub top_tags: Vec<BucketTags>,
}

impl Summary {
    pub fn new(
        category: &str,
        contests_requested: usize,
        contests_selected: usize,
        ratings: &RatingTable,
        tags: &TagFrequencyTable,
        top_n: usize,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            category: category.to_string(),
            contests_requested,
            contests_selected,
            rated_problems: ratings.len(),
            ratings: rating_summary(ratings),
            top_tags: top_tags(tags, top_n),
        }
    }
}

/// Linear-interpolated quantile of an ascending slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lower = pos.floor() as usize;
            let upper = pos.ceil() as usize;
            let frac = pos - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * frac
        }
    }
}

/// Ratings of one slot, ascending.
pub fn sorted_ratings(ratings: &RatingTable, bucket: Bucket) -> Vec<f64> {
    let mut values: Vec<f64> = ratings
        .iter()
        .filter(|row| row.bucket == bucket)
        .map(|row| row.rating as f64)
        .collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

/// Count, mean, median, min and max per slot, in `A..F` order.
///
/// Slots without any rating are left out.
pub fn rating_summary(ratings: &RatingTable) -> Vec<RatingStats> {
    Bucket::ALL
        .into_iter()
        .filter_map(|bucket| {
            let values = sorted_ratings(ratings, bucket);
            let (&first, &last) = (values.first()?, values.last()?);
            Some(RatingStats {
                bucket,
                count: values.len(),
                mean: values.iter().sum::<f64>() / values.len() as f64,
                median: quantile(&values, 0.5),
                min: first as u32,
                max: last as u32,
            })
        })
        .collect()
}

/// The `n` most common tags for every slot, including empty ones.
pub fn top_tags(tags: &TagFrequencyTable, n: usize) -> Vec<BucketTags> {
    Bucket::ALL
        .into_iter()
        .map(|bucket| BucketTags {
            bucket,
            tags: tags
                .bucket(bucket)
                .most_common(n)
                .into_iter()
                .map(|(tag, count)| TagCount { tag, count })
                .collect(),
        })
        .collect()
}

/// Render the rating statistics table.
pub fn render_rating_summary(stats: &[RatingStats], title: &str) -> String {
    if stats.is_empty() {
        return "No rating data found!\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!("\n--- Rating Summary ({}) ---\n", title));
    output.push_str(&format!(
        "{:<8} {:>6} {:>9} {:>8} {:>6} {:>6}\n",
        "Problem", "count", "mean", "median", "min", "max"
    ));
    for s in stats {
        output.push_str(&format!(
            "{:<8} {:>6} {:>9.2} {:>8.1} {:>6} {:>6}\n",
            s.bucket.as_str(),
            s.count,
            s.mean,
            s.median,
            s.min,
            s.max
        ));
    }

    output
}

/// Render the per-slot tag lists.
pub fn render_tag_summary(top: &[BucketTags], n: usize, title: &str) -> String {
    let rule = "=".repeat(50);
    let mut output = String::new();

    output.push_str(&format!("\n{}\n", rule));
    output.push_str(&format!("TOP {} TAGS PER PROBLEM ({})\n", n, title));
    output.push_str(&format!("{}\n", rule));

    for entry in top {
        output.push_str(&format!("\n--- Problem {} ---\n", entry.bucket));
        if entry.tags.is_empty() {
            output.push_str("  (No tags found)\n");
        }
        for tc in &entry.tags {
            output.push_str(&format!("  {:<25} : {}\n", tc.tag, tc.count));
        }
    }

    output
}

/// Render the full console report.
pub fn generate_text_report(summary: &Summary, top_n: usize) -> String {
    let title = format!(
        "Past {} {} Contests",
        summary.contests_requested, summary.category
    );
    let mut output = String::new();

    output.push_str(&render_rating_summary(&summary.ratings, &title));
    output.push_str(&render_tag_summary(&summary.top_tags, top_n, &title));

    output
}

/// Generate a JSON report.
pub fn generate_json_report(summary: &Summary) -> Result<String> {
    serde_json::to_string_pretty(summary).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RatingRow;

    fn row(bucket: Bucket, rating: u32) -> RatingRow {
        RatingRow {
            contest_id: 1,
            bucket,
            rating,
        }
    }

    fn sample_tags() -> TagFrequencyTable {
        let mut tags = TagFrequencyTable::new();
        for tag in ["math", "greedy", "math", "implementation"] {
            tags.bucket_mut(Bucket::A).increment(tag);
        }
        tags.bucket_mut(Bucket::C).increment("dp");
        tags
    }

    #[test]
    fn test_quantile() {
        assert_eq!(quantile(&[1500.0], 0.5), 1500.0);
        assert_eq!(quantile(&[1500.0, 1600.0], 0.5), 1550.0);
        assert_eq!(quantile(&[800.0, 900.0, 1000.0, 1200.0, 2000.0], 0.25), 900.0);
        assert!(quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn test_rating_summary() {
        let ratings = vec![
            row(Bucket::C, 1600),
            row(Bucket::A, 800),
            row(Bucket::C, 1500),
            row(Bucket::A, 1000),
            row(Bucket::A, 900),
        ];

        let stats = rating_summary(&ratings);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].bucket, Bucket::A);
        assert_eq!(stats[0].count, 3);
        assert_eq!(stats[0].mean, 900.0);
        assert_eq!(stats[0].median, 900.0);
        assert_eq!(stats[0].min, 800);
        assert_eq!(stats[0].max, 1000);
        assert_eq!(stats[1].bucket, Bucket::C);
        assert_eq!(stats[1].median, 1550.0);
    }

    #[test]
    fn test_top_tags_covers_every_bucket() {
        let top = top_tags(&sample_tags(), 2);

        assert_eq!(top.len(), 6);
        assert_eq!(
            top[0].tags,
            vec![
                TagCount { tag: "math".to_string(), count: 2 },
                TagCount { tag: "greedy".to_string(), count: 1 },
            ]
        );
        assert!(top[1].tags.is_empty());
        assert_eq!(top[2].tags.len(), 1);
    }

    #[test]
    fn test_render_empty_ratings() {
        assert_eq!(render_rating_summary(&[], "x"), "No rating data found!\n");
    }

    #[test]
    fn test_render_tag_summary() {
        let text = render_tag_summary(&top_tags(&sample_tags(), 10), 10, "Past 3 Div. 2 Contests");

        assert!(text.contains("TOP 10 TAGS PER PROBLEM (Past 3 Div. 2 Contests)"));
        assert!(text.contains("--- Problem A ---"));
        assert!(text.contains("  math                      : 2"));
        assert!(text.contains("--- Problem F ---\n  (No tags found)"));
    }

    #[test]
    fn test_generate_json_report() {
        let ratings = vec![row(Bucket::B, 1200)];
        let summary = Summary::new("Div. 2", 200, 1, &ratings, &sample_tags(), 5);

        let json = generate_json_report(&summary).unwrap();

        assert!(json.contains("\"category\": \"Div. 2\""));
        assert!(json.contains("\"rated_problems\": 1"));
        assert!(json.contains("\"bucket\": \"B\""));
        assert!(json.contains("\"top_tags\""));
    }
}
