//! Chart rendering with plotters.
//!
//! Two bitmaps are produced per run: a box plot of ratings per slot and
//! a grid of top-tag bar charts.

use super::generator::{quantile, sorted_ratings};
use crate::models::{Bucket, RatingTable, TagFrequencyTable};
use anyhow::Result;
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const RATING_AXIS: (f64, f64) = (800.0, 3600.0);
const RATING_TICK: f64 = 200.0;

/// Box-and-whisker figures for one slot.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Lowest value within `q1 - 1.5 * IQR`.
    pub whisker_low: f64,
    /// Highest value within `q3 + 1.5 * IQR`.
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Compute from ascending values. `None` when empty.
    pub fn from_sorted(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let q1 = quantile(values, 0.25);
        let median = quantile(values, 0.5);
        let q3 = quantile(values, 0.75);
        let reach = 1.5 * (q3 - q1);
        let (low_fence, high_fence) = (q1 - reach, q3 + reach);

        let whisker_low = values.iter().copied().find(|v| *v >= low_fence).unwrap_or(q1);
        let whisker_high = values.iter().copied().rev().find(|v| *v <= high_fence).unwrap_or(q3);
        let outliers = values
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();

        Some(Self {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }
}

/// Output paths for both charts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPaths {
    pub ratings: PathBuf,
    pub tags: PathBuf,
}

impl ChartPaths {
    /// `<dir>/<category>_ratings_<count>.png` and `<dir>/<category>_tags_<count>.png`.
    pub fn new(dir: &Path, category: &str, count: usize) -> Self {
        let prefix = slug(category);
        Self {
            ratings: dir.join(format!("{}_ratings_{}.png", prefix, count)),
            tags: dir.join(format!("{}_tags_{}.png", prefix, count)),
        }
    }
}

/// Lowercase alphanumerics of `s`; `"Div. 2"` becomes `"div2"`.
pub fn slug(s: &str) -> String {
    let slug: String = s
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if slug.is_empty() {
        "contests".to_string()
    } else {
        slug
    }
}

/// Render the rating box plot. Returns `Ok(false)` without writing when
/// there are no ratings.
pub fn render_rating_boxplot(path: &Path, ratings: &RatingTable, title: &str) -> Result<bool> {
    if ratings.is_empty() {
        return Ok(false);
    }

    let boxes: Vec<(usize, BoxStats)> = Bucket::ALL
        .iter()
        .filter_map(|b| Some((b.ordinal(), BoxStats::from_sorted(&sorted_ratings(ratings, *b))?)))
        .collect();
    debug!("Drawing {} rating boxes", boxes.len());

    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(
            (0usize..Bucket::ALL.len()).into_segmented(),
            RATING_AXIS.0..RATING_AXIS.1,
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Problem Index (C1/C2 grouped as C)")
        .y_desc("Rating")
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => Bucket::ALL
                .get(*i)
                .map(|b| b.to_string())
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .y_labels(((RATING_AXIS.1 - RATING_AXIS.0) / RATING_TICK) as usize + 1)
        .y_label_formatter(&|y| format!("{:.0}", y))
        .draw()?;

    for (i, stats) in &boxes {
        let i = *i;
        let color = Palette99::pick(i);
        let (left, right, center) = (
            SegmentValue::Exact(i),
            SegmentValue::Exact(i + 1),
            SegmentValue::CenterOf(i),
        );

        chart.draw_series(std::iter::once({
            let mut rect = Rectangle::new(
                [(left.clone(), stats.q3), (right.clone(), stats.q1)],
                color.mix(0.6).filled(),
            );
            rect.set_margin(0, 0, 30, 30);
            rect
        }))?;
        chart.draw_series(std::iter::once({
            let mut rect = Rectangle::new(
                [(left.clone(), stats.q3), (right.clone(), stats.q1)],
                BLACK.stroke_width(1),
            );
            rect.set_margin(0, 0, 30, 30);
            rect
        }))?;
        chart.draw_series(std::iter::once({
            let mut line = Rectangle::new(
                [(left.clone(), stats.median), (right.clone(), stats.median)],
                BLACK.stroke_width(2),
            );
            line.set_margin(0, 0, 30, 30);
            line
        }))?;
        chart.draw_series([
            PathElement::new(
                vec![(center.clone(), stats.q3), (center.clone(), stats.whisker_high)],
                BLACK.stroke_width(1),
            ),
            PathElement::new(
                vec![(center.clone(), stats.q1), (center.clone(), stats.whisker_low)],
                BLACK.stroke_width(1),
            ),
        ])?;
        chart.draw_series(
            stats
                .outliers
                .iter()
                .map(|v| Circle::new((center.clone(), *v), 3, BLACK.stroke_width(1))),
        )?;
    }

    root.present()?;
    info!("Saved {}", path.display());
    Ok(true)
}

/// Render a 2x3 grid with the top `n` tags of every slot.
///
/// Returns `Ok(false)` without writing when no slot has tags.
pub fn render_tag_bars(path: &Path, tags: &TagFrequencyTable, n: usize, title: &str) -> Result<bool> {
    if tags.is_empty() {
        return Ok(false);
    }

    let root = BitMapBackend::new(path, (1800, 1000)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(title, ("sans-serif", 32))?;
    let panels = root.split_evenly((2, 3));

    for (panel, (bucket, counter)) in panels.iter().zip(tags.iter()) {
        let top = counter.most_common(n);
        let panel_title = format!("Problem {}", bucket);

        if top.is_empty() {
            let panel = panel.titled(&panel_title, ("sans-serif", 24))?;
            let (w, h) = panel.dim_in_pixel();
            panel.draw(&Text::new(
                "No Data",
                (w as i32 / 2 - 35, h as i32 / 2),
                ("sans-serif", 22).into_font(),
            ))?;
            continue;
        }

        let max_count = top.iter().map(|(_, c)| *c).max().unwrap_or(1);
        let rows = top.len();
        // Most common tag on top.
        let label_of = |i: usize| {
            rows.checked_sub(i + 1)
                .and_then(|rank| top.get(rank))
                .map(|(t, _)| t.clone())
        };

        let mut chart = ChartBuilder::on(panel)
            .caption(&panel_title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(35)
            .y_label_area_size(170)
            .build_cartesian_2d(0usize..max_count + max_count / 10 + 1, (0usize..rows).into_segmented())?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc("Count")
            .y_label_formatter(&|y| match y {
                SegmentValue::CenterOf(i) => label_of(*i).unwrap_or_default(),
                _ => String::new(),
            })
            .draw()?;

        chart.draw_series(top.iter().enumerate().map(|(rank, (_, count))| {
            let i = rows - 1 - rank;
            let t = rank as f64 / rows.max(2) as f64;
            let color = HSLColor((270.0 - 160.0 * t) / 360.0, 0.65, 0.40);
            let mut bar = Rectangle::new(
                [(0, SegmentValue::Exact(i)), (*count, SegmentValue::Exact(i + 1))],
                color.filled(),
            );
            bar.set_margin(6, 6, 0, 0);
            bar
        }))?;
    }

    root.present()?;
    info!("Saved {}", path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_box_stats() {
        let values = [800.0, 900.0, 1000.0, 1100.0, 1200.0, 3500.0];

        let stats = BoxStats::from_sorted(&values).unwrap();

        assert_eq!(stats.median, 1050.0);
        assert_eq!(stats.q1, 925.0);
        assert_eq!(stats.q3, 1175.0);
        assert_eq!(stats.whisker_low, 800.0);
        assert_eq!(stats.whisker_high, 1200.0);
        assert_eq!(stats.outliers, vec![3500.0]);
    }

    #[test]
    fn test_box_stats_single_value() {
        let stats = BoxStats::from_sorted(&[1700.0]).unwrap();

        assert_eq!(stats.q1, 1700.0);
        assert_eq!(stats.whisker_low, 1700.0);
        assert_eq!(stats.whisker_high, 1700.0);
        assert!(stats.outliers.is_empty());
        assert!(BoxStats::from_sorted(&[]).is_none());
    }

    #[test]
    fn test_chart_paths() {
        let paths = ChartPaths::new(Path::new("out"), "Div. 2", 200);

        assert_eq!(paths.ratings, Path::new("out/div2_ratings_200.png"));
        assert_eq!(paths.tags, Path::new("out/div2_tags_200.png"));
        assert_eq!(slug("Educational"), "educational");
        assert_eq!(slug(". ."), "contests");
    }

    #[test]
    fn test_empty_tables_write_nothing() {
        let dir = TempDir::new().unwrap();
        let paths = ChartPaths::new(dir.path(), "Div. 2", 5);

        assert!(!render_rating_boxplot(&paths.ratings, &Vec::new(), "t").unwrap());
        assert!(!render_tag_bars(&paths.tags, &TagFrequencyTable::new(), 5, "t").unwrap());
        assert!(!paths.ratings.exists());
        assert!(!paths.tags.exists());
    }

    #[test]
    fn test_renders_mixed_buckets() {
        use crate::models::RatingRow;

        let dir = TempDir::new().unwrap();
        let paths = ChartPaths::new(dir.path(), "Div. 2", 3);
        let ratings: RatingTable = [
            (Bucket::A, 800),
            (Bucket::A, 900),
            (Bucket::C, 1500),
            (Bucket::C, 1900),
            (Bucket::F, 2800),
        ]
        .into_iter()
        .map(|(bucket, rating)| RatingRow {
            contest_id: 2103,
            bucket,
            rating,
        })
        .collect();
        let mut tags = TagFrequencyTable::new();
        for tag in ["math", "implementation", "math"] {
            tags.bucket_mut(Bucket::A).increment(tag);
        }
        tags.bucket_mut(Bucket::F).increment("number theory");

        assert!(render_rating_boxplot(&paths.ratings, &ratings, "ratings").unwrap());
        assert!(render_tag_bars(&paths.tags, &tags, 5, "tags").unwrap());
        assert!(paths.ratings.exists());
        assert!(paths.tags.exists());
    }
}
