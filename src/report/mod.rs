//! Report generation: console/JSON summaries and chart images.

pub mod charts;
pub mod generator;

pub use charts::{render_rating_boxplot, render_tag_bars, ChartPaths};
pub use generator::{generate_json_report, generate_text_report, Summary};
