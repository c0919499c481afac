//! Analysis modules.
//!
//! Contest selection runs first and produces the id set the problem
//! aggregator filters on.

pub mod aggregator;
pub mod selector;

pub use aggregator::{aggregate, Aggregation};
pub use selector::select_contests;
