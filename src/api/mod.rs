//! Codeforces API access.
//!
//! Both feeds are downloaded in full once per run; there is no paging,
//! caching or retry.

pub mod client;

pub use client::FeedClient;
