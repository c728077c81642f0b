//! Movie lookup providers
//!
//! A provider answers two questions: which movies match a title, and what
//! is known about one movie given its identifier. Calls block on network
//! I/O, so they are only ever made from worker threads or the console flow.

use crate::{
    error::AppResult,
    models::{MovieDetail, SearchResult},
};

pub mod omdb;

pub use omdb::OmdbProvider;

#[cfg_attr(test, mockall::automock)]
pub trait LookupProvider: Send + Sync {
    /// Search for movies by title
    fn search(&self, title: &str) -> AppResult<Vec<SearchResult>>;

    /// Fetch full metadata for one movie
    fn details(&self, id: &str) -> AppResult<MovieDetail>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
