//! Movie search and rating lookup
//!
//! Everything except the GTK view lives here so it can be exercised without
//! a display: provider access, display derivations, poster decoding, the
//! UI-thread state machine and the background worker pool.

pub mod catalog;
pub mod config;
pub mod console;
pub mod details;
pub mod error;
pub mod models;
pub mod poster;
pub mod provider;
pub mod search;
pub mod state;
pub mod worker;

#[cfg(test)]
mod testing;

pub use error::{AppError, AppResult};
