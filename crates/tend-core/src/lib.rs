//! Core types and derivation logic for the Tend habit tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.
//!
//! Everything displayed to a user — streaks, calendars, trailing-window
//! charts, goal progress — is derived from two source collections: a habit's
//! completion log and a goal's sub-task list. Stored copies of derived values
//! are caches, recomputed on every write.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod calendar;
pub mod error;
pub mod goal;
pub mod habit;
pub mod report;
pub mod stats;
pub mod store;
pub mod streak;

pub use error::{Error, Result};
