//! assetq pipeline - runs queries end to end.
//!
//! The [`PaginationDriver`] pages one translated query through a provider,
//! deduplicating by the provider's natural key and persisting every page as
//! it arrives. The [`BatchRunner`] feeds it a list of queries and keeps going
//! past failures.
//!
//! # Modules
//!
//! - [`driver`] - the per-query pagination loop
//! - [`batch`] - query files and batch summaries
//! - [`dedup`] - natural-key deduplication
//! - [`progress`] - console progress reporting

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod batch;
pub mod dedup;
pub mod driver;
pub mod error;
pub mod progress;

pub use batch::{read_queries, BatchRunner, BatchSummary};
pub use dedup::{dedup, unique_values, DedupKey, Deduplicator};
pub use driver::{AggregateResult, FailureMode, PaginationDriver};
pub use error::{PipelineError, Result};
pub use progress::{ConsoleProgress, NoProgress, Progress};
