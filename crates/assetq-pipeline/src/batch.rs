//! Batch mode: many queries, one shared output file.
//!
//! Queries run strictly one after another. A failing query is logged and
//! counted; it never stops the batch.

use crate::driver::{FailureMode, PaginationDriver};
use crate::error::Result;
use crate::progress::Progress;
use assetq_export::RowSink;
use assetq_provider::{QueryOptions, RetryPolicy, SearchProvider, Transport};
use assetq_query::QueryTranslator;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default pause between queries in milliseconds.
const QUERY_DELAY_MS: u64 = 3000;

/// Default extra pause after a failed query in milliseconds, on top of the
/// inter-query pause.
const FAILURE_DELAY_MS: u64 = 2000;

/// Outcome counts of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Queries attempted
    pub total: usize,
    /// Queries that completed
    pub succeeded: usize,
    /// Queries that failed
    pub failed: usize,
    /// Rows collected across successful queries
    pub rows: usize,
}

/// Read queries from a file, one per line. Blank lines are skipped.
///
/// # Errors
/// Returns an I/O error if the file cannot be read.
pub fn read_queries(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Runs a list of queries against one provider.
pub struct BatchRunner<'a> {
    provider: &'a dyn SearchProvider,
    transport: &'a dyn Transport,
    retry: RetryPolicy,
    options: QueryOptions,
    query_delay: Duration,
    failure_delay: Duration,
    sink_retry_delay: Option<Duration>,
}

impl<'a> BatchRunner<'a> {
    /// Create a runner with default pacing.
    #[must_use]
    pub fn new(provider: &'a dyn SearchProvider, transport: &'a dyn Transport) -> Self {
        Self {
            provider,
            transport,
            retry: RetryPolicy::default(),
            options: QueryOptions::default(),
            query_delay: Duration::from_millis(QUERY_DELAY_MS),
            failure_delay: Duration::from_millis(FAILURE_DELAY_MS),
            sink_retry_delay: None,
        }
    }

    /// Set the per-page retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the options applied to every query.
    #[must_use]
    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the pause between queries and the extra pause added after a
    /// failed query.
    #[must_use]
    pub fn with_delays(mut self, query_delay: Duration, failure_delay: Duration) -> Self {
        self.query_delay = query_delay;
        self.failure_delay = failure_delay;
        self
    }

    /// Set the delay before retrying a failed page write.
    #[must_use]
    pub fn with_sink_retry_delay(mut self, delay: Duration) -> Self {
        self.sink_retry_delay = Some(delay);
        self
    }

    /// Run every query in a file.
    ///
    /// # Errors
    /// Returns an I/O error if the query file cannot be read. Query failures
    /// are counted in the summary instead.
    pub async fn run_file(
        &self,
        path: &Path,
        sink: &mut dyn RowSink,
        progress: &mut dyn Progress,
    ) -> Result<BatchSummary> {
        let queries = read_queries(path)?;
        tracing::info!("Loaded {} queries from {}", queries.len(), path.display());
        Ok(self.run(&queries, sink, progress).await)
    }

    /// Run raw queries, translating each for the provider first.
    pub async fn run(
        &self,
        queries: &[String],
        sink: &mut dyn RowSink,
        progress: &mut dyn Progress,
    ) -> BatchSummary {
        let translator = QueryTranslator::for_provider(self.provider.provider());
        let mut summary = BatchSummary {
            total: queries.len(),
            ..BatchSummary::default()
        };

        for (index, raw) in queries.iter().enumerate() {
            let query = translator.translate(raw);
            tracing::info!("[{}/{}] {}", index + 1, queries.len(), query);

            let mut driver = PaginationDriver::new(self.provider, self.transport)
                .with_retry(self.retry)
                .with_failure_mode(FailureMode::SkipPage)
                .with_sink(&mut *sink)
                .with_progress(&mut *progress);
            if let Some(delay) = self.sink_retry_delay {
                driver = driver.with_sink_retry_delay(delay);
            }

            let pause = match driver.run(&query, &self.options).await {
                Ok(result) => {
                    summary.succeeded += 1;
                    summary.rows += result.rows.len();
                    self.query_delay
                }
                Err(e) => {
                    tracing::error!("Query {} failed: {}", query, e);
                    summary.failed += 1;
                    self.query_delay + self.failure_delay
                }
            };

            if index + 1 < queries.len() && !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }

        tracing::info!(
            "Batch finished: {} succeeded, {} failed, {} rows",
            summary.succeeded,
            summary.failed,
            summary.rows
        );
        summary
    }
}
