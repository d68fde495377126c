//! Pagination driver.
//!
//! Runs one query to completion: fetch a page through the retry policy,
//! drop rows already seen, report them, persist them, then ask the adapter
//! whether another page follows. Each page is written before the next is
//! requested, so an interrupted run keeps every page it completed.

use crate::dedup::{DedupKey, Deduplicator};
use crate::error::{PipelineError, Result};
use crate::progress::Progress;
use assetq_core::ResultRow;
use assetq_export::RowSink;
use assetq_provider::{
    fetch_page, Continuation, PageResponse, ProviderError, QueryOptions, RetryPolicy,
    SearchProvider, StopReason, Transport,
};
use chrono::Utc;
use std::time::Duration;

/// Default delay before retrying a failed page write.
const SINK_RETRY_DELAY_MS: u64 = 1000;

/// What to do when a page cannot be fetched within the retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Fail the run
    #[default]
    Abort,
    /// Log, skip the page, and continue with the next one
    SkipPage,
}

/// Everything a query run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateResult {
    /// Deduplicated rows in arrival order
    pub rows: Vec<ResultRow>,
    /// Raw rows received before deduplication
    pub fetched: usize,
    /// Pages received
    pub pages: u32,
    /// Pages skipped after exhausting retries
    pub skipped: u32,
    /// Why the run ended
    pub stop: StopReason,
}

/// Drives one provider through a query's pages.
pub struct PaginationDriver<'a> {
    provider: &'a dyn SearchProvider,
    transport: &'a dyn Transport,
    retry: RetryPolicy,
    failure_mode: FailureMode,
    dedup_key: DedupKey,
    sink: Option<&'a mut dyn RowSink>,
    progress: Option<&'a mut dyn Progress>,
    sink_retry_delay: Duration,
}

impl<'a> PaginationDriver<'a> {
    /// Create a driver with the default retry policy, no sink, and no
    /// progress reporting.
    #[must_use]
    pub fn new(provider: &'a dyn SearchProvider, transport: &'a dyn Transport) -> Self {
        Self {
            provider,
            transport,
            retry: RetryPolicy::default(),
            failure_mode: FailureMode::Abort,
            dedup_key: DedupKey::natural(provider.provider()),
            sink: None,
            progress: None,
            sink_retry_delay: Duration::from_millis(SINK_RETRY_DELAY_MS),
        }
    }

    /// Set the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the failure mode.
    #[must_use]
    pub fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Override the provider's natural deduplication key.
    #[must_use]
    pub fn with_dedup_key(mut self, key: DedupKey) -> Self {
        self.dedup_key = key;
        self
    }

    /// Persist every page through a sink.
    #[must_use]
    pub fn with_sink(mut self, sink: &'a mut dyn RowSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Report progress.
    #[must_use]
    pub fn with_progress(mut self, progress: &'a mut dyn Progress) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Set the delay before retrying a failed page write.
    #[must_use]
    pub fn with_sink_retry_delay(mut self, delay: Duration) -> Self {
        self.sink_retry_delay = delay;
        self
    }

    /// Page through a translated query until the adapter says stop.
    ///
    /// A provider's ceiling signal ends the run normally with
    /// [`StopReason::CeilingReached`].
    ///
    /// # Errors
    /// Returns [`PipelineError::Provider`] for application errors and, in
    /// [`FailureMode::Abort`], for exhausted retries. Returns
    /// [`PipelineError::Sink`] if a page cannot be written after one retry.
    pub async fn run(&mut self, query: &str, options: &QueryOptions) -> Result<AggregateResult> {
        let provider = self.provider;
        let transport = self.transport;
        let adapter = provider.adapter(options, Utc::now());
        let mut state = adapter.initial_state();
        let mut dedup = Deduplicator::new(self.dedup_key);
        let mut rows = Vec::new();
        let mut fetched = 0;
        let mut pages = 0;
        let mut skipped = 0;

        tracing::debug!("Running {} query: {}", provider.provider(), query);

        let stop = loop {
            let request = adapter.build_request(query, &state);
            let label = format!("{} page {}", provider.provider(), state.round);
            // an empty first page means no matches; a later one is a hiccup
            // while the provider still reports rows beyond what arrived
            let retry_empty = state.round > 1 && state.expects_more();

            let outcome = self
                .retry
                .execute(
                    &label,
                    || fetch_page(provider, transport, &request),
                    |page: &PageResponse| !retry_empty || !page.rows.is_empty(),
                )
                .await;

            let mut response = match outcome {
                Ok(response) => response,
                Err(ProviderError::CeilingReached { .. }) => {
                    tracing::info!("{} reports its result ceiling, stopping", provider.provider());
                    break StopReason::CeilingReached;
                }
                Err(e @ ProviderError::RetriesExhausted { .. })
                    if self.failure_mode == FailureMode::SkipPage =>
                {
                    tracing::warn!("Skipping {}: {}", label, e);
                    skipped += 1;
                    match adapter.skip(&state, &request) {
                        Continuation::Next(next) => {
                            state = next;
                            continue;
                        }
                        Continuation::Done(reason) => break reason,
                    }
                }
                Err(e) => return Err(e.into()),
            };

            if let Some(remaining) = adapter.remaining(&state) {
                response.rows.truncate(remaining);
            }
            let continuation = adapter.extract_continuation(&state, &request, &response);
            fetched += response.rows.len();
            pages += 1;

            let fresh = dedup.retain_new(response.rows);
            if let Some(progress) = self.progress.as_deref_mut() {
                for row in &fresh {
                    progress.row(row);
                }
            }

            self.persist(&fresh, state.round, fetched).await?;
            rows.extend(fresh);

            if let Some(progress) = self.progress.as_deref_mut() {
                progress.page(state.round, rows.len());
            }

            match continuation {
                Continuation::Next(next) => state = next,
                Continuation::Done(reason) => break reason,
            }
        };

        tracing::info!(
            "{}: {} after {} pages, {} rows ({} fetched)",
            provider.provider(),
            stop,
            pages,
            rows.len(),
            fetched
        );

        Ok(AggregateResult {
            rows,
            fetched,
            pages,
            skipped,
            stop,
        })
    }

    /// Write a page, retrying once after a short delay.
    async fn persist(&mut self, rows: &[ResultRow], page: u32, fetched: usize) -> Result<()> {
        let delay = self.sink_retry_delay;
        let Some(sink) = self.sink.as_deref_mut() else {
            return Ok(());
        };
        if rows.is_empty() {
            return Ok(());
        }

        if let Err(e) = sink.append_rows(rows) {
            tracing::warn!("Writing page {} failed: {}, retrying in {:?}...", page, e, delay);
            tokio::time::sleep(delay).await;
            sink.append_rows(rows)
                .map_err(|source| PipelineError::Sink {
                    page,
                    fetched,
                    source,
                })?;
        }
        Ok(())
    }
}
