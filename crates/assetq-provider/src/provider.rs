//! Provider wire codecs.

use crate::error::{ProviderError, Result};
use crate::pagination::{PageRequest, PageResponse, ProviderAdapter};
use crate::transport::{HttpResponse, Transport};
use assetq_core::Provider;
use chrono::{DateTime, Utc};

/// Longest response body kept in a status error.
const MAX_ERROR_BODY: usize = 200;

/// Per-query options that shape pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Row cap, 0 for the provider default
    pub cap: usize,
    /// Months back for time-windowed providers, 0 for the provider default
    pub months: u32,
    /// Follow further pages
    pub paginate: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            cap: 0,
            months: 0,
            paginate: true,
        }
    }
}

/// Translates between pagination requests and one provider's HTTP API.
///
/// Implementations hold the API key and know the provider's endpoint,
/// parameter names, and response schema. They perform no I/O.
pub trait SearchProvider: Send + Sync {
    /// Provider identity.
    fn provider(&self) -> Provider;

    /// Pagination adapter for a run started at `now`.
    fn adapter(&self, options: &QueryOptions, now: DateTime<Utc>) -> ProviderAdapter;

    /// Encode a page request.
    fn encode(&self, request: &PageRequest) -> Result<crate::transport::HttpRequest>;

    /// Decode a successful response body.
    fn decode(&self, response: &HttpResponse) -> Result<PageResponse>;
}

/// Fetch and decode one page.
///
/// # Errors
/// Returns [`ProviderError::Status`] for a non-2xx response, and whatever the
/// transport or codec reports otherwise.
pub async fn fetch_page(
    provider: &dyn SearchProvider,
    transport: &dyn Transport,
    request: &PageRequest,
) -> Result<PageResponse> {
    let http_request = provider.encode(request)?;
    let response = transport.send(http_request).await?;

    if !response.is_success() {
        return Err(ProviderError::Status {
            provider: provider.provider(),
            status: response.status,
            body: truncate(&response.body, MAX_ERROR_BODY),
        });
    }

    provider.decode(&response)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
