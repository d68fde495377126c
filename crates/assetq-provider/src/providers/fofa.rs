//! FOFA search API.
//!
//! Two endpoints: `search/all` pages by index, `search/next` chains
//! continuation tokens and returns larger rounds.

use super::common::{encode_standard, value_text};
use crate::error::{ProviderError, Result};
use crate::pagination::{
    CursorToken, PageOffset, PageRequest, PageResponse, Position, ProviderAdapter,
};
use crate::provider::{QueryOptions, SearchProvider};
use crate::transport::{HttpRequest, HttpResponse};
use assetq_core::{Field, Provider, ResultRow};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Page-indexed search endpoint.
pub const SEARCH_URL: &str = "https://fofa.info/api/v1/search/all";

/// Token-chained search endpoint.
pub const NEXT_URL: &str = "https://fofa.info/api/v1/search/next";

/// Rows per page on `search/all`.
pub const PAGE_SIZE: usize = 1000;

/// Rows per round on `search/next`.
pub const CURSOR_SIZE: usize = 10_000;

const FIELDS: &str = "ip,domain,port,protocol,link,title,server";

/// Order of the columns requested through [`FIELDS`].
const FIELD_ORDER: [Field; 7] = [
    Field::Ip,
    Field::Domain,
    Field::Port,
    Field::Protocol,
    Field::Link,
    Field::Title,
    Field::Server,
];

#[derive(Debug, Deserialize)]
struct FofaBody {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    errmsg: String,
    /// Total matches
    #[serde(default)]
    size: Option<usize>,
    #[serde(default)]
    results: Vec<Vec<Value>>,
    #[serde(default)]
    next: Option<String>,
}

/// FOFA codec.
pub struct FofaProvider {
    key: String,
    cursor: bool,
}

impl FofaProvider {
    /// Create a page-indexed FOFA codec.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            cursor: false,
        }
    }

    /// Use the token-chained endpoint instead of page indexes.
    #[must_use]
    pub fn with_cursor(mut self, cursor: bool) -> Self {
        self.cursor = cursor;
        self
    }
}

impl SearchProvider for FofaProvider {
    fn provider(&self) -> Provider {
        Provider::Fofa
    }

    fn adapter(&self, options: &QueryOptions, _now: DateTime<Utc>) -> ProviderAdapter {
        if self.cursor {
            ProviderAdapter::CursorToken(CursorToken::new(
                Provider::Fofa,
                CURSOR_SIZE,
                options.cap,
                options.paginate,
            ))
        } else {
            ProviderAdapter::PageOffset(PageOffset::new(
                Provider::Fofa,
                PAGE_SIZE,
                options.cap,
                options.paginate,
            ))
        }
    }

    fn encode(&self, request: &PageRequest) -> Result<HttpRequest> {
        let base = match &request.position {
            Position::Page(page) => HttpRequest::get(SEARCH_URL).with_query("page", page),
            Position::Token(token) => {
                let http = HttpRequest::get(NEXT_URL);
                match token {
                    Some(token) => http.with_query("next", token),
                    None => http,
                }
            }
            Position::Start(_) => {
                return Err(ProviderError::Encode {
                    provider: Provider::Fofa,
                    message: "start offsets are not supported".to_string(),
                })
            }
        };

        Ok(base
            .with_query("key", &self.key)
            .with_query("qbase64", encode_standard(&request.query))
            .with_query("size", request.size)
            .with_query("fields", FIELDS))
    }

    fn decode(&self, response: &HttpResponse) -> Result<PageResponse> {
        let body: FofaBody = serde_json::from_str(&response.body)
            .map_err(|e| ProviderError::decode(Provider::Fofa, e.to_string()))?;

        if body.error {
            return Err(ProviderError::Application {
                provider: Provider::Fofa,
                code: "error".to_string(),
                message: body.errmsg,
            });
        }

        let rows = body
            .results
            .iter()
            .map(|values| {
                FIELD_ORDER
                    .iter()
                    .zip(values)
                    .fold(ResultRow::new(), |row, (field, value)| {
                        row.with(*field, value_text(value))
                    })
            })
            .collect();

        Ok(PageResponse {
            rows,
            total: body.size,
            continuation: body.next.filter(|next| !next.is_empty()),
        })
    }
}
