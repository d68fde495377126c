//! Quake service search API.
//!
//! Quake pages by `start`/`size` and refuses to go past 10,000 rows; the
//! refusal comes back as an ordinary error message, which is mapped to
//! [`ProviderError::CeilingReached`] so the driver can end the run cleanly.

use super::common::{months_back, text_at, value_text};
use crate::error::{ProviderError, Result};
use crate::pagination::{
    PageRequest, PageResponse, Position, ProviderAdapter, StartSizeCapped, TimeWindow,
};
use crate::provider::{QueryOptions, SearchProvider};
use crate::transport::{HttpRequest, HttpResponse};
use assetq_core::{Field, Provider, ResultRow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Service search endpoint.
pub const SEARCH_URL: &str = "https://quake.360.net/api/v3/search/quake_service";

/// Preferred rows per request.
pub const PAGE_SIZE: usize = 3000;

/// Message Quake returns when asked for rows past its ceiling.
pub const CEILING_MESSAGE: &str = "网页查询最大允许查询10000条数据。";

/// Window used when no month count is given.
const DEFAULT_MONTHS: u32 = 12;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Serialize)]
struct QuakeQuery<'a> {
    query: &'a str,
    start: usize,
    size: usize,
    latest: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuakeBody {
    #[serde(default)]
    code: Value,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    meta: QuakeMeta,
}

#[derive(Debug, Default, Deserialize)]
struct QuakeMeta {
    #[serde(default)]
    pagination: Option<QuakePagination>,
}

#[derive(Debug, Default, Deserialize)]
struct QuakePagination {
    #[serde(default)]
    total: usize,
}

/// Quake codec.
pub struct QuakeProvider {
    key: String,
}

impl QuakeProvider {
    /// Create a Quake codec.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Whether a response code means success. Quake sends both `0` and `"0"`.
fn check_code(body: &QuakeBody) -> Result<()> {
    let code = match &body.code {
        Value::Number(n) if n.as_i64() == Some(0) => return Ok(()),
        Value::String(s) if s == "0" => return Ok(()),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => {
            return Err(ProviderError::decode(
                Provider::Quake,
                format!("unexpected response code {other}"),
            ))
        }
    };

    if body.message == CEILING_MESSAGE {
        return Err(ProviderError::CeilingReached {
            provider: Provider::Quake,
        });
    }
    Err(ProviderError::Application {
        provider: Provider::Quake,
        code,
        message: body.message.clone(),
    })
}

fn components(item: &Value) -> String {
    let Some(list) = item.get("components").and_then(Value::as_array) else {
        return String::new();
    };
    list.iter()
        .filter_map(|component| {
            let name = match text_at(component, &["product_name_cn"]) {
                name if name.is_empty() => text_at(component, &["product_name_en"]),
                name => name,
            };
            if name.is_empty() {
                return None;
            }
            let version = text_at(component, &["version"]);
            Some(if version.is_empty() {
                name
            } else {
                format!("{name}:{version}")
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_service(item: &Value) -> ResultRow {
    let ip = text_at(item, &["ip"]);
    let port = item.get("port").map(value_text).unwrap_or_default();
    let host = if ip.is_empty() || port.is_empty() {
        String::new()
    } else {
        format!("{ip}:{port}")
    };

    let server = [text_at(item, &["service", "http", "server"]), components(item)]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let link = item
        .pointer("/service/http/http_load_url/0")
        .map(value_text)
        .unwrap_or_default();

    ResultRow::new()
        .with(Field::Ip, ip)
        .with(Field::Domain, text_at(item, &["domain"]))
        .with(Field::Port, port)
        .with(Field::Protocol, text_at(item, &["transport"]))
        .with(Field::Host, host)
        .with(Field::Link, link)
        .with(Field::Title, text_at(item, &["service", "http", "title"]))
        .with(Field::Server, server)
        .with(Field::IcpNumber, text_at(item, &["service", "http", "icp", "licence"]))
        .with(
            Field::IcpUnit,
            text_at(item, &["service", "http", "icp", "main_licence", "unit"]),
        )
        .with(Field::Isp, text_at(item, &["location", "isp"]))
}

impl SearchProvider for QuakeProvider {
    fn provider(&self) -> Provider {
        Provider::Quake
    }

    fn adapter(&self, options: &QueryOptions, now: DateTime<Utc>) -> ProviderAdapter {
        let months = if options.months == 0 {
            DEFAULT_MONTHS
        } else {
            options.months
        };
        let window = TimeWindow {
            start: months_back(now, months),
            end: now,
        };
        ProviderAdapter::StartSizeCapped(StartSizeCapped::new(
            Provider::Quake,
            PAGE_SIZE,
            options.cap,
            options.paginate,
            Some(window),
        ))
    }

    fn encode(&self, request: &PageRequest) -> Result<HttpRequest> {
        let Position::Start(start) = request.position else {
            return Err(ProviderError::Encode {
                provider: Provider::Quake,
                message: format!("expected a start offset, got {:?}", request.position),
            });
        };

        let query = QuakeQuery {
            query: &request.query,
            start,
            size: request.size,
            latest: true,
            start_time: request.window.map(|w| w.start.format(TIME_FORMAT).to_string()),
            end_time: request.window.map(|w| w.end.format(TIME_FORMAT).to_string()),
        };
        let body = serde_json::to_value(&query).map_err(|e| ProviderError::Encode {
            provider: Provider::Quake,
            message: e.to_string(),
        })?;

        Ok(HttpRequest::post_json(SEARCH_URL, body)
            .with_header("X-QuakeToken", self.key.clone())
            .with_header("Accept", "application/json, text/plain, */*"))
    }

    fn decode(&self, response: &HttpResponse) -> Result<PageResponse> {
        let body: QuakeBody = serde_json::from_str(&response.body)
            .map_err(|e| ProviderError::decode(Provider::Quake, e.to_string()))?;
        check_code(&body)?;

        // a non-array data field carries no rows
        let rows = body
            .data
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter(|item| item.is_object())
                    .map(parse_service)
                    .collect()
            })
            .unwrap_or_default();

        Ok(PageResponse {
            rows,
            total: body.meta.pagination.map(|p| p.total),
            continuation: None,
        })
    }
}
