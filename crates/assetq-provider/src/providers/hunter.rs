//! Hunter open API.

use super::common::{encode_url_safe, months_back};
use crate::error::{ProviderError, Result};
use crate::pagination::{PageOffset, PageRequest, PageResponse, Position, ProviderAdapter, TimeWindow};
use crate::provider::{QueryOptions, SearchProvider};
use crate::transport::{HttpRequest, HttpResponse};
use assetq_core::{Field, Provider, ResultRow};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Search endpoint.
pub const SEARCH_URL: &str = "https://hunter.qianxin.com/openApi/search";

/// Rows per page.
pub const PAGE_SIZE: usize = 100;

/// Include both web and non-web assets.
const IS_WEB_ALL: u8 = 3;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize)]
struct HunterBody {
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<HunterData>,
}

#[derive(Debug, Deserialize)]
struct HunterData {
    #[serde(default)]
    total: usize,
    /// `null` when nothing matched
    #[serde(default)]
    arr: Option<Vec<HunterAsset>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HunterAsset {
    ip: String,
    port: i64,
    domain: String,
    protocol: String,
    base_protocol: String,
    url: String,
    web_title: String,
    status_code: i64,
    company: String,
    number: String,
    country: String,
    is_web: String,
    isp: String,
}

impl HunterAsset {
    fn into_row(self) -> ResultRow {
        ResultRow::new()
            .with(Field::Ip, self.ip)
            .with(Field::Port, positive(self.port))
            .with(Field::Domain, self.domain)
            .with(Field::Protocol, self.protocol)
            .with(Field::BaseProtocol, self.base_protocol)
            .with(Field::Link, self.url)
            .with(Field::Title, self.web_title)
            .with(Field::StatusCode, positive(self.status_code))
            .with(Field::Company, self.company)
            .with(Field::IcpNumber, self.number)
            .with(Field::Country, self.country)
            .with(Field::IsWeb, self.is_web)
            .with(Field::Isp, self.isp)
    }
}

fn positive(n: i64) -> String {
    if n > 0 {
        n.to_string()
    } else {
        String::new()
    }
}

/// Hunter codec.
pub struct HunterProvider {
    key: String,
}

impl HunterProvider {
    /// Create a Hunter codec.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl SearchProvider for HunterProvider {
    fn provider(&self) -> Provider {
        Provider::Hunter
    }

    fn adapter(&self, options: &QueryOptions, now: DateTime<Utc>) -> ProviderAdapter {
        // no window means the provider's own default range
        let window = (options.months > 0).then(|| TimeWindow {
            start: months_back(now, options.months),
            end: now,
        });
        ProviderAdapter::PageOffset(
            PageOffset::new(Provider::Hunter, PAGE_SIZE, options.cap, options.paginate)
                .with_window(window),
        )
    }

    fn encode(&self, request: &PageRequest) -> Result<HttpRequest> {
        let Position::Page(page) = request.position else {
            return Err(ProviderError::Encode {
                provider: Provider::Hunter,
                message: format!("expected a page index, got {:?}", request.position),
            });
        };

        let mut http = HttpRequest::get(SEARCH_URL)
            .with_query("api-key", &self.key)
            .with_query("search", encode_url_safe(&request.query))
            .with_query("page", page)
            .with_query("page_size", request.size)
            .with_query("is_web", IS_WEB_ALL);

        if let Some(window) = request.window {
            http = http
                .with_query("start_time", window.start.format(DATE_FORMAT))
                .with_query("end_time", window.end.format(DATE_FORMAT));
        }

        Ok(http)
    }

    fn decode(&self, response: &HttpResponse) -> Result<PageResponse> {
        let body: HunterBody = serde_json::from_str(&response.body)
            .map_err(|e| ProviderError::decode(Provider::Hunter, e.to_string()))?;

        if body.code != 200 {
            return Err(ProviderError::Application {
                provider: Provider::Hunter,
                code: body.code.to_string(),
                message: body.message,
            });
        }

        let data = body
            .data
            .ok_or_else(|| ProviderError::decode(Provider::Hunter, "missing data"))?;

        Ok(PageResponse {
            rows: data
                .arr
                .unwrap_or_default()
                .into_iter()
                .map(HunterAsset::into_row)
                .collect(),
            total: Some(data.total),
            continuation: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request(window: Option<TimeWindow>) -> PageRequest {
        PageRequest {
            provider: Provider::Hunter,
            query: "domain.suffix=\"qq.com\"".to_string(),
            position: Position::Page(2),
            size: PAGE_SIZE,
            window,
        }
    }

    #[test]
    fn test_encode_without_window() {
        let http = HunterProvider::new("hk").encode(&request(None)).expect("encode");
        assert_eq!(http.url, SEARCH_URL);
        assert_eq!(http.query_value("api-key"), Some("hk"));
        assert_eq!(http.query_value("page"), Some("2"));
        assert_eq!(http.query_value("page_size"), Some("100"));
        assert_eq!(http.query_value("is_web"), Some("3"));
        assert_eq!(http.query_value("start_time"), None);
    }

    #[test]
    fn test_window_from_months() {
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 8, 30, 0).unwrap();
        let provider = HunterProvider::new("hk");
        let options = QueryOptions {
            months: 2,
            ..QueryOptions::default()
        };

        let adapter = provider.adapter(&options, now);
        let page = adapter.build_request("q", &adapter.initial_state());
        let http = provider.encode(&page).expect("encode");

        assert_eq!(http.query_value("start_time"), Some("2024-03-20"));
        assert_eq!(http.query_value("end_time"), Some("2024-05-20"));
    }

    #[test]
    fn test_no_window_for_zero_months() {
        let adapter = HunterProvider::new("hk").adapter(&QueryOptions::default(), Utc::now());
        let page = adapter.build_request("q", &adapter.initial_state());
        assert!(page.window.is_none());
    }

    #[test]
    fn test_decode_rows() {
        let body = r#"{
            "code": 200,
            "message": "success",
            "data": {
                "total": 250,
                "arr": [
                    {"ip": "1.1.1.1", "port": 443, "url": "https://a.com", "web_title": "A",
                     "status_code": 200, "number": "京ICP备1号", "is_web": "是", "extra": 1},
                    {"ip": "2.2.2.2", "port": 0, "url": ""}
                ]
            }
        }"#;
        let page = HunterProvider::new("hk")
            .decode(&HttpResponse::ok(body))
            .expect("decode");

        assert_eq!(page.total, Some(250));
        assert_eq!(page.rows[0].get(Field::Port), "443");
        assert_eq!(page.rows[0].get(Field::IcpNumber), "京ICP备1号");
        assert_eq!(page.rows[0].get(Field::StatusCode), "200");
        assert_eq!(page.rows[1].get(Field::Port), "");
        assert_eq!(page.rows[1].link(), "");
    }

    #[test]
    fn test_decode_null_arr_is_empty_page() {
        let body = r#"{"code": 200, "message": "success", "data": {"total": 0, "arr": null}}"#;
        let page = HunterProvider::new("hk")
            .decode(&HttpResponse::ok(body))
            .expect("decode");
        assert!(page.rows.is_empty());
    }

    #[test]
    fn test_decode_application_error() {
        let body = r#"{"code": 401, "message": "令牌无效", "data": null}"#;
        let err = HunterProvider::new("hk")
            .decode(&HttpResponse::ok(body))
            .expect_err("bad key");
        match err {
            ProviderError::Application { code, .. } => assert_eq!(code, "401"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
