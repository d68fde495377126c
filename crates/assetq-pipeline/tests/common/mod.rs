#![allow(dead_code)]

use assetq_core::ResultRow;
use assetq_export::{ExportError, RowSink};
use assetq_provider::{HttpRequest, HttpResponse, ProviderError, Transport};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays canned replies in order and records every request.
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<assetq_provider::Result<HttpResponse>>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<assetq_provider::Result<HttpResponse>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> assetq_provider::Result<HttpResponse> {
        self.seen.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Transport("script exhausted".to_string())))
    }
}

pub fn ok(body: Value) -> assetq_provider::Result<HttpResponse> {
    Ok(HttpResponse::ok(body.to_string()))
}

pub fn reset() -> assetq_provider::Result<HttpResponse> {
    Err(ProviderError::Transport("connection reset".to_string()))
}

/// FOFA page with `n` rows whose links start at `first`.
pub fn fofa_page(first: usize, n: usize, next: Option<&str>) -> Value {
    let results: Vec<Value> = (first..first + n)
        .map(|i| {
            json!([
                format!("10.0.{}.{}", i / 256, i % 256),
                "",
                "80",
                "http",
                format!("http://host-{i}"),
                "",
                ""
            ])
        })
        .collect();
    json!({"error": false, "size": 100_000, "results": results, "next": next})
}

/// Hunter page with `n` assets and a reported total.
pub fn hunter_page(first: usize, n: usize, total: usize) -> Value {
    let arr: Vec<Value> = (first..first + n)
        .map(|i| json!({"ip": format!("10.1.0.{i}"), "port": 443, "url": format!("https://h-{i}")}))
        .collect();
    json!({"code": 200, "message": "success", "data": {"total": total, "arr": arr}})
}

/// Quake page with `n` services and a reported total.
pub fn quake_page(first: usize, n: usize, total: usize) -> Value {
    let data: Vec<Value> = (first..first + n)
        .map(|i| json!({"ip": format!("10.2.{}.{}", i / 256, i % 256), "port": 80, "transport": "tcp"}))
        .collect();
    json!({"code": 0, "message": "Successful.", "data": data, "meta": {"pagination": {"total": total}}})
}

/// Sink that keeps pages in memory and fails a set number of writes first.
#[derive(Default)]
pub struct MemorySink {
    pub pages: Vec<Vec<ResultRow>>,
    pub fail_next: usize,
    pub attempts: usize,
}

impl MemorySink {
    pub fn failing(times: usize) -> Self {
        Self {
            fail_next: times,
            ..Self::default()
        }
    }

    pub fn rows(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }
}

impl RowSink for MemorySink {
    fn append_rows(&mut self, rows: &[ResultRow]) -> assetq_export::Result<()> {
        self.attempts += 1;
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(ExportError::Io(std::io::Error::other("disk full")));
        }
        self.pages.push(rows.to_vec());
        Ok(())
    }
}
