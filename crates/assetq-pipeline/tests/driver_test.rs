mod common;

use assetq_pipeline::{FailureMode, PaginationDriver, PipelineError, Progress};
use assetq_provider::providers::quake::CEILING_MESSAGE;
use assetq_provider::{
    FofaProvider, HunterProvider, ProviderError, QuakeProvider, QueryOptions, RetryPolicy,
    StopReason, RESULT_CEILING,
};
use common::{fofa_page, hunter_page, ok, quake_page, reset, MemorySink, ScriptedTransport};
use serde_json::json;
use std::time::Duration;

fn options(cap: usize) -> QueryOptions {
    QueryOptions {
        cap,
        ..QueryOptions::default()
    }
}

#[derive(Default)]
struct RecordingProgress {
    links: Vec<String>,
    pages: Vec<(u32, usize)>,
}

impl Progress for RecordingProgress {
    fn row(&mut self, row: &assetq_core::ResultRow) {
        self.links.push(row.link().to_string());
    }

    fn page(&mut self, page: u32, rows: usize) {
        self.pages.push((page, rows));
    }
}

#[tokio::test]
async fn test_page_offset_cap_limits_request_and_rows() {
    // provider ignores the requested size and sends a full page anyway
    let transport = ScriptedTransport::new(vec![ok(fofa_page(0, 1000, None))]);
    let provider = FofaProvider::new("key");

    let result = PaginationDriver::new(&provider, &transport)
        .with_retry(RetryPolicy::immediate())
        .run(r#"app="nginx""#, &options(50))
        .await
        .expect("run succeeds");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query_value("size"), Some("50"));
    assert_eq!(result.rows.len(), 50);
    assert_eq!(result.fetched, 50);
    assert_eq!(result.stop, StopReason::CapReached);
}

#[tokio::test]
async fn test_quake_ceiling_error_ends_run_normally() {
    let transport = ScriptedTransport::new(vec![
        ok(quake_page(0, 3000, 50_000)),
        ok(json!({"code": "q2001", "message": CEILING_MESSAGE, "data": []})),
    ]);
    let provider = QuakeProvider::new("token");

    let result = PaginationDriver::new(&provider, &transport)
        .with_retry(RetryPolicy::immediate())
        .run("port:80", &QueryOptions::default())
        .await
        .expect("ceiling is not a failure");

    assert_eq!(result.rows.len(), 3000);
    assert_eq!(result.pages, 1);
    assert_eq!(result.stop, StopReason::CeilingReached);
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_quake_requests_stay_under_ceiling() {
    let transport = ScriptedTransport::new(vec![
        ok(quake_page(0, 3000, 50_000)),
        ok(quake_page(3000, 3000, 50_000)),
        ok(quake_page(6000, 3000, 50_000)),
        ok(quake_page(9000, 1000, 50_000)),
    ]);
    let provider = QuakeProvider::new("token");

    let result = PaginationDriver::new(&provider, &transport)
        .with_retry(RetryPolicy::immediate())
        .run("port:80", &QueryOptions::default())
        .await
        .expect("run succeeds");

    let windows: Vec<(u64, u64)> = transport
        .requests()
        .iter()
        .map(|request| {
            let body = request.body.as_ref().expect("quake posts a body");
            (
                body["start"].as_u64().expect("start"),
                body["size"].as_u64().expect("size"),
            )
        })
        .collect();

    assert_eq!(windows, vec![(0, 3000), (3000, 3000), (6000, 3000), (9000, 1000)]);
    assert!(windows
        .iter()
        .all(|(start, size)| start + size <= RESULT_CEILING as u64));
    assert_eq!(result.rows.len(), RESULT_CEILING);
    assert_eq!(result.stop, StopReason::CeilingReached);
}

#[tokio::test]
async fn test_hunter_stops_at_reported_total() {
    let transport = ScriptedTransport::new(vec![
        ok(hunter_page(0, 100, 200)),
        ok(hunter_page(100, 100, 200)),
    ]);
    let provider = HunterProvider::new("key");

    let result = PaginationDriver::new(&provider, &transport)
        .with_retry(RetryPolicy::immediate())
        .run(r#"ip="10.1.0.0/16""#, &QueryOptions::default())
        .await
        .expect("run succeeds");

    assert_eq!(transport.requests().len(), 2);
    assert_eq!(result.rows.len(), 200);
    assert_eq!(result.stop, StopReason::Exhausted);
}

#[tokio::test]
async fn test_fofa_cursor_follows_tokens() {
    let transport = ScriptedTransport::new(vec![
        ok(fofa_page(0, 10, Some("t1"))),
        ok(fofa_page(10, 10, Some("t2"))),
        ok(fofa_page(20, 5, None)),
    ]);
    let provider = FofaProvider::new("key").with_cursor(true);

    let result = PaginationDriver::new(&provider, &transport)
        .with_retry(RetryPolicy::immediate())
        .run(r#"title="x""#, &QueryOptions::default())
        .await
        .expect("run succeeds");

    let tokens: Vec<Option<String>> = transport
        .requests()
        .iter()
        .map(|r| r.query_value("next").map(str::to_string))
        .collect();
    assert_eq!(tokens, vec![None, Some("t1".to_string()), Some("t2".to_string())]);
    assert_eq!(result.rows.len(), 25);
    assert_eq!(result.stop, StopReason::Exhausted);
}

#[tokio::test]
async fn test_duplicates_across_pages_dropped() {
    let transport = ScriptedTransport::new(vec![
        ok(hunter_page(0, 100, 150)),
        ok(hunter_page(50, 100, 150)),
    ]);
    let provider = HunterProvider::new("key");

    let result = PaginationDriver::new(&provider, &transport)
        .with_retry(RetryPolicy::immediate())
        .run("web.title=\"x\"", &QueryOptions::default())
        .await
        .expect("run succeeds");

    assert_eq!(result.fetched, 200);
    assert_eq!(result.rows.len(), 150);
    assert_eq!(result.rows[149].link(), "https://h-149");
}

#[tokio::test]
async fn test_every_page_persisted_and_reported() {
    let transport = ScriptedTransport::new(vec![
        ok(fofa_page(0, 1000, None)),
        ok(fofa_page(1000, 1000, None)),
        ok(fofa_page(2000, 7, None)),
    ]);
    let provider = FofaProvider::new("key");
    let mut sink = MemorySink::default();
    let mut progress = RecordingProgress::default();

    let result = PaginationDriver::new(&provider, &transport)
        .with_retry(RetryPolicy::immediate())
        .with_sink(&mut sink)
        .with_progress(&mut progress)
        .run("port=\"80\"", &QueryOptions::default())
        .await
        .expect("run succeeds");

    assert_eq!(result.pages, 3);
    assert_eq!(sink.pages.len(), 3);
    assert_eq!(sink.rows(), 2007);
    assert_eq!(progress.links.len(), 2007);
    assert_eq!(progress.links[0], "http://host-0");
    assert_eq!(progress.pages, vec![(1, 1000), (2, 2000), (3, 2007)]);
}

#[tokio::test]
async fn test_sink_failure_retried_once() {
    let transport = ScriptedTransport::new(vec![ok(fofa_page(0, 3, None))]);
    let provider = FofaProvider::new("key");
    let mut sink = MemorySink::failing(1);

    let result = PaginationDriver::new(&provider, &transport)
        .with_retry(RetryPolicy::immediate())
        .with_sink(&mut sink)
        .with_sink_retry_delay(Duration::ZERO)
        .run("port=\"80\"", &QueryOptions::default())
        .await
        .expect("second write succeeds");

    assert_eq!(result.rows.len(), 3);
    assert_eq!(sink.attempts, 2);
    assert_eq!(sink.rows(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_sink_failure_surfaces_after_retry() {
    let provider = FofaProvider::new("key");
    let transport = ScriptedTransport::new(vec![
        ok(fofa_page(0, 1000, None)),
        ok(fofa_page(1000, 1000, None)),
    ]);
    let mut sink = SecondPageFails::default();
    let err = PaginationDriver::new(&provider, &transport)
        .with_retry(RetryPolicy::immediate())
        .with_sink(&mut sink)
        .run("port=\"80\"", &options(0))
        .await
        .expect_err("page 2 cannot be written");

    match err {
        PipelineError::Sink { page, fetched, .. } => {
            assert_eq!(page, 2);
            assert_eq!(fetched, 2000);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(sink.inner.rows(), 1000);
    assert_eq!(sink.writes, 3);
}

/// Accepts the first write and rejects every later one.
#[derive(Default)]
struct SecondPageFails {
    inner: MemorySink,
    writes: usize,
}

impl assetq_export::RowSink for SecondPageFails {
    fn append_rows(&mut self, rows: &[assetq_core::ResultRow]) -> assetq_export::Result<()> {
        self.writes += 1;
        if self.writes == 1 {
            return self.inner.append_rows(rows);
        }
        Err(assetq_export::ExportError::Io(std::io::Error::other(
            "read-only file system",
        )))
    }
}

#[tokio::test]
async fn test_abort_mode_propagates_exhausted_retries() {
    let transport = ScriptedTransport::new(vec![reset(), reset(), reset()]);
    let provider = HunterProvider::new("key");

    let err = PaginationDriver::new(&provider, &transport)
        .with_retry(RetryPolicy::immediate())
        .with_failure_mode(FailureMode::Abort)
        .run("ip=\"1.1.1.1\"", &QueryOptions::default())
        .await
        .expect_err("three resets exhaust the budget");

    assert!(matches!(
        err,
        PipelineError::Provider(ProviderError::RetriesExhausted { attempts: 3, .. })
    ));
}

#[tokio::test]
async fn test_skip_mode_moves_past_failed_page() {
    let transport = ScriptedTransport::new(vec![
        ok(hunter_page(0, 100, 1000)),
        reset(),
        reset(),
        reset(),
        ok(hunter_page(200, 40, 1000)),
    ]);
    let provider = HunterProvider::new("key");

    let result = PaginationDriver::new(&provider, &transport)
        .with_retry(RetryPolicy::immediate())
        .with_failure_mode(FailureMode::SkipPage)
        .run("ip=\"1.1.1.1\"", &QueryOptions::default())
        .await
        .expect("skipped page is not fatal");

    let pages: Vec<Option<String>> = transport
        .requests()
        .iter()
        .map(|r| r.query_value("page").map(str::to_string))
        .collect();
    assert_eq!(pages.last().cloned().flatten().as_deref(), Some("3"));
    assert_eq!(result.skipped, 1);
    assert_eq!(result.rows.len(), 140);
    assert_eq!(result.stop, StopReason::Exhausted);
}

#[tokio::test]
async fn test_skip_mode_cannot_skip_cursor() {
    let transport = ScriptedTransport::new(vec![
        ok(fofa_page(0, 10, Some("t1"))),
        reset(),
        reset(),
        reset(),
    ]);
    let provider = FofaProvider::new("key").with_cursor(true);

    let result = PaginationDriver::new(&provider, &transport)
        .with_retry(RetryPolicy::immediate())
        .with_failure_mode(FailureMode::SkipPage)
        .run("port=\"80\"", &QueryOptions::default())
        .await
        .expect("lost cursor ends the run");

    assert_eq!(result.rows.len(), 10);
    assert_eq!(result.stop, StopReason::CursorLost);
}

#[tokio::test]
async fn test_application_error_is_terminal() {
    let transport = ScriptedTransport::new(vec![ok(
        json!({"error": true, "errmsg": "[820001] 没有权限搜索该字段"}),
    )]);
    let provider = FofaProvider::new("key");

    let err = PaginationDriver::new(&provider, &transport)
        .with_retry(RetryPolicy::immediate())
        .with_failure_mode(FailureMode::SkipPage)
        .run("cert=\"x\"", &QueryOptions::default())
        .await
        .expect_err("application error ends the query");

    assert!(matches!(
        err,
        PipelineError::Provider(ProviderError::Application { .. })
    ));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_empty_later_page_fails_run_in_abort_mode() {
    let transport = ScriptedTransport::new(vec![
        ok(fofa_page(0, 1000, None)),
        ok(fofa_page(0, 0, None)),
        ok(fofa_page(0, 0, None)),
        ok(fofa_page(0, 0, None)),
    ]);
    let provider = FofaProvider::new("key");

    let err = PaginationDriver::new(&provider, &transport)
        .with_retry(RetryPolicy::immediate())
        .with_failure_mode(FailureMode::Abort)
        .run("port=\"80\"", &QueryOptions::default())
        .await
        .expect_err("rows were still expected");

    assert_eq!(transport.requests().len(), 4);
    let PipelineError::Provider(ProviderError::RetriesExhausted { attempts, source }) = err else {
        panic!("expected exhausted retries");
    };
    assert_eq!(attempts, 3);
    assert!(matches!(*source, ProviderError::EmptyPage(_)));
}

#[tokio::test]
async fn test_skip_mode_moves_past_empty_page() {
    let transport = ScriptedTransport::new(vec![
        ok(hunter_page(0, 100, 1000)),
        ok(hunter_page(0, 0, 1000)),
        ok(hunter_page(0, 0, 1000)),
        ok(hunter_page(0, 0, 1000)),
        ok(hunter_page(200, 40, 1000)),
    ]);
    let provider = HunterProvider::new("key");

    let result = PaginationDriver::new(&provider, &transport)
        .with_retry(RetryPolicy::immediate())
        .with_failure_mode(FailureMode::SkipPage)
        .run("ip=\"1.1.1.1\"", &QueryOptions::default())
        .await
        .expect("empty page is skipped");

    let pages: Vec<String> = transport
        .requests()
        .iter()
        .filter_map(|r| r.query_value("page").map(str::to_string))
        .collect();
    assert_eq!(pages, vec!["1", "2", "2", "2", "3"]);
    assert_eq!(result.skipped, 1);
    assert_eq!(result.rows.len(), 140);
    assert_eq!(result.stop, StopReason::Exhausted);
}

#[tokio::test]
async fn test_empty_first_page_not_retried() {
    let transport = ScriptedTransport::new(vec![ok(fofa_page(0, 0, None))]);
    let provider = FofaProvider::new("key");

    let result = PaginationDriver::new(&provider, &transport)
        .with_retry(RetryPolicy::immediate())
        .run("port=\"80\"", &QueryOptions::default())
        .await
        .expect("no matches");

    assert_eq!(transport.requests().len(), 1);
    assert!(result.rows.is_empty());
    assert_eq!(result.stop, StopReason::Exhausted);
}
