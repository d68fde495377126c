//! Pagination protocols.
//!
//! Every provider pages through results with one of three protocols. They are
//! modeled as a closed set of adapters sharing one contract: build the next
//! [`PageRequest`] from a [`PageState`], then decide from the response whether
//! another round follows. The driver is written once against
//! [`ProviderAdapter`] and never inspects which protocol it is running.

use assetq_core::{Provider, ResultRow};
use chrono::{DateTime, Utc};
use std::fmt;

/// Hard result ceiling shared by the offset-based protocols.
pub const RESULT_CEILING: usize = 10_000;

/// Where the next page starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
    /// 1-based page index
    Page(u32),
    /// Continuation token; `None` on the first request
    Token(Option<String>),
    /// Running row offset
    Start(usize),
}

/// Pagination state carried between rounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    /// Position of the next page
    pub position: Position,
    /// Raw rows received so far
    pub fetched: usize,
    /// 1-based round number
    pub round: u32,
    /// Latest total reported by the provider
    pub total: Option<usize>,
}

impl PageState {
    fn first(position: Position) -> Self {
        Self {
            position,
            fetched: 0,
            round: 1,
            total: None,
        }
    }

    fn advance(&self, position: Position, fetched: usize) -> Self {
        Self {
            position,
            fetched,
            round: self.round + 1,
            total: self.total,
        }
    }

    /// Whether the provider has reported more rows than received so far.
    ///
    /// Unknown totals count as more rows expected.
    #[must_use]
    pub fn expects_more(&self) -> bool {
        self.total.map_or(true, |total| self.fetched < total)
    }
}

/// Time range filter attached to every request of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Window start
    pub start: DateTime<Utc>,
    /// Window end
    pub end: DateTime<Utc>,
}

/// One page request, built per round and consumed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Target provider
    pub provider: Provider,
    /// Translated query
    pub query: String,
    /// Page position
    pub position: Position,
    /// Rows requested
    pub size: usize,
    /// Optional time range
    pub window: Option<TimeWindow>,
}

/// Decoded page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResponse {
    /// Normalized rows
    pub rows: Vec<ResultRow>,
    /// Total matches reported by the provider
    pub total: Option<usize>,
    /// Continuation token for the next page
    pub continuation: Option<String>,
}

/// Why pagination ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Provider ran out of results
    Exhausted,
    /// Caller's row cap reached
    CapReached,
    /// Provider's hard ceiling reached
    CeilingReached,
    /// Pagination disabled, one page fetched
    SinglePage,
    /// A cursor page failed and the token chain cannot be resumed
    CursorLost,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::Exhausted => "no more results",
            StopReason::CapReached => "row limit reached",
            StopReason::CeilingReached => "provider result ceiling reached",
            StopReason::SinglePage => "single page requested",
            StopReason::CursorLost => "continuation token lost",
        };
        f.write_str(text)
    }
}

/// Outcome of a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation {
    /// Fetch another page from this state
    Next(PageState),
    /// Stop
    Done(StopReason),
}

/// Page/size pagination with a fixed page size (FOFA, Hunter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOffset {
    /// Provider being paged
    pub provider: Provider,
    /// Provider page size
    pub page_size: usize,
    /// Hard ceiling on reachable rows
    pub ceiling: usize,
    /// Caller cap, 0 for none
    pub cap: usize,
    /// Follow further pages
    pub paginate: bool,
    /// Time range sent with every request
    pub window: Option<TimeWindow>,
}

impl PageOffset {
    /// Adapter with the default ceiling.
    #[must_use]
    pub fn new(provider: Provider, page_size: usize, cap: usize, paginate: bool) -> Self {
        Self {
            provider,
            page_size,
            ceiling: RESULT_CEILING,
            cap,
            paginate,
            window: None,
        }
    }

    /// Attach a time window.
    #[must_use]
    pub fn with_window(mut self, window: Option<TimeWindow>) -> Self {
        self.window = window;
        self
    }

    fn limit(&self) -> usize {
        if self.cap == 0 {
            self.ceiling
        } else {
            self.cap.min(self.ceiling)
        }
    }

    /// Page size used for every page of the run.
    ///
    /// Fixed up front so page offsets stay aligned; an over-full final page
    /// is truncated by the driver.
    fn request_size(&self) -> usize {
        self.page_size.min(self.limit()).max(1)
    }

    fn continuation(&self, state: &PageState, request: &PageRequest, received: usize) -> Continuation {
        let page = match state.position {
            Position::Page(page) => page,
            _ => 1,
        };
        let fetched = state.fetched + received;

        if received == 0 {
            return Continuation::Done(StopReason::Exhausted);
        }
        if fetched >= self.limit() {
            return Continuation::Done(if self.cap > 0 && self.cap <= self.ceiling {
                StopReason::CapReached
            } else {
                StopReason::CeilingReached
            });
        }
        if !self.paginate {
            return Continuation::Done(StopReason::SinglePage);
        }
        if received < request.size {
            return Continuation::Done(StopReason::Exhausted);
        }
        self.next_page(state, page, fetched)
    }

    fn next_page(&self, state: &PageState, page: u32, fetched: usize) -> Continuation {
        if page as usize * self.request_size() >= self.ceiling {
            return Continuation::Done(StopReason::CeilingReached);
        }
        Continuation::Next(state.advance(Position::Page(page + 1), fetched))
    }
}

/// Token-chained pagination (FOFA `search/next`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorToken {
    /// Provider being paged
    pub provider: Provider,
    /// Rows per round
    pub page_size: usize,
    /// Caller cap, only applied when non-zero
    pub cap: usize,
    /// Follow further pages
    pub paginate: bool,
}

impl CursorToken {
    /// Cursor adapter with the provider's round size.
    #[must_use]
    pub fn new(provider: Provider, page_size: usize, cap: usize, paginate: bool) -> Self {
        Self {
            provider,
            page_size,
            cap,
            paginate,
        }
    }
}

/// Start/size pagination bounded by a hard ceiling (Quake).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartSizeCapped {
    /// Provider being paged
    pub provider: Provider,
    /// Preferred rows per request
    pub page_size: usize,
    /// `start + size` never exceeds this
    pub ceiling: usize,
    /// Caller cap, 0 for none
    pub cap: usize,
    /// Follow further pages
    pub paginate: bool,
    /// Time range sent with every request
    pub window: Option<TimeWindow>,
}

impl StartSizeCapped {
    /// Adapter with the default ceiling.
    #[must_use]
    pub fn new(
        provider: Provider,
        page_size: usize,
        cap: usize,
        paginate: bool,
        window: Option<TimeWindow>,
    ) -> Self {
        Self {
            provider,
            page_size,
            ceiling: RESULT_CEILING,
            cap,
            paginate,
            window,
        }
    }

    fn limit(&self) -> usize {
        if self.cap == 0 {
            self.ceiling
        } else {
            self.cap.min(self.ceiling)
        }
    }

    fn request_size(&self, state: &PageState) -> usize {
        let start = match state.position {
            Position::Start(start) => start,
            _ => 0,
        };
        self.page_size
            .min(self.ceiling.saturating_sub(start))
            .min(self.limit().saturating_sub(state.fetched))
    }

    fn next_start(&self, start: usize, size: usize, state: &PageState, fetched: usize) -> Continuation {
        let next = start + size;
        if next >= self.ceiling {
            return Continuation::Done(StopReason::CeilingReached);
        }
        if self.cap > 0 && fetched >= self.limit() && self.cap <= self.ceiling {
            return Continuation::Done(StopReason::CapReached);
        }
        let advanced = state.advance(Position::Start(next), fetched);
        if self.request_size(&advanced) == 0 {
            return Continuation::Done(StopReason::CeilingReached);
        }
        Continuation::Next(advanced)
    }
}

/// The pagination protocol of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderAdapter {
    /// Page index and fixed page size
    PageOffset(PageOffset),
    /// Opaque continuation token
    CursorToken(CursorToken),
    /// Running start offset under a hard ceiling
    StartSizeCapped(StartSizeCapped),
}

impl ProviderAdapter {
    /// Provider this adapter pages through.
    #[must_use]
    pub fn provider(&self) -> Provider {
        match self {
            ProviderAdapter::PageOffset(a) => a.provider,
            ProviderAdapter::CursorToken(a) => a.provider,
            ProviderAdapter::StartSizeCapped(a) => a.provider,
        }
    }

    /// State of the first round.
    #[must_use]
    pub fn initial_state(&self) -> PageState {
        match self {
            ProviderAdapter::PageOffset(_) => PageState::first(Position::Page(1)),
            ProviderAdapter::CursorToken(_) => PageState::first(Position::Token(None)),
            ProviderAdapter::StartSizeCapped(_) => PageState::first(Position::Start(0)),
        }
    }

    /// Build the request for a round.
    #[must_use]
    pub fn build_request(&self, query: &str, state: &PageState) -> PageRequest {
        let (size, window) = match self {
            ProviderAdapter::PageOffset(a) => (a.request_size(), a.window),
            ProviderAdapter::CursorToken(a) => (a.page_size, None),
            ProviderAdapter::StartSizeCapped(a) => (a.request_size(state), a.window),
        };
        PageRequest {
            provider: self.provider(),
            query: query.to_string(),
            position: state.position.clone(),
            size,
            window,
        }
    }

    /// Rows still wanted before the cap or ceiling, if bounded.
    ///
    /// The driver truncates an over-full page to this many rows.
    #[must_use]
    pub fn remaining(&self, state: &PageState) -> Option<usize> {
        match self {
            ProviderAdapter::PageOffset(a) => Some(a.limit().saturating_sub(state.fetched)),
            ProviderAdapter::CursorToken(a) => {
                (a.cap > 0).then(|| a.cap.saturating_sub(state.fetched))
            }
            ProviderAdapter::StartSizeCapped(a) => Some(a.limit().saturating_sub(state.fetched)),
        }
    }

    /// Decide whether another round follows a received page.
    #[must_use]
    pub fn extract_continuation(
        &self,
        state: &PageState,
        request: &PageRequest,
        response: &PageResponse,
    ) -> Continuation {
        let continuation = self.continue_after(state, request, response);
        match continuation {
            Continuation::Next(mut next) => {
                next.total = response.total.or(state.total);
                Continuation::Next(next)
            }
            done => done,
        }
    }

    fn continue_after(
        &self,
        state: &PageState,
        request: &PageRequest,
        response: &PageResponse,
    ) -> Continuation {
        let received = response.rows.len();
        let fetched = state.fetched + received;

        match self {
            ProviderAdapter::PageOffset(a) => {
                if let Some(total) = response.total {
                    if received > 0 && fetched >= total && fetched < a.limit() {
                        return Continuation::Done(StopReason::Exhausted);
                    }
                }
                a.continuation(state, request, received)
            }
            ProviderAdapter::CursorToken(a) => {
                if received == 0 {
                    return Continuation::Done(StopReason::Exhausted);
                }
                if a.cap > 0 && fetched >= a.cap {
                    return Continuation::Done(StopReason::CapReached);
                }
                if !a.paginate {
                    return Continuation::Done(StopReason::SinglePage);
                }
                match response.continuation.as_deref() {
                    Some(token) if !token.is_empty() => Continuation::Next(
                        state.advance(Position::Token(Some(token.to_string())), fetched),
                    ),
                    _ => Continuation::Done(StopReason::Exhausted),
                }
            }
            ProviderAdapter::StartSizeCapped(a) => {
                let start = match state.position {
                    Position::Start(start) => start,
                    _ => 0,
                };
                if received == 0 {
                    return Continuation::Done(StopReason::Exhausted);
                }
                if a.cap > 0 && fetched >= a.limit() && a.cap <= a.ceiling {
                    return Continuation::Done(StopReason::CapReached);
                }
                if !a.paginate {
                    return Continuation::Done(StopReason::SinglePage);
                }
                if response.total.is_some_and(|total| fetched >= total) {
                    return Continuation::Done(StopReason::Exhausted);
                }
                a.next_start(start, request.size, state, fetched)
            }
        }
    }

    /// Move past a page that could not be fetched.
    #[must_use]
    pub fn skip(&self, state: &PageState, request: &PageRequest) -> Continuation {
        match self {
            ProviderAdapter::PageOffset(a) => {
                if !a.paginate {
                    return Continuation::Done(StopReason::SinglePage);
                }
                let page = match state.position {
                    Position::Page(page) => page,
                    _ => 1,
                };
                a.next_page(state, page, state.fetched)
            }
            ProviderAdapter::CursorToken(_) => Continuation::Done(StopReason::CursorLost),
            ProviderAdapter::StartSizeCapped(a) => {
                if !a.paginate {
                    return Continuation::Done(StopReason::SinglePage);
                }
                let start = match state.position {
                    Position::Start(start) => start,
                    _ => 0,
                };
                a.next_start(start, request.size, state, state.fetched)
            }
        }
    }
}
