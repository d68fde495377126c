//! assetq provider layer - everything between a translated query and a page
//! of normalized rows.
//!
//! # Overview
//!
//! - [`transport`]: the HTTP seam ([`Transport`]) and its `reqwest` implementation
//! - [`retry`]: per-request pacing and the retry policy wrapped around each fetch
//! - [`pagination`]: the three pagination protocols behind [`ProviderAdapter`]
//! - [`provider`]: the [`SearchProvider`] codec trait and [`fetch_page`]
//! - [`providers`]: FOFA, Hunter, and Quake codecs
//!
//! # Example
//!
//! ```rust
//! use assetq_provider::{build_provider, QueryOptions};
//! use assetq_core::Provider;
//!
//! let quake = build_provider(Provider::Quake, "token", false);
//! let adapter = quake.adapter(&QueryOptions::default(), chrono::Utc::now());
//! let request = adapter.build_request("app:\"nginx\"", &adapter.initial_state());
//! assert_eq!(request.size, 3000);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod pagination;
pub mod provider;
pub mod providers;
pub mod retry;
pub mod transport;

pub use error::{ProviderError, Result};
pub use pagination::{
    Continuation, CursorToken, PageOffset, PageRequest, PageResponse, PageState, Position,
    ProviderAdapter, StartSizeCapped, StopReason, TimeWindow, RESULT_CEILING,
};
pub use provider::{fetch_page, QueryOptions, SearchProvider};
pub use providers::{build_provider, FofaProvider, HunterProvider, QuakeProvider};
pub use retry::RetryPolicy;
pub use transport::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport};
