//! Search provider implementations.

pub mod common;
pub mod fofa;
pub mod hunter;
pub mod quake;

pub use fofa::FofaProvider;
pub use hunter::HunterProvider;
pub use quake::QuakeProvider;

use crate::provider::SearchProvider;
use assetq_core::Provider;

/// Build the codec for a provider.
///
/// `fofa_cursor` selects FOFA's token-chained endpoint; other providers
/// ignore it.
#[must_use]
pub fn build_provider(
    provider: Provider,
    key: impl Into<String>,
    fofa_cursor: bool,
) -> Box<dyn SearchProvider> {
    match provider {
        Provider::Fofa => Box::new(FofaProvider::new(key).with_cursor(fofa_cursor)),
        Provider::Hunter => Box::new(HunterProvider::new(key)),
        Provider::Quake => Box::new(QuakeProvider::new(key)),
    }
}
