//! Error types for the retrieval pipeline.

use assetq_export::ExportError;
use assetq_provider::ProviderError;
use thiserror::Error;

/// Errors that can end a query run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Page could not be fetched, or the provider rejected the query
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A page could not be persisted, even after one retry. Earlier pages
    /// remain on disk.
    #[error("failed to write page {page} ({fetched} rows fetched so far): {source}")]
    Sink {
        /// Round whose rows were lost
        page: u32,
        /// Raw rows fetched including the lost page
        fetched: usize,
        /// Final write error
        #[source]
        source: ExportError,
    },

    /// I/O error reading a query file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
