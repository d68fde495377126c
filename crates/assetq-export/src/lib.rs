//! assetq export - durable CSV output and console rendering of result rows.
//!
//! [`CsvSink`] appends pages of rows to a BOM-prefixed CSV file, writing the
//! header exactly once per file no matter how many runs append to it.
//! [`render_table`] formats rows for the terminal.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod sink;
pub mod table;

pub use error::{ExportError, Result};
pub use sink::{CsvSink, RowSink, BOM};
pub use table::render_table;
