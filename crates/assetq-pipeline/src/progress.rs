//! Progress reporting.

use assetq_core::ResultRow;
use std::io::{self, Write};

/// Receives progress while a query is paged through.
pub trait Progress: Send {
    /// A new (deduplicated) row arrived.
    fn row(&mut self, row: &ResultRow);

    /// A page was processed; `rows` is the running row count.
    fn page(&mut self, page: u32, rows: usize);
}

/// Console progress: one line per link as rows arrive, page status through
/// `tracing`.
pub struct ConsoleProgress {
    links: Option<Box<dyn Write + Send>>,
}

impl ConsoleProgress {
    /// Create a reporter. With `emit_links`, every row's link is printed to
    /// stdout as it arrives.
    #[must_use]
    pub fn new(emit_links: bool) -> Self {
        if emit_links {
            Self::with_link_writer(io::stdout())
        } else {
            Self { links: None }
        }
    }

    /// Echo links to stderr, keeping stdout free for final output.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_link_writer(io::stderr())
    }

    /// Echo links to an arbitrary writer.
    #[must_use]
    pub fn with_link_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            links: Some(Box::new(writer)),
        }
    }
}

impl Progress for ConsoleProgress {
    fn row(&mut self, row: &ResultRow) {
        let Some(out) = self.links.as_mut() else {
            return;
        };
        if row.link().is_empty() {
            return;
        }
        if let Err(e) = writeln!(out, "{}", row.link()) {
            tracing::debug!("Cannot echo link: {}", e);
        }
    }

    fn page(&mut self, page: u32, rows: usize) {
        if let Some(out) = self.links.as_mut() {
            let _ = out.flush();
        }
        tracing::info!("page {}, {} rows so far", page, rows);
    }
}

/// Discards progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn row(&mut self, _row: &ResultRow) {}

    fn page(&mut self, _page: u32, _rows: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetq_core::Field;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_links_echoed_one_per_line() {
        let buffer = SharedBuffer::default();
        let mut progress = ConsoleProgress::with_link_writer(buffer.clone());

        progress.row(&ResultRow::new().with(Field::Link, "http://a"));
        progress.row(&ResultRow::new().with(Field::Ip, "1.1.1.1"));
        progress.row(&ResultRow::new().with(Field::Link, "http://b"));
        progress.page(1, 3);

        let text = String::from_utf8(buffer.0.lock().unwrap().clone()).expect("utf-8 output");
        assert_eq!(text, "http://a\nhttp://b\n");
    }

    #[test]
    fn test_links_off() {
        let mut progress = ConsoleProgress::new(false);
        assert!(progress.links.is_none());
        progress.row(&ResultRow::new().with(Field::Link, "http://a"));
    }
}
