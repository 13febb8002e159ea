//! Progress-callback trait for per-paper pipeline events.
//!
//! Inject an [`Arc<dyn DigestProgress>`] via
//! [`crate::config::DigestConfigBuilder::progress`] to receive events as the
//! pipeline works through the batch.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a channel, a log line, or a terminal progress bar
//! without the library knowing anything about how the host application
//! communicates. The trait is `Send + Sync` because the config holding it is
//! `Clone` and may cross task boundaries; the pipeline itself invokes the
//! callbacks sequentially, in batch order.
//!
//! # Example
//!
//! ```rust
//! use arxiv_digest::{DigestProgress, DigestConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     summarized: Arc<AtomicUsize>,
//! }
//!
//! impl DigestProgress for CountingCallback {
//!     fn on_paper_summarized(&self, idx: usize, total: usize, paper_id: &str, chars: usize) {
//!         self.summarized.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} {} summarized ({} chars)", idx, total, paper_id, chars);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     summarized: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = DigestConfig::builder()
//!     .progress(counter as Arc<dyn DigestProgress>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the pipeline as it works through the fetched papers.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. `idx` is always 1-indexed; the same paper passes
/// through `on_paper_start` and `on_paper_summarized` in pass one, then
/// `on_paper_classified` or `on_paper_skipped` in pass two.
pub trait DigestProgress: Send + Sync {
    /// Called once after the fetch stage, before any paper is processed.
    fn on_run_start(&self, total: usize) {
        let _ = total;
    }

    /// Called when a paper's convert-and-summarize pass begins.
    fn on_paper_start(&self, idx: usize, total: usize, paper_id: &str) {
        let _ = (idx, total, paper_id);
    }

    /// Called when a paper's summary has been persisted.
    /// `summary_chars` is the character length of the stored summary.
    fn on_paper_summarized(&self, idx: usize, total: usize, paper_id: &str, summary_chars: usize) {
        let _ = (idx, total, paper_id, summary_chars);
    }

    /// Called when the relevance check for a paper completes.
    fn on_paper_classified(&self, idx: usize, total: usize, paper_id: &str, accepted: bool) {
        let _ = (idx, total, paper_id, accepted);
    }

    /// Called when a paper drops out of the filter pass (summary missing or
    /// classification failed).
    fn on_paper_skipped(&self, idx: usize, total: usize, paper_id: &str, reason: &str) {
        let _ = (idx, total, paper_id, reason);
    }

    /// Called once after the report has been written.
    fn on_run_complete(&self, total: usize, accepted: usize) {
        let _ = (total, accepted);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgress;

impl DigestProgress for NoopProgress {}

/// Convenience alias matching the type stored in [`crate::config::DigestConfig`].
pub type ProgressCallback = Arc<dyn DigestProgress>;
