//! Error types for the arxiv-digest library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`DigestError`] — **Fatal**: the run cannot proceed at all (bad
//!   configuration, arXiv query failed, summarization API down, artifact
//!   write failed). Returned as `Err(DigestError)` from the top-level
//!   `run*` functions.
//!
//! * [`PaperSkip`] — **Non-fatal**: a single paper dropped out of one stage
//!   (PDF would not convert, its summary file went missing, the relevance
//!   call failed) but the rest of the batch is fine. Collected in
//!   [`crate::output::DigestOutput::skipped`] so callers can inspect what
//!   fell through instead of losing the whole digest to one bad paper.
//!
//! The separation lets callers decide their own tolerance: abort when any
//! paper is skipped, log and continue, or collect all skips for a post-run
//! report.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the arxiv-digest library.
///
/// Per-paper failures use [`PaperSkip`] and are stored in
/// [`crate::output::DigestOutput`] rather than propagated here.
#[derive(Debug, Error)]
pub enum DigestError {
    // ── Fetch errors ──────────────────────────────────────────────────────
    /// The arXiv query request could not be sent or returned an error status.
    #[error("arXiv search failed for query '{query}': {reason}\nCheck your internet connection and the API base URL.")]
    SearchFailed { query: String, reason: String },

    /// The arXiv response body was not a parseable Atom feed.
    #[error("Failed to parse arXiv Atom feed: {detail}")]
    FeedParse { detail: String },

    /// An entry in the feed was missing a field the pipeline requires.
    #[error("arXiv entry '{entry_id}' is malformed: {detail}")]
    MalformedEntry { entry_id: String, detail: String },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The chat-completions API returned a non-success status or an
    /// unusable body.
    #[error("LLM API error: {message}\nCheck that the server at the configured base URL is running and the model name is correct.")]
    LlmApi { message: String },

    /// The chat-completions call exceeded the configured timeout.
    #[error("LLM API call timed out after {secs}s\nIncrease --api-timeout or check the server.")]
    LlmTimeout { secs: u64 },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create the papers directory.
    #[error("Failed to create papers directory '{path}': {source}")]
    PapersDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write a per-paper artifact (raw text or summary).
    #[error("Failed to write '{path}': {source}\nCheck the papers directory is writable.")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write the final report.
    #[error("Failed to write report '{path}': {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal, per-paper drop-out.
///
/// Stored in [`crate::output::DigestOutput::skipped`]. The run continues
/// past every one of these; only [`DigestError`] aborts it.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PaperSkip {
    /// PDF download or text extraction failed; the paper was carried
    /// forward with empty converted text.
    #[error("Paper {paper_id}: PDF conversion failed: {detail}")]
    ConversionFailed { paper_id: String, detail: String },

    /// The summary file was missing or unreadable in the filter pass.
    #[error("Paper {paper_id}: summary file unreadable: {detail}")]
    SummaryUnreadable { paper_id: String, detail: String },

    /// The relevance classification call failed.
    #[error("Paper {paper_id}: relevance check failed: {detail}")]
    FilterFailed { paper_id: String, detail: String },
}

impl PaperSkip {
    /// The id of the paper this skip belongs to.
    pub fn paper_id(&self) -> &str {
        match self {
            PaperSkip::ConversionFailed { paper_id, .. }
            | PaperSkip::SummaryUnreadable { paper_id, .. }
            | PaperSkip::FilterFailed { paper_id, .. } => paper_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_failed_display() {
        let e = DigestError::SearchFailed {
            query: "prompt engineering".into(),
            reason: "connection refused".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("prompt engineering"), "got: {msg}");
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn llm_timeout_display() {
        let e = DigestError::LlmTimeout { secs: 300 };
        assert!(e.to_string().contains("300s"));
    }

    #[test]
    fn file_write_display_includes_path() {
        let e = DigestError::FileWrite {
            path: PathBuf::from("papers/2301.00001v1.md"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.to_string().contains("papers/2301.00001v1.md"));
    }

    #[test]
    fn skip_exposes_paper_id() {
        let s = PaperSkip::SummaryUnreadable {
            paper_id: "2301.00001v1".into(),
            detail: "No such file".into(),
        };
        assert_eq!(s.paper_id(), "2301.00001v1");
    }

    #[test]
    fn skip_serializes() {
        let s = PaperSkip::FilterFailed {
            paper_id: "2301.00002v2".into(),
            detail: "HTTP 500".into(),
        };
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("FilterFailed"));
        assert!(json.contains("2301.00002v2"));
    }
}
