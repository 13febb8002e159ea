//! Output types: the paper record threaded through both passes, report
//! entries, run statistics, and the top-level [`DigestOutput`].
//!
//! Everything here is `Serialize` so the CLI's `--json` mode and any host
//! application can persist a run's result without extra glue.

use crate::error::PaperSkip;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One paper as fetched from arXiv, enriched with its converted text.
///
/// `markdown` is the full-text conversion of the paper's PDF; when
/// conversion fails it is the empty string and the paper still flows
/// through the rest of the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Trailing segment of the entry URL, e.g. `2301.00001v1`.
    pub paper_id: String,

    /// Canonical abstract-page URL, e.g. `http://arxiv.org/abs/2301.00001v1`.
    pub entry_url: String,

    /// Entry title, whitespace-normalized.
    pub title: String,

    /// Entry abstract, whitespace-normalized.
    #[serde(rename = "abstract")]
    pub abstract_text: String,

    /// Publication timestamp from the feed.
    pub published: DateTime<Utc>,

    /// Direct PDF link.
    pub pdf_url: String,

    /// Converted full text. Empty string when conversion failed.
    pub markdown: String,
}

/// A paper accepted by the relevance filter, ready for the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub paper_id: String,
    pub title: String,
    pub entry_url: String,
    /// The link printed in the report entry.
    pub pdf_url: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// The persisted summary with synthetic `# Paragraph N` headings removed.
    pub summary: String,
}

/// Counters and timings for one digest run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DigestStats {
    /// Papers returned by the arXiv query.
    pub papers_fetched: usize,
    /// Papers whose PDF conversion failed (carried forward with empty text).
    pub conversion_failures: usize,
    /// Papers whose summary was persisted.
    pub summarized: usize,
    /// Papers the relevance filter accepted into the report.
    pub accepted: usize,
    /// Papers the relevance filter rejected.
    pub rejected: usize,
    /// Papers that dropped out of the filter pass entirely.
    pub skipped: usize,
    /// Prompt tokens reported by the chat-completions `usage` blocks.
    pub prompt_tokens: u64,
    /// Completion tokens reported by the chat-completions `usage` blocks.
    pub completion_tokens: u64,
    /// Wall-clock time of the fetch stage.
    pub fetch_ms: u64,
    /// Wall-clock time spent downloading and converting PDFs.
    pub convert_ms: u64,
    /// Wall-clock time spent in LLM calls (both passes).
    pub llm_ms: u64,
    /// Wall-clock time of the whole run.
    pub total_ms: u64,
}

/// Result of a full digest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestOutput {
    /// The exact report text that was written to disk.
    pub report: String,

    /// Accepted papers, in feed order.
    pub entries: Vec<ReportEntry>,

    /// Every fetched paper, in feed order, with converted text attached.
    pub papers: Vec<PaperRecord>,

    /// Per-paper drop-outs (conversion failures, unreadable summaries,
    /// failed relevance checks). The run completed despite these.
    pub skipped: Vec<PaperSkip>,

    /// Counters and timings.
    pub stats: DigestStats,
}

impl DigestOutput {
    /// Number of papers that made it into the report.
    pub fn accepted_count(&self) -> usize {
        self.entries.len()
    }

    /// True when every fetched paper converted, summarized, and classified
    /// without a recorded skip.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}
