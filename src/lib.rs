//! # arxiv-digest
//!
//! Build a curated digest of arXiv papers: fetch, convert to text,
//! summarize with an LLM, filter for AI relevance, and assemble a single
//! markdown report.
//!
//! ## Why this crate?
//!
//! Skimming arXiv by hand does not scale, and raw abstracts are dense. This
//! crate automates the loop: it pulls the most relevant papers for a query,
//! extracts each paper's full text from its PDF, asks an OpenAI-compatible
//! model for a plain-language summary, then asks the same model whether the
//! paper is actually about AI (and not, say, physics wearing an ML hat).
//! Papers that pass land in `report.md`; every intermediate artifact is
//! kept on disk for inspection.
//!
//! ## Pipeline Overview
//!
//! ```text
//! query
//!  │
//!  ├─ 1. Fetch    arXiv Atom API → paper records (relevance-sorted)
//!  ├─ 2. Convert  PDF download → text extraction → light markdown
//!  ├─ 3. Summary  chat-completions call, persisted verbatim per paper
//!  ├─ 4. Filter   re-read summary, strip headings, true/false relevance
//!  └─ 5. Report   accepted papers assembled into report.md
//! ```
//!
//! Stages run strictly in order and papers are processed sequentially
//! within each stage. A paper whose PDF will not convert continues with
//! empty text; a paper whose summary cannot be re-read or classified is
//! left out of the report. Both are recorded in the run output.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arxiv_digest::{run, DigestConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DigestConfig::builder()
//!         .query("prompt engineering")
//!         .max_results(3)
//!         .build()?;
//!     let output = run(&config).await?;
//!     println!("{}", output.report);
//!     eprintln!("accepted {}/{} papers, tokens: {} in / {} out",
//!         output.accepted_count(),
//!         output.stats.papers_fetched,
//!         output.stats.prompt_tokens,
//!         output.stats.completion_tokens);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `arxiv-digest` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! arxiv-digest = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod digest;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod store;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{DigestConfig, DigestConfigBuilder};
pub use digest::{run, run_sync, search};
pub use error::{DigestError, PaperSkip};
pub use output::{DigestOutput, DigestStats, PaperRecord, ReportEntry};
pub use progress::{DigestProgress, NoopProgress, ProgressCallback};
