//! Pipeline stages for building a digest.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different text extractor) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! fetch ──▶ convert ──▶ llm ──▶ report
//! (arXiv)   (PDF→text)  (chat)  (strip + assemble)
//! ```
//!
//! 1. [`fetch`]   — query the arXiv Atom API and parse entries into paper
//!    records
//! 2. [`convert`] — download each PDF and extract lightly-structured text;
//!    the only stage where failure is absorbed instead of propagated
//! 3. [`llm`]     — the chat-completions client used for both summarization
//!    and relevance classification
//! 4. [`report`]  — strip synthetic headings from summaries and assemble the
//!    final report text

pub mod convert;
pub mod fetch;
pub mod llm;
pub mod report;
