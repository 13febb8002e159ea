//! System prompts for summarization and relevance classification.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth**: tweaking how summaries read or what the
//!    relevance filter accepts requires editing exactly one place.
//!
//! 2. **Testability**: unit tests can import and inspect prompts directly
//!    without spinning up a real model, making prompt regressions easy to
//!    catch.
//!
//! The relevance prompt asks the model to answer with the literal word
//! `true` or `false`; [`crate::pipeline::llm::LlmClient::classify`] depends
//! on that contract.

/// System prompt for the summarization call.
///
/// Asks for three plain-language paragraphs aimed at a high-school reader.
/// The model reliably emits `# Paragraph N` headings for these; the report
/// stage strips them before publication.
pub const SUMMARIZE_SYSTEM_PROMPT: &str = concat!(
    "You are a helpful assistant. ",
    "Simplify the technical paper below into three paragraphs for a high school student. ",
    "Important words need to be in boldface. Use simple analogies. ",
    "You can add at the end a bullet list that describes complicated technical terms ",
    "in simple language.",
);

/// System prompt for the relevance-classification call.
///
/// The expected reply is the single word `true` or `false`.
pub const RELEVANCE_SYSTEM_PROMPT: &str = concat!(
    "You are a helpful assistant. ",
    "The following is a summary of a technical paper. ",
    "If the summary is talking about AI, return true unless it is related to physics, ",
    "autonomous driving, medical, hardware, or pure math. ",
    "In other words, AI related to industries other than those listed above. ",
    "Otherwise, return false.",
);

/// Build the user message carrying a paper's converted full text.
pub fn paper_user_message(markdown: &str) -> String {
    format!("\nPaper:\n{}\n", markdown)
}

/// Build the user message carrying a paper's summary for classification.
pub fn summary_user_message(summary: &str) -> String {
    format!("\nPaper Summary:\n{}\n", summary)
}
