//! Convert stage: download a paper's PDF and extract lightly-structured text.
//!
//! ## Why spawn_blocking?
//!
//! `pdf-extract` walks the whole document synchronously and is CPU-bound on
//! large papers. `tokio::task::spawn_blocking` keeps that work off the async
//! worker threads, and it also isolates the extractor: malformed PDFs have
//! been known to make it panic, and a panic inside `spawn_blocking` surfaces
//! as a `JoinError` we can turn into a [`ConvertError`] instead of taking
//! down the runtime.
//!
//! Errors from this stage are non-fatal by contract: the orchestrator logs
//! them and carries the paper forward with empty converted text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// A conversion failure. Absorbed by the orchestrator, never fatal.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("download failed: {0}")]
    Download(String),

    #[error("download timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("payload is not a PDF (first bytes: {magic:?})")]
    NotAPdf { magic: Vec<u8> },

    #[error("text extraction failed: {0}")]
    Extract(String),
}

/// Download `pdf_url` and return its extracted text as light markdown.
pub async fn convert_paper(pdf_url: &str, timeout_secs: u64) -> Result<String, ConvertError> {
    let bytes = download_pdf(pdf_url, timeout_secs).await?;
    verify_pdf_magic(&bytes)?;

    // pdf-extract is synchronous and can panic on malformed input.
    let raw = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| ConvertError::Extract(format!("extraction task panicked: {}", e)))?
        .map_err(|e| ConvertError::Extract(e.to_string()))?;

    debug!("Extracted {} chars from {}", raw.len(), pdf_url);
    Ok(structure_text(&raw))
}

/// Download the PDF bytes, mapping timeouts and bad statuses to errors.
async fn download_pdf(url: &str, timeout_secs: u64) -> Result<Vec<u8>, ConvertError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("arxiv-digest/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ConvertError::Download(e.to_string()))?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            ConvertError::Timeout { secs: timeout_secs }
        } else {
            ConvertError::Download(e.to_string())
        }
    })?;

    if !response.status().is_success() {
        return Err(ConvertError::Download(format!(
            "HTTP {}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ConvertError::Download(e.to_string()))?;

    Ok(bytes.to_vec())
}

/// Reject payloads that do not start with the `%PDF` magic bytes.
fn verify_pdf_magic(bytes: &[u8]) -> Result<(), ConvertError> {
    if bytes.len() >= 4 && &bytes[..4] == b"%PDF" {
        Ok(())
    } else {
        Err(ConvertError::NotAPdf {
            magic: bytes.get(..4).unwrap_or(bytes).to_vec(),
        })
    }
}

// ── Text structuring ─────────────────────────────────────────────────────

static RE_BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

const SECTION_MARKERS: &[&str] = &[
    "abstract",
    "introduction",
    "background",
    "related work",
    "method",
    "methods",
    "methodology",
    "experiments",
    "results",
    "discussion",
    "evaluation",
    "conclusion",
    "conclusions",
    "acknowledgments",
    "references",
    "appendix",
];

/// True when a line is a bare section marker ("Abstract", "1 Introduction",
/// "REFERENCES").
fn is_section_marker(line: &str) -> bool {
    let stripped = line
        .trim()
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == ' ')
        .trim()
        .to_lowercase();
    SECTION_MARKERS.iter().any(|m| stripped == *m)
}

/// Shape raw extracted text into readable markdown.
///
/// Promotes bare section-marker lines to `##` headings, normalizes line
/// endings, trims trailing whitespace, collapses blank-line runs, and ends
/// with exactly one newline. Content lines pass through untouched.
pub fn structure_text(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = String::with_capacity(normalized.len() + 64);

    for line in normalized.lines() {
        let line = line.trim_end();
        if is_section_marker(line) {
            if !out.is_empty() && !out.ends_with("\n\n") {
                out.push('\n');
            }
            out.push_str("## ");
            out.push_str(line.trim());
            out.push('\n');
        } else {
            out.push_str(line);
            out.push('\n');
        }
    }

    let collapsed = RE_BLANK_RUNS.replace_all(&out, "\n\n");
    format!("{}\n", collapsed.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_accepts_pdf() {
        assert!(verify_pdf_magic(b"%PDF-1.7\n...").is_ok());
    }

    #[test]
    fn magic_rejects_html_error_page() {
        let err = verify_pdf_magic(b"<html><body>404</body></html>").unwrap_err();
        assert!(matches!(err, ConvertError::NotAPdf { .. }));
    }

    #[test]
    fn magic_rejects_short_payload() {
        assert!(verify_pdf_magic(b"%P").is_err());
    }

    #[test]
    fn section_markers_detected() {
        assert!(is_section_marker("Abstract"));
        assert!(is_section_marker("REFERENCES"));
        assert!(is_section_marker("  1 Introduction"));
        assert!(is_section_marker("3. Results"));
        assert!(!is_section_marker("Introduction to Birds"));
        assert!(!is_section_marker("2.1 Analysis Setup"));
        assert!(!is_section_marker(""));
    }

    #[test]
    fn markers_become_headings() {
        let raw = "Title Line\nAbstract\nWe study things.\n1 Introduction\nIntro text.";
        let md = structure_text(raw);
        assert!(md.contains("\n## Abstract\n"));
        assert!(md.contains("\n## 1 Introduction\n"));
        assert!(md.contains("We study things.\n"));
    }

    #[test]
    fn existing_headings_left_alone() {
        let md = structure_text("## Abstract\nBody.");
        assert_eq!(md, "## Abstract\nBody.\n");
    }

    #[test]
    fn crlf_normalized_and_blank_runs_collapsed() {
        let md = structure_text("a\r\n\r\n\r\n\r\nb");
        assert_eq!(md, "a\n\nb\n");
    }

    #[test]
    fn empty_extraction_stays_empty() {
        assert_eq!(structure_text("   \n  \n"), "");
    }

    #[test]
    fn output_ends_with_single_newline() {
        let md = structure_text("line one\n\n\n");
        assert_eq!(md, "line one\n");
    }
}
