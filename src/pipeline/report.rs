//! Report stage: clean persisted summaries and assemble the digest report.
//!
//! ## Why strip `# Paragraph N` headings?
//!
//! The summarization prompt asks for "three paragraphs", and instruction-
//! tuned models frequently label them with synthetic headings
//! (`# Paragraph 1`, `## Paragraph 2 ...`). Those labels carry no content
//! and break the report's own heading hierarchy, so every line matching one
//! is replaced with a newline before classification and before the summary
//! lands in the report. The stored summary file keeps them; only the report
//! view is cleaned.

use crate::output::ReportEntry;
use once_cell::sync::Lazy;
use regex::Regex;

/// First line of every report.
pub const REPORT_HEADER: &str = "# Important AI Papers\n";

static RE_PARAGRAPH_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#+\s*Paragraph\s*\d+.*$").unwrap());

/// Replace each synthetic `# Paragraph N` heading line with a newline.
///
/// Line-anchored: a `Paragraph 2` mention inside running text survives.
pub fn strip_paragraph_headings(summary: &str) -> String {
    RE_PARAGRAPH_HEADING.replace_all(summary, "\n").to_string()
}

/// Render one accepted paper as a report section.
pub fn format_entry(entry: &ReportEntry) -> String {
    format!(
        "# {}\n* ID: {}\n* Link: {}\n## Original Summary / Abstract:\n{}\n{}\n---\n",
        entry.title, entry.paper_id, entry.pdf_url, entry.abstract_text, entry.summary
    )
}

/// Assemble the final report: header plus one section per accepted paper,
/// joined with single newlines.
///
/// No accepted papers yields a header-only report, which is still written.
pub fn assemble_report(entries: &[ReportEntry]) -> String {
    let mut parts = vec![REPORT_HEADER.to_string()];
    parts.extend(entries.iter().map(format_entry));
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, id: &str) -> ReportEntry {
        ReportEntry {
            paper_id: id.to_string(),
            title: title.to_string(),
            entry_url: format!("http://arxiv.org/abs/{}", id),
            pdf_url: format!("http://arxiv.org/pdf/{}", id),
            abstract_text: "An abstract.".to_string(),
            summary: "A clean summary.".to_string(),
        }
    }

    #[test]
    fn strips_heading_lines_of_any_level() {
        let summary = "# Paragraph 1\nFirst part.\n## Paragraph 2: details\nSecond part.";
        let cleaned = strip_paragraph_headings(summary);
        assert!(!cleaned.contains("Paragraph 1"));
        assert!(!cleaned.contains("Paragraph 2"));
        assert!(cleaned.contains("First part."));
        assert!(cleaned.contains("Second part."));
    }

    #[test]
    fn heading_line_becomes_blank_line() {
        assert_eq!(strip_paragraph_headings("# Paragraph 1\nBody"), "\n\nBody");
    }

    #[test]
    fn inline_mention_survives() {
        let summary = "As Paragraph 2 of the paper notes, models drift.";
        assert_eq!(strip_paragraph_headings(summary), summary);
    }

    #[test]
    fn lowercase_heading_survives() {
        let summary = "# paragraph 1\nBody";
        assert_eq!(strip_paragraph_headings(summary), summary);
    }

    #[test]
    fn entry_fields_in_order() {
        let text = format_entry(&entry("Prompt Patterns", "2301.00001v1"));
        let title_pos = text.find("# Prompt Patterns").unwrap();
        let id_pos = text.find("* ID: 2301.00001v1").unwrap();
        let link_pos = text.find("* Link: http://arxiv.org/pdf/2301.00001v1").unwrap();
        let abs_pos = text.find("## Original Summary / Abstract:").unwrap();
        let sum_pos = text.find("A clean summary.").unwrap();
        assert!(title_pos < id_pos && id_pos < link_pos && link_pos < abs_pos && abs_pos < sum_pos);
        assert!(text.ends_with("---\n"));
    }

    #[test]
    fn empty_run_yields_header_only_report() {
        assert_eq!(assemble_report(&[]), "# Important AI Papers\n");
    }

    #[test]
    fn report_joins_header_and_entries_with_newlines() {
        let entries = [entry("First", "1"), entry("Second", "2")];
        let report = assemble_report(&entries);
        assert!(report.starts_with("# Important AI Papers\n\n# First\n"));
        let second_pos = report.find("# Second").unwrap();
        let first_sep = report.find("---\n").unwrap();
        assert!(first_sep < second_pos);
        assert_eq!(report.matches("---\n").count(), 2);
    }
}
