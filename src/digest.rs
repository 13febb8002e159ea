//! Digest orchestration: the top-level entry points.
//!
//! ## Two passes over the batch
//!
//! Pass one converts and summarizes every fetched paper, persisting both
//! artifacts as it goes. Pass two re-reads each summary *from disk*, strips
//! the synthetic headings, classifies it, and collects accepted papers into
//! the report. Re-reading from disk is deliberate: the summary files are the
//! interface between the passes, so a run can be audited (or a summary
//! hand-edited) before the filter consumes it, and a missing file simply
//! leaves that paper out of the report.
//!
//! ## Failure tolerance
//!
//! PDF conversion failures and pass-two read/classify failures are absorbed:
//! logged, recorded in [`DigestOutput::skipped`], and the run continues.
//! Everything else (the arXiv query, summarization calls, artifact and
//! report writes) aborts the run with a [`DigestError`].

use crate::config::DigestConfig;
use crate::error::{DigestError, PaperSkip};
use crate::output::{DigestOutput, DigestStats, PaperRecord, ReportEntry};
use crate::pipeline::{convert, fetch, llm, report};
use crate::store;
use std::time::Instant;
use tracing::{info, warn};

/// Run the full pipeline: fetch, convert, summarize, filter, report.
///
/// This is the primary entry point for the library. The report is written
/// to `config.report_path` and also returned in the output.
///
/// # Returns
/// `Ok(DigestOutput)` on success, even if some papers dropped out along the
/// way (check `output.skipped`).
///
/// # Errors
/// Returns `Err(DigestError)` only for fatal errors:
/// - arXiv query or feed parse failure
/// - a summarization call failure
/// - a failed write of any artifact or of the report
pub async fn run(config: &DigestConfig) -> Result<DigestOutput, DigestError> {
    let total_start = Instant::now();
    info!(
        "Starting digest run: query='{}', max_results={}",
        config.query, config.max_results
    );

    // ── Step 1: Fetch papers ─────────────────────────────────────────────
    let fetch_start = Instant::now();
    let mut papers = fetch::fetch_papers(config).await?;
    let fetch_ms = fetch_start.elapsed().as_millis() as u64;

    let total = papers.len();
    if let Some(ref cb) = config.progress {
        cb.on_run_start(total);
    }

    // ── Step 2: Prepare artifact directory and LLM client ────────────────
    store::ensure_papers_dir(&config.papers_dir).await?;
    let client = llm::LlmClient::new(config)?;

    let mut stats = DigestStats {
        papers_fetched: total,
        fetch_ms,
        ..Default::default()
    };
    let mut skipped: Vec<PaperSkip> = Vec::new();
    let mut convert_ms = 0u64;
    let mut llm_ms = 0u64;

    // ── Step 3: Convert and summarize each paper (pass one) ──────────────
    for (i, paper) in papers.iter_mut().enumerate() {
        let idx = i + 1;
        if let Some(ref cb) = config.progress {
            cb.on_paper_start(idx, total, &paper.paper_id);
        }

        let convert_start = Instant::now();
        paper.markdown =
            match convert::convert_paper(&paper.pdf_url, config.download_timeout_secs).await {
                Ok(markdown) => markdown,
                Err(e) => {
                    warn!(
                        "Paper {}: PDF conversion failed, continuing with empty text: {}",
                        paper.paper_id, e
                    );
                    stats.conversion_failures += 1;
                    skipped.push(PaperSkip::ConversionFailed {
                        paper_id: paper.paper_id.clone(),
                        detail: e.to_string(),
                    });
                    String::new()
                }
            };
        convert_ms += convert_start.elapsed().as_millis() as u64;

        store::write_raw_text(&config.papers_dir, &paper.paper_id, &paper.markdown).await?;

        let llm_start = Instant::now();
        let outcome = client.summarize(&paper.markdown).await?;
        llm_ms += llm_start.elapsed().as_millis() as u64;
        stats.prompt_tokens += outcome.usage.prompt_tokens;
        stats.completion_tokens += outcome.usage.completion_tokens;

        store::write_summary(&config.papers_dir, &paper.paper_id, &outcome.content).await?;
        stats.summarized += 1;

        info!(
            "Paper {}/{} ({}): summarized, {} chars",
            idx,
            total,
            paper.paper_id,
            outcome.content.chars().count()
        );
        if let Some(ref cb) = config.progress {
            cb.on_paper_summarized(idx, total, &paper.paper_id, outcome.content.chars().count());
        }
    }

    // ── Step 4: Filter each summary (pass two) ───────────────────────────
    let mut entries: Vec<ReportEntry> = Vec::new();
    for (i, paper) in papers.iter().enumerate() {
        let idx = i + 1;

        let summary = match store::read_summary(&config.papers_dir, &paper.paper_id).await {
            Ok(s) => s,
            Err(e) => {
                warn!(
                    "Paper {}: summary file unreadable, leaving it out of the report: {}",
                    paper.paper_id, e
                );
                stats.skipped += 1;
                skipped.push(PaperSkip::SummaryUnreadable {
                    paper_id: paper.paper_id.clone(),
                    detail: e.to_string(),
                });
                if let Some(ref cb) = config.progress {
                    cb.on_paper_skipped(idx, total, &paper.paper_id, "summary file unreadable");
                }
                continue;
            }
        };

        let cleaned = report::strip_paragraph_headings(&summary);

        let llm_start = Instant::now();
        let verdict = client.classify(&cleaned).await;
        llm_ms += llm_start.elapsed().as_millis() as u64;

        match verdict {
            Ok((accepted, usage)) => {
                stats.prompt_tokens += usage.prompt_tokens;
                stats.completion_tokens += usage.completion_tokens;
                if accepted {
                    stats.accepted += 1;
                    entries.push(ReportEntry {
                        paper_id: paper.paper_id.clone(),
                        title: paper.title.clone(),
                        entry_url: paper.entry_url.clone(),
                        pdf_url: paper.pdf_url.clone(),
                        abstract_text: paper.abstract_text.clone(),
                        summary: cleaned,
                    });
                } else {
                    stats.rejected += 1;
                }
                info!(
                    "Paper {}/{} ({}): {}",
                    idx,
                    total,
                    paper.paper_id,
                    if accepted { "accepted" } else { "rejected" }
                );
                if let Some(ref cb) = config.progress {
                    cb.on_paper_classified(idx, total, &paper.paper_id, accepted);
                }
            }
            Err(e) => {
                warn!(
                    "Paper {}: relevance check failed, leaving it out of the report: {}",
                    paper.paper_id, e
                );
                stats.skipped += 1;
                skipped.push(PaperSkip::FilterFailed {
                    paper_id: paper.paper_id.clone(),
                    detail: e.to_string(),
                });
                if let Some(ref cb) = config.progress {
                    cb.on_paper_skipped(idx, total, &paper.paper_id, "relevance check failed");
                }
            }
        }
    }

    // ── Step 5: Assemble and write the report ────────────────────────────
    let report_text = report::assemble_report(&entries);
    tokio::fs::write(&config.report_path, &report_text)
        .await
        .map_err(|e| DigestError::ReportWrite {
            path: config.report_path.clone(),
            source: e,
        })?;
    info!(
        "Wrote report with {} entries to {}",
        entries.len(),
        config.report_path.display()
    );

    stats.convert_ms = convert_ms;
    stats.llm_ms = llm_ms;
    stats.total_ms = total_start.elapsed().as_millis() as u64;

    if let Some(ref cb) = config.progress {
        cb.on_run_complete(total, entries.len());
    }

    Ok(DigestOutput {
        report: report_text,
        entries,
        papers,
        skipped,
        stats,
    })
}

/// Run only the fetch stage: query arXiv and return the parsed records.
///
/// Does not touch the filesystem or the LLM endpoint. Useful for tuning a
/// query before paying for a full run.
pub async fn search(config: &DigestConfig) -> Result<Vec<PaperRecord>, DigestError> {
    fetch::fetch_papers(config).await
}

/// Synchronous wrapper around [`run`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_sync(config: &DigestConfig) -> Result<DigestOutput, DigestError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| DigestError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(run(config))
}
