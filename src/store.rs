//! Papers-directory layout: where per-paper artifacts live on disk.
//!
//! Two files per paper, both under the configured papers directory:
//!
//! * `{paper_id}.md` — the raw converted full text (may be empty when
//!   conversion failed)
//! * `summary_{paper_id}.md` — the model's summary, stored verbatim
//!
//! The filter pass re-reads summaries from disk rather than from memory, so
//! these files are part of the pipeline contract, not a cache: deleting a
//! summary file between passes removes that paper from the report.

use crate::error::DigestError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path of a paper's raw converted text.
pub fn raw_text_path(papers_dir: &Path, paper_id: &str) -> PathBuf {
    papers_dir.join(format!("{}.md", paper_id))
}

/// Path of a paper's persisted summary.
pub fn summary_path(papers_dir: &Path, paper_id: &str) -> PathBuf {
    papers_dir.join(format!("summary_{}.md", paper_id))
}

/// Create the papers directory if it does not exist.
pub async fn ensure_papers_dir(papers_dir: &Path) -> Result<(), DigestError> {
    tokio::fs::create_dir_all(papers_dir)
        .await
        .map_err(|e| DigestError::PapersDirCreate {
            path: papers_dir.to_path_buf(),
            source: e,
        })
}

/// Persist a paper's raw converted text. Write failure is fatal.
pub async fn write_raw_text(
    papers_dir: &Path,
    paper_id: &str,
    content: &str,
) -> Result<PathBuf, DigestError> {
    let path = raw_text_path(papers_dir, paper_id);
    tokio::fs::write(&path, content)
        .await
        .map_err(|e| DigestError::FileWrite {
            path: path.clone(),
            source: e,
        })?;
    debug!("Wrote raw text ({} bytes) to {}", content.len(), path.display());
    Ok(path)
}

/// Persist a paper's summary verbatim. Write failure is fatal.
pub async fn write_summary(
    papers_dir: &Path,
    paper_id: &str,
    summary: &str,
) -> Result<PathBuf, DigestError> {
    let path = summary_path(papers_dir, paper_id);
    tokio::fs::write(&path, summary)
        .await
        .map_err(|e| DigestError::FileWrite {
            path: path.clone(),
            source: e,
        })?;
    debug!("Wrote summary ({} bytes) to {}", summary.len(), path.display());
    Ok(path)
}

/// Read a paper's persisted summary back.
///
/// Returns the raw `io::Error` so the filter pass can decide what a missing
/// or unreadable file means (it skips the paper rather than aborting).
pub async fn read_summary(papers_dir: &Path, paper_id: &str) -> Result<String, std::io::Error> {
    tokio::fs::read_to_string(summary_path(papers_dir, paper_id)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_layout() {
        let dir = Path::new("./papers");
        assert_eq!(
            raw_text_path(dir, "2301.00001v1"),
            PathBuf::from("./papers/2301.00001v1.md")
        );
        assert_eq!(
            summary_path(dir, "2301.00001v1"),
            PathBuf::from("./papers/summary_2301.00001v1.md")
        );
    }

    #[tokio::test]
    async fn summary_written_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        ensure_papers_dir(tmp.path()).await.unwrap();

        let summary = "# Paragraph 1\nModels are like **recipes**.\n";
        write_summary(tmp.path(), "2301.00001v1", summary).await.unwrap();

        let read_back = read_summary(tmp.path(), "2301.00001v1").await.unwrap();
        assert_eq!(read_back, summary);
    }

    #[tokio::test]
    async fn missing_summary_is_an_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = read_summary(tmp.path(), "nope").await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn empty_raw_text_still_creates_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_raw_text(tmp.path(), "2301.00002v1", "").await.unwrap();
        assert!(path.exists());
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "");
    }
}
