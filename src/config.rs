//! Configuration types for a digest run.
//!
//! All run behaviour is controlled through [`DigestConfig`], built via its
//! [`DigestConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share configs across tasks, log them, and diff two runs to understand
//! why their reports differ.
//!
//! # Design choice: builder over constructor
//! A fourteen-field constructor is unreadable and breaks on every new field.
//! The builder pattern lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::DigestError;
use crate::progress::DigestProgress;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for one digest run.
///
/// Built via [`DigestConfig::builder()`] or using
/// [`DigestConfig::default()`]. The defaults reproduce a full run against a
/// local OpenAI-compatible server: query arXiv for "prompt engineering",
/// take the single most relevant paper, summarize it with
/// `deepseek-r1-distill-qwen-7b` at `http://127.0.0.1:8000/v1`.
///
/// # Example
/// ```rust
/// use arxiv_digest::DigestConfig;
///
/// let config = DigestConfig::builder()
///     .query("retrieval augmented generation")
///     .max_results(5)
///     .model("qwen2.5-7b-instruct")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct DigestConfig {
    /// arXiv search expression. Default: "prompt engineering".
    ///
    /// Sent as `search_query=all:{query}`, so it matches across titles,
    /// abstracts, and full metadata. arXiv's own query syntax (field
    /// prefixes, AND/OR) passes through untouched.
    pub query: String,

    /// Maximum number of papers to fetch. Default: 1. Must be ≥ 1.
    ///
    /// Every fetched paper costs one PDF download and two LLM calls, so this
    /// is the main cost knob. arXiv asks clients to keep single requests
    /// under a few hundred entries.
    pub max_results: usize,

    /// Base URL of the arXiv query API. Default:
    /// `https://export.arxiv.org/api/query`.
    ///
    /// Overridable for mirrors and for tests that stand in a local server.
    pub arxiv_base_url: String,

    /// Base URL of the OpenAI-compatible server, without the
    /// `/chat/completions` suffix. Default: `http://127.0.0.1:8000/v1`.
    pub llm_base_url: String,

    /// Bearer token sent with every chat-completions request.
    /// Default: "sk-1234" (the placeholder local servers accept).
    pub api_key: String,

    /// Model identifier passed to the chat-completions endpoint.
    /// Default: "deepseek-r1-distill-qwen-7b".
    pub model: String,

    /// Sampling temperature for the summarization call. Default: 0.7.
    ///
    /// Summaries are meant to read well, so some variety helps. Lower it
    /// toward 0 if you want near-deterministic output for diffing runs.
    pub summary_temperature: f32,

    /// Sampling temperature for the relevance-classification call.
    /// Default: 0.8.
    pub filter_temperature: f32,

    /// Maximum tokens the model may generate per call. Default: None
    /// (server default, no limit sent).
    ///
    /// Setting this too low truncates summaries mid-sentence; the truncated
    /// text is still persisted verbatim.
    pub max_tokens: Option<u32>,

    /// Directory for per-paper artifacts (raw text and summaries).
    /// Default: `./papers`. Created if missing.
    pub papers_dir: PathBuf,

    /// Path of the final digest report. Default: `./report.md`.
    pub report_path: PathBuf,

    /// Timeout for arXiv HTTP requests (feed query and PDF downloads),
    /// in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Per-LLM-call timeout in seconds. Default: 300.
    ///
    /// Local models summarizing a full paper can legitimately take minutes;
    /// a short timeout here turns slow hardware into spurious fatal errors.
    pub api_timeout_secs: u64,

    /// Progress observer invoked at paper-level milestones. Default: None.
    pub progress: Option<Arc<dyn DigestProgress>>,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            query: "prompt engineering".to_string(),
            max_results: 1,
            arxiv_base_url: "https://export.arxiv.org/api/query".to_string(),
            llm_base_url: "http://127.0.0.1:8000/v1".to_string(),
            api_key: "sk-1234".to_string(),
            model: "deepseek-r1-distill-qwen-7b".to_string(),
            summary_temperature: 0.7,
            filter_temperature: 0.8,
            max_tokens: None,
            papers_dir: PathBuf::from("./papers"),
            report_path: PathBuf::from("./report.md"),
            download_timeout_secs: 120,
            api_timeout_secs: 300,
            progress: None,
        }
    }
}

impl fmt::Debug for DigestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestConfig")
            .field("query", &self.query)
            .field("max_results", &self.max_results)
            .field("arxiv_base_url", &self.arxiv_base_url)
            .field("llm_base_url", &self.llm_base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("summary_temperature", &self.summary_temperature)
            .field("filter_temperature", &self.filter_temperature)
            .field("max_tokens", &self.max_tokens)
            .field("papers_dir", &self.papers_dir)
            .field("report_path", &self.report_path)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("progress", &self.progress.as_ref().map(|_| "<dyn DigestProgress>"))
            .finish()
    }
}

impl DigestConfig {
    /// Create a new builder for `DigestConfig`.
    pub fn builder() -> DigestConfigBuilder {
        DigestConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`DigestConfig`].
#[derive(Debug)]
pub struct DigestConfigBuilder {
    config: DigestConfig,
}

impl DigestConfigBuilder {
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.config.query = query.into();
        self
    }

    pub fn max_results(mut self, n: usize) -> Self {
        self.config.max_results = n;
        self
    }

    pub fn arxiv_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.arxiv_base_url = url.into();
        self
    }

    pub fn llm_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.llm_base_url = url.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn summary_temperature(mut self, t: f32) -> Self {
        self.config.summary_temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn filter_temperature(mut self, t: f32) -> Self {
        self.config.filter_temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.max_tokens = Some(n);
        self
    }

    pub fn papers_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.papers_dir = dir.into();
        self
    }

    pub fn report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.report_path = path.into();
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn progress(mut self, callback: Arc<dyn DigestProgress>) -> Self {
        self.config.progress = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<DigestConfig, DigestError> {
        let c = &self.config;
        if c.query.trim().is_empty() {
            return Err(DigestError::InvalidConfig(
                "Search query must not be empty".into(),
            ));
        }
        if c.max_results == 0 {
            return Err(DigestError::InvalidConfig(
                "max_results must be ≥ 1".into(),
            ));
        }
        if c.model.trim().is_empty() {
            return Err(DigestError::InvalidConfig(
                "Model name must not be empty".into(),
            ));
        }
        if c.llm_base_url.trim().is_empty() {
            return Err(DigestError::InvalidConfig(
                "LLM base URL must not be empty".into(),
            ));
        }
        if c.arxiv_base_url.trim().is_empty() {
            return Err(DigestError::InvalidConfig(
                "arXiv base URL must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
