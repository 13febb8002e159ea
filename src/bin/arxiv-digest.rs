//! CLI binary for arxiv-digest.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `DigestConfig` and prints results.

use anyhow::{Context, Result};
use arxiv_digest::{run, search, DigestConfig, DigestProgress, ProgressCallback};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar and per-paper log
/// lines using [indicatif]. Each paper contributes two bar steps, one for
/// its summarization pass and one for its classification pass.
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Per-paper wall-clock start times for elapsed reporting.
    start_times: Mutex<HashMap<usize, Instant>>,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set dynamically
    /// by `on_run_start` (called once the feed has been fetched).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_run_start

        // Initial style: spinner only (no counter until we know the total).
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Fetching");
        bar.set_message("Querying arXiv…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
        })
    }

    /// Switch to the full progress-bar style once we know the paper count.
    fn activate_bar(&self, total_papers: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} steps  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        // Two steps per paper: summarize, then classify.
        self.bar.set_length((total_papers * 2) as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Digesting");
        self.bar.reset_eta();
    }

    fn elapsed_secs(&self, idx: usize) -> f64 {
        self.start_times
            .lock()
            .unwrap()
            .remove(&idx)
            .map(|t| t.elapsed().as_millis() as f64 / 1000.0)
            .unwrap_or(0.0)
    }
}

impl DigestProgress for CliProgressCallback {
    fn on_run_start(&self, total: usize) {
        self.activate_bar(total);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Fetched {total} papers, starting digest…"))
        ));
    }

    fn on_paper_start(&self, idx: usize, _total: usize, paper_id: &str) {
        self.start_times
            .lock()
            .unwrap()
            .insert(idx, Instant::now());
        self.bar.set_message(format!("paper {paper_id}"));
    }

    fn on_paper_summarized(&self, idx: usize, total: usize, paper_id: &str, summary_chars: usize) {
        let secs = self.elapsed_secs(idx);
        self.bar.println(format!(
            "  {} {:>2}/{:<2}  {}  summarized  {}  {}",
            green("✓"),
            idx,
            total,
            bold(paper_id),
            dim(&format!("{summary_chars:>5} chars")),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_paper_classified(&self, idx: usize, total: usize, paper_id: &str, accepted: bool) {
        self.bar.println(format!(
            "  {} {:>2}/{:<2}  {}  {}",
            if accepted { green("✓") } else { dim("·") },
            idx,
            total,
            bold(paper_id),
            if accepted {
                green("accepted")
            } else {
                dim("rejected")
            },
        ));
        self.bar.inc(1);
    }

    fn on_paper_skipped(&self, idx: usize, total: usize, paper_id: &str, reason: &str) {
        // Truncate very long reasons to keep output tidy.
        let msg: String = if reason.chars().count() > 80 {
            let head: String = reason.chars().take(79).collect();
            format!("{head}\u{2026}")
        } else {
            reason.to_string()
        };

        self.bar.println(format!(
            "  {} {:>2}/{:<2}  {}  {}",
            red("✗"),
            idx,
            total,
            bold(paper_id),
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, total: usize, accepted: usize) {
        self.bar.finish_and_clear();
        if total == 0 {
            eprintln!("{} no papers matched the query", cyan("⚠"));
        } else {
            eprintln!(
                "{} {}/{} papers accepted into the report",
                green("✔"),
                bold(&accepted.to_string()),
                total,
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Full run with defaults: one "prompt engineering" paper through a local
  # OpenAI-compatible server at http://127.0.0.1:8000/v1
  arxiv-digest

  # More papers, different topic
  arxiv-digest --query "retrieval augmented generation" --max-results 5

  # Point at another endpoint and model
  arxiv-digest --base-url https://api.openai.com/v1 --api-key $OPENAI_API_KEY \
      --model gpt-4o-mini

  # Preview what a query matches (no LLM calls, no files written)
  arxiv-digest --query "agentic workflows" --max-results 10 --search-only

  # Machine-readable run summary
  arxiv-digest --json > run.json

  # Custom artifact locations
  arxiv-digest --papers-dir /data/papers -o /data/report.md

ENVIRONMENT VARIABLES:
  ARXIV_DIGEST_QUERY          Search query
  ARXIV_DIGEST_MAX_RESULTS    Papers to fetch
  ARXIV_DIGEST_BASE_URL       OpenAI-compatible base URL (without /chat/completions)
  ARXIV_DIGEST_API_KEY        Bearer token for the LLM endpoint
  ARXIV_DIGEST_MODEL          Model identifier
  ARXIV_DIGEST_PAPERS_DIR     Per-paper artifact directory
  ARXIV_DIGEST_OUTPUT         Report path
  RUST_LOG                    Tracing filter (overrides -v/-q)

SETUP:
  Any OpenAI-compatible server works (vLLM, LM Studio, Ollama, llama.cpp,
  or a hosted API). The defaults target a local server:

    1. Serve a model:   vllm serve deepseek-r1-distill-qwen-7b --port 8000
    2. Run the digest:  arxiv-digest

  Artifacts land in ./papers/ ({id}.md raw text, summary_{id}.md summary);
  the final digest is written to ./report.md.
"#;

/// Fetch arXiv papers, summarize them with an LLM, and build a digest report.
#[derive(Parser, Debug)]
#[command(
    name = "arxiv-digest",
    version,
    about = "Fetch arXiv papers, summarize them with an LLM, and build a digest report",
    long_about = "Query arXiv for papers matching a search expression, convert each paper's PDF \
to text, summarize it in plain language through any OpenAI-compatible chat-completions endpoint, \
filter the summaries for AI relevance, and assemble the accepted papers into a markdown report.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// arXiv search query.
    #[arg(long, env = "ARXIV_DIGEST_QUERY", default_value = "prompt engineering")]
    query: String,

    /// Maximum number of papers to fetch.
    #[arg(short = 'n', long, env = "ARXIV_DIGEST_MAX_RESULTS", default_value_t = 1)]
    max_results: usize,

    /// OpenAI-compatible base URL, without the /chat/completions suffix.
    #[arg(long, env = "ARXIV_DIGEST_BASE_URL", default_value = "http://127.0.0.1:8000/v1")]
    base_url: String,

    /// Bearer token for the LLM endpoint.
    #[arg(
        long,
        env = "ARXIV_DIGEST_API_KEY",
        hide_env_values = true,
        default_value = "sk-1234"
    )]
    api_key: String,

    /// Model identifier.
    #[arg(
        long,
        env = "ARXIV_DIGEST_MODEL",
        default_value = "deepseek-r1-distill-qwen-7b"
    )]
    model: String,

    /// arXiv query API base URL (mirrors, test servers).
    #[arg(
        long,
        env = "ARXIV_DIGEST_ARXIV_URL",
        default_value = "https://export.arxiv.org/api/query"
    )]
    arxiv_url: String,

    /// Directory for per-paper artifacts.
    #[arg(long, env = "ARXIV_DIGEST_PAPERS_DIR", default_value = "./papers")]
    papers_dir: PathBuf,

    /// Write the report to this path.
    #[arg(short, long, env = "ARXIV_DIGEST_OUTPUT", default_value = "./report.md")]
    output: PathBuf,

    /// Sampling temperature for summarization.
    #[arg(long, env = "ARXIV_DIGEST_SUMMARY_TEMPERATURE", default_value_t = 0.7)]
    summary_temperature: f32,

    /// Sampling temperature for relevance classification.
    #[arg(long, env = "ARXIV_DIGEST_FILTER_TEMPERATURE", default_value_t = 0.8)]
    filter_temperature: f32,

    /// Max tokens per LLM call (server default when unset).
    #[arg(long, env = "ARXIV_DIGEST_MAX_TOKENS")]
    max_tokens: Option<u32>,

    /// HTTP timeout for arXiv requests in seconds.
    #[arg(long, env = "ARXIV_DIGEST_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Per-LLM-call timeout in seconds.
    #[arg(long, env = "ARXIV_DIGEST_API_TIMEOUT", default_value_t = 300)]
    api_timeout: u64,

    /// Only query arXiv and print the matches; no LLM calls, no files.
    #[arg(long)]
    search_only: bool,

    /// Output the structured run result (DigestOutput) as JSON.
    #[arg(long, env = "ARXIV_DIGEST_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "ARXIV_DIGEST_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "ARXIV_DIGEST_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "ARXIV_DIGEST_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.search_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn DigestProgress>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Search-only mode ─────────────────────────────────────────────────
    if cli.search_only {
        let papers = search(&config).await.context("arXiv search failed")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&papers).context("Failed to serialise results")?
            );
        } else if papers.is_empty() {
            eprintln!("No papers matched '{}'", cli.query);
        } else {
            for paper in &papers {
                println!(
                    "{}  {}  {}",
                    bold(&paper.paper_id),
                    dim(&paper.published.format("%Y-%m-%d").to_string()),
                    paper.title
                );
                println!("    {}", dim(&paper.pdf_url));
            }
        }
        return Ok(());
    }

    // ── Run the pipeline ─────────────────────────────────────────────────
    let output = run(&config).await.context("Digest run failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet {
        if show_progress {
            // The callback already printed per-paper lines and the final tick.
            eprintln!(
                "   {} tokens in  /  {} tokens out  →  {}",
                dim(&output.stats.prompt_tokens.to_string()),
                dim(&output.stats.completion_tokens.to_string()),
                bold(&cli.output.display().to_string()),
            );
        } else {
            eprintln!(
                "Digested {}/{} papers in {}ms → {}",
                output.accepted_count(),
                output.stats.papers_fetched,
                output.stats.total_ms,
                cli.output.display()
            );
            if !output.skipped.is_empty() {
                eprintln!("  {} papers dropped out:", output.skipped.len());
                for skip in &output.skipped {
                    eprintln!("    {}", skip);
                }
            }
        }
    }

    Ok(())
}

/// Map CLI args to `DigestConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<DigestConfig> {
    let mut builder = DigestConfig::builder()
        .query(&cli.query)
        .max_results(cli.max_results)
        .arxiv_base_url(&cli.arxiv_url)
        .llm_base_url(&cli.base_url)
        .api_key(&cli.api_key)
        .model(&cli.model)
        .summary_temperature(cli.summary_temperature)
        .filter_temperature(cli.filter_temperature)
        .papers_dir(&cli.papers_dir)
        .report_path(&cli.output)
        .download_timeout_secs(cli.download_timeout)
        .api_timeout_secs(cli.api_timeout);

    if let Some(n) = cli.max_tokens {
        builder = builder.max_tokens(n);
    }
    if let Some(cb) = progress {
        builder = builder.progress(cb);
    }

    builder.build().context("Invalid configuration")
}
