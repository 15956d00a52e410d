use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use clap::Parser;
use dotenvy::dotenv;
use rn_common::config::NormalizerConfig;
use rn_common::error::ConfigError;
use rn_common::logging::{init_tracing_subscriber, install_tracing_panic_hook};
use rn_common::review::{LlmReviewRequest, ReviewQueue};
use rn_common::{normalize_job, RawJobPosting};
use tracing::{info, warn};

const APP_NAME: &str = "rn-normalizer";

#[derive(Debug, Parser)]
#[command(
    name = "rn-normalizer",
    about = "Normalize scraped nursing job postings (JSON Lines in, JSON Lines out)"
)]
struct Cli {
    /// Raw postings as JSON Lines ("-" for stdin)
    #[arg(long, default_value = "-")]
    input: PathBuf,

    /// Normalized jobs as JSON Lines ("-" for stdout)
    #[arg(long, default_value = "-")]
    output: PathBuf,

    /// Write postings that need LLM review here, highest priority first
    #[arg(long, env = "RN_LLM_QUEUE_PATH")]
    llm_queue: Option<PathBuf>,

    /// Per-employer city/facility tables (JSON)
    #[arg(long, env = "RN_FACILITIES_PATH")]
    facilities: Option<PathBuf>,

    /// Date that relative "Posted N Days Ago" strings resolve against (YYYY-MM-DD, default today UTC)
    #[arg(long)]
    base_date: Option<NaiveDate>,
}

#[derive(Debug, thiserror::Error)]
enum NormalizerError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct BatchSummary {
    read: usize,
    normalized: usize,
    skipped: usize,
    queued_for_review: usize,
}

/// Normalizes every line of `input` into `output`. Malformed lines are
/// logged and skipped; only I/O failures abort the batch.
fn run_batch<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    config: &NormalizerConfig,
    base_date: NaiveDate,
    queue: &mut ReviewQueue,
) -> Result<BatchSummary, NormalizerError> {
    let mut summary = BatchSummary::default();

    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        summary.read += 1;

        let raw: RawJobPosting = match serde_json::from_str(&line) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(line = idx + 1, error = %err, "skipping malformed posting");
                summary.skipped += 1;
                continue;
            }
        };

        let extracted = normalize_job(&raw, config, base_date);
        serde_json::to_writer(&mut output, &extracted.job)?;
        output.write_all(b"\n")?;
        summary.normalized += 1;

        if queue.enqueue_output(&extracted) {
            summary.queued_for_review += 1;
        }
    }

    output.flush()?;
    Ok(summary)
}

fn write_review_queue<W: Write>(
    requests: &[LlmReviewRequest],
    mut output: W,
) -> Result<(), NormalizerError> {
    for request in requests {
        serde_json::to_writer(&mut output, request)?;
        output.write_all(b"\n")?;
    }
    output.flush()?;
    Ok(())
}

fn is_stdio(path: &Path) -> bool {
    path == Path::new("-")
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>, NormalizerError> {
    if is_stdio(path) {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).map_err(|source| NormalizerError::Open {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Box::new(BufReader::new(file)))
}

fn open_output(path: &Path) -> Result<Box<dyn Write>, NormalizerError> {
    if is_stdio(path) {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    let file = File::create(path).map_err(|source| NormalizerError::Open {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Box::new(BufWriter::new(file)))
}

fn run() -> Result<(), NormalizerError> {
    dotenv().ok();
    init_tracing_subscriber(APP_NAME);
    install_tracing_panic_hook(APP_NAME);

    let cli = Cli::parse();
    let base_date = cli.base_date.unwrap_or_else(|| Utc::now().date_naive());
    let config = NormalizerConfig::load(cli.facilities.as_deref())?;

    info!(
        input = %cli.input.display(),
        output = %cli.output.display(),
        base_date = %base_date,
        employers_with_tables = config.facilities.len(),
        "normalizing postings"
    );

    let mut queue = ReviewQueue::default();
    let summary = run_batch(
        open_input(&cli.input)?,
        open_output(&cli.output)?,
        &config,
        base_date,
        &mut queue,
    )?;

    if let Some(path) = cli.llm_queue.as_deref() {
        let requests = queue.drain_by_priority();
        write_review_queue(&requests, open_output(path)?)?;
        info!(path = %path.display(), requests = requests.len(), "wrote LLM review queue");
    }

    info!(
        read = summary.read,
        normalized = summary.normalized,
        skipped = summary.skipped,
        queued_for_review = summary.queued_for_review,
        "batch complete"
    );
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{APP_NAME} failed: {err}");
        std::process::exit(1);
    }
}
