//! listmatch - compare two list item fragments
//!
//! Decides whether two fragments from corresponding positions of two document
//! versions are the same item (possibly edited) or unrelated items.
//!
//! Usage:
//!     listmatch "<li>Item: Apple</li>" "<li>Item: Apple (fresh)</li>"
//!     listmatch --file-a old.html --file-b new.html --json
//!     listmatch --file-a old.html "<li>Item: Apple (fresh)</li>"
//!     listmatch "Item: Apple" --candidates items.txt
//!
//! Inline fragments fill whichever of the two slots `--file-a` / `--file-b`
//! leave open, in order.
//!
//! Exit status: 0 on match, 1 on no match, 2 on error.
//!
//! Config layers, lowest precedence first: defaults, `--config`, environment,
//! flags. Only the final result is range-checked.
//!
//! Environment variables:
//! - `LISTMATCH_LENGTH_RATIO`: length ratio threshold (default: 0.1)
//! - `LISTMATCH_COMMON_TEXT_RATIO`: common text ratio threshold (default: 0.6)
//! - `RUST_LOG`: log filter, e.g. `listmatch_core=trace`

mod report;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use listmatch_core::{all_matches, ListItemMatchStrategy, MatcherConfig};
use tracing::{debug, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use report::{candidate_lines, CandidateReport, MatchReport};

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser, Debug)]
#[command(name = "listmatch")]
#[command(about = "Decide whether two list item fragments are the same item")]
#[command(version)]
struct Args {
    /// Inline fragments (old version first)
    #[arg(value_name = "FRAGMENT")]
    fragments: Vec<String>,

    /// Read the first fragment from a file
    #[arg(long)]
    file_a: Option<PathBuf>,

    /// Read the second fragment from a file
    #[arg(long)]
    file_b: Option<PathBuf>,

    /// Compare the first fragment against each line of this file
    #[arg(long, conflicts_with = "file_b")]
    candidates: Option<PathBuf>,

    /// JSON config file with matcher thresholds
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the length ratio threshold
    #[arg(long)]
    length_ratio: Option<f64>,

    /// Override the common text ratio threshold
    #[arg(long)]
    common_text_ratio: Option<f64>,

    /// Print a JSON report
    #[arg(long)]
    json: bool,

    /// Log level (debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    let result = run(&args, |var| std::env::var(var).ok());
    if let Err(e) = &result {
        eprintln!("listmatch: {}", e);
    }
    ExitCode::from(exit_status(&result))
}

/// 0 on match, 1 on no match, 2 on error.
fn exit_status(result: &CliResult<bool>) -> u8 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

/// `RUST_LOG` wins over `--log-level` when set.
fn init_logging(level: &str) {
    let log_level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase()));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Returns whether anything matched.
fn run(args: &Args, env: impl Fn(&str) -> Option<String>) -> CliResult<bool> {
    let config = load_config(args, env)?;
    debug!(?config, "Resolved matcher config");
    let strategy = ListItemMatchStrategy::try_with_config(config)?;

    let (a, b) = resolve_fragments(args)?;

    let Some(b) = b else {
        let path = args
            .candidates
            .as_deref()
            .ok_or("missing second fragment")?;
        let contents = read_file(path)?;
        let candidates = candidate_lines(&contents);
        let report = CandidateReport {
            candidates: candidates.len(),
            matches: all_matches(&strategy, &a, &candidates),
        };

        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            for idx in &report.matches {
                println!("{}\t{}", idx, candidates[*idx]);
            }
        }
        return Ok(!report.matches.is_empty());
    };

    let report = MatchReport::build(&strategy, &a, &b);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.summary());
    }
    Ok(report.is_match)
}

/// Defaults, then config file, then `env`, then flags; validated once at the end.
fn load_config(args: &Args, env: impl Fn(&str) -> Option<String>) -> CliResult<MatcherConfig> {
    let mut config = match &args.config {
        Some(path) => MatcherConfig::load_file(path)?,
        None => MatcherConfig::default(),
    }
    .overlay_vars(env)?;

    if let Some(ratio) = args.length_ratio {
        config.length_ratio_threshold = ratio;
    }
    if let Some(ratio) = args.common_text_ratio {
        config.common_text_ratio_threshold = ratio;
    }
    config.validate()?;
    Ok(config)
}

/// First fragment, and the second unless comparing against `--candidates`.
/// `--file-a` / `--file-b` fill their slot; inline fragments fill the rest in order.
fn resolve_fragments(args: &Args) -> CliResult<(String, Option<String>)> {
    let mut inline = args.fragments.iter();

    let a = match &args.file_a {
        Some(path) => read_file(path)?,
        None => inline.next().ok_or("missing first fragment")?.clone(),
    };
    let b = match (&args.file_b, &args.candidates) {
        (Some(path), _) => Some(read_file(path)?),
        (None, Some(_)) => None,
        (None, None) => Some(inline.next().ok_or("missing second fragment")?.clone()),
    };

    if let Some(extra) = inline.next() {
        return Err(format!("unexpected extra fragment {:?}", extra).into());
    }
    Ok((a, b))
}

fn read_file(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e).into())
}
