// Offline CLI argument surface: clap types, local-path checks and the seed
// parser. Everything network-looking is refused before any file is opened.

use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
};

use clap::Parser;
use rfq_core::SplitPolicy;

/// Parsed CLI arguments.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "rfq",
    disable_help_subcommand = true,
    about = "Offline, deterministic comparison of vendor quotations for an RFQ"
)]
pub struct Args {
    /// Dataset JSON (RFQs, vendor submissions, optional params).
    #[arg(long)]
    pub dataset: PathBuf,

    /// RFQ to open. Without it the RFQs of the dataset are listed.
    #[arg(long)]
    pub rfq: Option<String>,

    /// Offer ids to compare, in column order (repeatable or comma separated, at most 3).
    #[arg(long, value_delimiter = ',', requires = "rfq")]
    pub select: Vec<String>,

    /// Params JSON; takes precedence over the dataset's embedded params.
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Split policy override for aggregate-only quotes.
    #[arg(long, value_parser = parse_split)]
    pub split: Option<SplitPolicy>,

    /// Seed for the seeded split. Decimal u64 or 0x-hex (up to 16 digits).
    #[arg(long, value_parser = parse_seed)]
    pub seed: Option<u64>,

    /// Output directory (default: current directory).
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Document format(s) to export for the selection (json, html).
    #[arg(long, value_parser = ["json", "html"], num_args = 0..=2, requires = "select")]
    pub render: Vec<String>,

    /// Language of the HTML document (en, fr).
    #[arg(long, default_value = "en")]
    pub lang: String,

    /// Validate the RFQ's submissions and print the report; nothing is written.
    #[arg(long, requires = "rfq")]
    pub validate_only: bool,

    /// Remind vendors that have not quoted yet.
    #[arg(long, requires = "rfq")]
    pub remind: bool,

    /// Only warnings and errors on stderr.
    #[arg(long)]
    pub quiet: bool,
}

/// Errors surfaced by argument checks. Messages are short and stable.
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NonLocalPath(p) => write!(f, "path must be a local file (no scheme): {p}"),
            CliError::NotFound(p) => write!(f, "file not found: {p}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Decimal u64 or 0x-hex (1..=16 nybbles).
pub fn parse_seed(s: &str) -> Result<u64, String> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) if (1..=16).contains(&hex.len()) && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
            u64::from_str_radix(hex, 16).map_err(|e| format!("hex seed: {e}"))
        }
        Some(_) => Err("hex seed must be 1..16 hex digits".into()),
        None if s.is_empty() => Err("empty seed".into()),
        None => s.parse::<u64>().map_err(|_| format!("seed {s:?} is not a decimal u64")),
    }
}

fn parse_split(s: &str) -> Result<SplitPolicy, String> {
    s.trim()
        .parse::<SplitPolicy>()
        .map_err(|_| format!("unknown split policy {s:?} (expected proportional or seeded)"))
}

const SCHEMES: [&str; 3] = ["http:", "https:", "file:"];

/// Anything carrying a URI scheme is refused; inputs are local files only.
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    let Some(text) = p.to_str() else { return Ok(()) };
    let lower = text.trim().to_ascii_lowercase();
    if lower.contains("://") || SCHEMES.iter().any(|s| lower.starts_with(s)) {
        return Err(CliError::NonLocalPath(text.to_string()));
    }
    Ok(())
}

fn ensure_input_file(p: &Path, flag: &'static str) -> Result<(), CliError> {
    ensure_local_path(p)?;
    match fs::metadata(p) {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(CliError::NotFound(format!("{flag} {}", p.display()))),
    }
}

/// Absolute form of `p`. Paths that do not exist yet (the output directory)
/// are joined onto the working directory instead of canonicalized.
fn absolute(p: &Path) -> PathBuf {
    if let Ok(found) = fs::canonicalize(p) {
        return found;
    }
    if p.is_absolute() {
        return p.to_path_buf();
    }
    match env::current_dir() {
        Ok(cwd) => cwd.join(p),
        Err(_) => p.to_path_buf(),
    }
}

/// Check paths of already-parsed arguments and normalize them.
pub fn validate(mut args: Args) -> Result<Args, CliError> {
    ensure_local_path(&args.out)?;
    ensure_input_file(&args.dataset, "--dataset")?;
    if let Some(p) = &args.params {
        ensure_input_file(p, "--params")?;
    }

    args.dataset = absolute(&args.dataset);
    args.params = args.params.as_deref().map(absolute);
    args.out = absolute(&args.out);
    args.select.retain(|s| !s.trim().is_empty());
    Ok(args)
}

/// Entry point used by main.rs. Clap usage errors exit on their own (code 2).
pub fn parse_and_validate() -> Result<Args, CliError> {
    validate(Args::parse())
}
