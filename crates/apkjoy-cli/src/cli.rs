//! CLI argument parsing using clap.

use apkjoy_core::config::DEFAULT_BUFFER_SIZE;
use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "apkjoy")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract an installed package to an APK file
    Extract(ExtractArgs),
    /// Print the installed package file of a package
    Path(PathArgs),
    /// Check that a file is a well-formed APK
    Verify(VerifyArgs),
    /// List previously extracted packages
    List(ListArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

/// Where package identifiers are resolved.
#[derive(clap::Args)]
pub struct RegistryArgs {
    /// JSON map of package name to installed APK path, used instead of the
    /// system package manager
    #[arg(long, value_name = "FILE", env = "APKJOY_REGISTRY_FILE")]
    pub registry_file: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Package identifier (e.g. com.example.app)
    #[arg(value_name = "PACKAGE")]
    pub package: String,

    /// Destination file (default: <STORAGE_ROOT>/ExtractedAPKs/<PACKAGE>.apk)
    #[arg(value_name = "DESTINATION")]
    pub destination: Option<PathBuf>,

    /// Directory default destinations are created under (default: current
    /// directory)
    #[arg(long, value_name = "DIR", env = "APKJOY_STORAGE_ROOT")]
    pub storage_root: Option<PathBuf>,

    /// Copy buffer size in bytes (accepts K and M suffixes)
    #[arg(long, value_name = "SIZE", default_value_t = DEFAULT_BUFFER_SIZE, value_parser = parse_byte_size)]
    pub buffer_size: usize,

    /// Inspect the extracted file and fail if it is not a valid APK
    #[arg(long)]
    pub verify: bool,

    #[command(flatten)]
    pub registry: RegistryArgs,
}

#[derive(clap::Args)]
pub struct PathArgs {
    /// Package identifier (e.g. com.example.app)
    #[arg(value_name = "PACKAGE")]
    pub package: String,

    #[command(flatten)]
    pub registry: RegistryArgs,
}

#[derive(clap::Args)]
pub struct VerifyArgs {
    /// Path to the APK file
    #[arg(value_name = "APK")]
    pub apk: PathBuf,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Directory the ExtractedAPKs folder lives in (default: current
    /// directory)
    #[arg(long, value_name = "DIR", env = "APKJOY_STORAGE_ROOT")]
    pub storage_root: Option<PathBuf>,

    /// Show sizes in human-readable format
    #[arg(short = 'H', long)]
    pub human_readable: bool,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Parse byte size with optional suffix (K, M)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<usize, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024 * 1024)
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<usize>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}
