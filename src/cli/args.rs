//! CLI argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "droidex",
    about = "Collect files, metadata, call logs and WhatsApp backups from an Android device",
    disable_version_flag = true
)]
pub struct CliArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Device serial (overrides config and ANDROID_SERIAL)
    #[arg(long, global = true)]
    pub serial: Option<String>,

    /// Path to the adb executable
    #[arg(long, global = true, value_name = "PATH")]
    pub adb: Option<PathBuf>,

    /// Suppress progress output
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show brand, model, Android version and serial
    Device(JsonArgs),
    /// List matching files without downloading
    Scan(ScanArgs),
    /// Scan and download matching files
    Extract(ExtractArgs),
    /// Print metadata for local files
    Metadata(MetadataArgs),
    /// Dump the call log
    Calls(JsonArgs),
    /// Download WhatsApp databases, backups and keys
    Whatsapp(WhatsappArgs),
    /// Run a complete evaluation and save it as a snapshot
    Evaluate(EvaluateArgs),
    /// Show a saved evaluation snapshot
    View(ViewArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct JsonArgs {
    #[arg(long)]
    pub json: bool,
}

/// Roots and categories shared by scanning commands.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Remote root to walk (repeatable); defaults to the standard media roots
    #[arg(long = "path", value_name = "PATH")]
    pub paths: Vec<String>,

    /// Category to keep (repeatable): images, videos, audio, documents, other, whatsapp_backup
    #[arg(long = "category", value_name = "CATEGORY")]
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct ScanArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    #[arg(long)]
    pub json: bool,

    /// Show only the K largest entries
    #[arg(long, value_name = "K")]
    pub top: Option<usize>,

    /// Sort key: size, name or modified
    #[arg(long, default_value = "size")]
    pub sort: String,
}

#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Local destination directory
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct MetadataArgs {
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct WhatsappArgs {
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Parquet file receiving the evaluation
    #[arg(long, value_name = "FILE")]
    pub snapshot: PathBuf,

    /// Free-form note stored with the evaluation (repeatable)
    #[arg(long = "note", value_name = "KEY=VALUE", value_parser = parse_note)]
    pub notes: Vec<(String, String)>,

    /// Skip the call log
    #[arg(long)]
    pub no_calls: bool,

    /// Skip WhatsApp artifacts
    #[arg(long)]
    pub no_whatsapp: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ViewArgs {
    #[arg(value_name = "SNAPSHOT")]
    pub from_snapshot: PathBuf,

    /// Show only the first K files
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    #[arg(long)]
    pub json: bool,
}

fn parse_note(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("note must be KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err("note key must not be empty".to_string());
    }
    Ok((key.to_string(), value.to_string()))
}

/// Whether the arguments only ask for the version banner.
#[must_use]
pub fn wants_version(args: &[String]) -> bool {
    args.len() == 2 && matches!(args[1].as_str(), "--version" | "-V")
}

/// Parse command line arguments
pub fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    CliArgs::try_parse_from(args).map_err(|e| e.to_string())
}
