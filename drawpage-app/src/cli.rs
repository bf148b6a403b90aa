//! Command-line arguments for the `drawpage` binary.

use clap::Parser;
use drawpage_common::observability::LogFormat;
use std::path::PathBuf;

/// Print the marker-element markup of a draw results page.
///
/// ```sh
/// drawpage https://results.example lotto 2041
/// drawpage https://results.example lotto 2041 --json --timeout-ms 60000
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Base URL of the results site
    pub base_url: String,

    /// Game slug, the first path segment after the base URL
    pub slug: String,

    /// Draw number, the last path segment
    pub draw_no: String,

    /// YAML config file (defaults to <config dir>/drawpage/drawpage.yaml when present)
    #[arg(short, long, env = "DRAWPAGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the marker selector
    #[arg(short, long)]
    pub selector: Option<String>,

    /// Override the navigation timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Print a JSON array instead of one fragment per line
    #[arg(long)]
    pub json: bool,

    /// Log encoding for stderr and the log file
    #[arg(long, env = "DRAWPAGE_LOG_FORMAT", default_value = "text")]
    pub log_format: LogFormat,
}
