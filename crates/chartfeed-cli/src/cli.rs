//! CLI argument definitions for chartfeed.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fetch` | Fetch a metric series and write a chart document |
//! | `stats` | Per-range percent changes for a series |
//! | `derive` | Build the cumulative-buybacks vs market-cap dataset |
//!
//! # Examples
//!
//! ```bash
//! # Fetch a merged price-and-fees chart document
//! chartfeed fetch https://api.example.test/metrics/pump.json \
//!     --metric price --metric fees --out data/pump.json
//!
//! # Stats panel payload for a local document
//! chartfeed stats data/pump.json --metric price --pretty
//!
//! # One range only
//! chartfeed stats data/pump.json --metric price --range 1W
//!
//! # Derived buybacks-vs-mcap dataset
//! chartfeed derive data/pump_price_buybacks_usd.json \
//!     --circ-supply 354000000 --out data/pump_mcap_buybacks.json
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Chart-ready series data from heterogeneous metric feeds.
#[derive(Debug, Parser)]
#[command(
    name = "chartfeed",
    author,
    version,
    about = "Fetch, normalize, and query financial chart series"
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a metric series over HTTP and emit a `{ "series": [...] }` document.
    Fetch(FetchArgs),
    /// Percent changes per range token (24H, 1W, 1M, 3M, YTD, ALL).
    Stats(StatsArgs),
    /// Derive cumulative buybacks, market cap, and percent bought.
    Derive(DeriveArgs),
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// JSON resource URL.
    pub url: String,

    /// Value field to read, repeatable for a merged multi-metric document,
    /// e.g. `--metric price --metric fees`.
    /// Falls back to the generic probe order when omitted.
    #[arg(long = "metric", value_name = "KEY")]
    pub metrics: Vec<String>,

    /// Extra query parameter, repeatable, as `name=value`.
    #[arg(long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    /// Request timeout in milliseconds.
    #[arg(long, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Output file; prints to stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Local document path or HTTP(S) URL.
    pub source: String,

    /// Value field to read.
    #[arg(long)]
    pub metric: Option<String>,

    /// Report a single range token instead of the full summary.
    #[arg(long)]
    pub range: Option<String>,
}

#[derive(Debug, Args)]
pub struct DeriveArgs {
    /// Local price-and-buybacks document.
    pub input: PathBuf,

    /// Circulating supply used to compute market cap from price.
    /// Market cap and percent-bought are null when omitted.
    #[arg(long)]
    pub circ_supply: Option<f64>,

    /// Output file; prints to stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
}
