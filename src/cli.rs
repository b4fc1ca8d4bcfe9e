//! Command-line interface definitions for SheSpeaks.
//!
//! Runtime hints for the location chain can come from flags or from the
//! usual environment variables (`TZ`, `LANG`). Without either, the timezone
//! is read from the operating system.

use clap::Parser;

/// Command-line arguments for one page build.
///
/// # Examples
///
/// ```sh
/// # Basic usage with required arguments
/// shespeaks_news -j ./json -m ./markdown
///
/// # Known device position, custom config
/// shespeaks_news -j ./json -m ./markdown -c config.yaml --latitude 51.5 --longitude -0.12
///
/// # No network at all: location from TZ/LANG, news error state
/// shespeaks_news -j ./json -m ./markdown --offline
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the JSON page files
    #[arg(short, long)]
    pub json_output_dir: String,

    /// Output directory for the Markdown page
    #[arg(short, long)]
    pub markdown_output_dir: String,

    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Device latitude, used for reverse geocoding
    #[arg(long, requires = "longitude", allow_negative_numbers = true)]
    pub latitude: Option<f64>,

    /// Device longitude, used for reverse geocoding
    #[arg(long, requires = "latitude", allow_negative_numbers = true)]
    pub longitude: Option<f64>,

    /// IANA timezone name, e.g. Europe/London (defaults to the system zone)
    #[arg(long, env = "TZ")]
    pub timezone: Option<String>,

    /// Preferred language tag, e.g. en_GB.UTF-8
    #[arg(long, env = "LANG")]
    pub language: Option<String>,

    /// Skip every network request
    #[arg(long)]
    pub offline: bool,
}
