//! # SheSpeaks
//!
//! Static page generator for an LGBTQ+ community site. Each run resolves the
//! visitor's location, aggregates news from community RSS feeds, classifies
//! and balances the stories, and writes the page as JSON and Markdown.
//!
//! ## Usage
//!
//! ```sh
//! shespeaks_news -j ./json -m ./markdown
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Location**: device position, IP lookup, timezone, language, default
//! 2. **Fetching**: every configured feed, one at a time
//! 3. **Processing**: filter, classify, deduplicate, select grid and carousel
//! 4. **Output**: JSON page files and a Markdown page

use chrono::{Local, Utc};
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod classify;
mod cli;
mod config;
mod directory;
mod error;
mod feeds;
mod location;
mod models;
mod outputs;
mod pipeline;
mod select;
mod utils;

use api::HttpClient;
use cli::Cli;
use location::FixedPosition;
use models::Coordinates;
use outputs::{json, markdown};
use pipeline::{Environment, build_page};
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("shespeaks starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.json_output_dir, ?args.markdown_output_dir, offline = args.offline, "Parsed CLI arguments");

    let config = config::load_config(args.config.as_deref()).await?;

    // Early check: both output dirs must be writable
    for dir in [&args.json_output_dir, &args.markdown_output_dir] {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "Output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let http = if args.offline {
        info!("Offline mode; every network request will fail fast");
        HttpClient::offline()
    } else {
        HttpClient::new(&config.http.user_agent, config.http.timeout())
    };
    let position = FixedPosition(
        args.latitude
            .zip(args.longitude)
            .map(|(latitude, longitude)| Coordinates { latitude, longitude }),
    );
    let env = Environment {
        timezone: location::runtime_timezone(args.timezone.as_deref()),
        language: args.language.clone(),
    };

    // ---- Build page ----
    let page = build_page(&http, &position, &config, env, Local::now()).await;

    // ---- JSON output ----
    if let Err(e) = json::write_page(&page, &args.json_output_dir).await {
        error!(error = %e, "Failed to write JSON");
    }

    // ---- Markdown output ----
    let md = markdown::page_to_markdown(&page, Utc::now());
    let output_markdown_filename = format!(
        "{}/{}_{}.md",
        args.markdown_output_dir, page.local_date, page.time_of_day
    );

    info!(path = %output_markdown_filename, "Writing Markdown");
    if let Err(e) = tokio::fs::write(&output_markdown_filename, md).await {
        error!(path = %output_markdown_filename, error = %e, "Failed writing Markdown");
    } else {
        info!(path = %output_markdown_filename, "Wrote page Markdown");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        country = %page.location.country,
        articles = page.grid.len() + page.carousel.len(),
        edition = %page.time_of_day,
        "Execution complete"
    );

    Ok(())
}
