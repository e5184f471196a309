//! # AI Newspaper
//!
//! Generates a daily multi-page AI newspaper in Markdown. Each page is
//! written by an OpenAI-compatible LLM, either from a fixed topical prompt or
//! from an entry of a configured RSS/Atom feed, and an `index.md` linking the
//! day's pages and every past edition is rebuilt after each run.
//!
//! ## Usage
//!
//! ```sh
//! OPENAI_API_KEY=sk-... ai_newspaper -o ./output
//! ```
//!
//! ## Architecture
//!
//! The run is a straight, single-threaded pipeline:
//! 1. **Sources**: Collect sections from the config or from feeds
//! 2. **Generation**: Ask the model for each section, one request at a time
//! 3. **Output**: Write page files, the edition contents, and the root index

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod cli;
mod config;
mod models;
mod outputs;
mod pipeline;
mod sources;
mod utils;

use api::OpenAiClient;
use cli::Cli;
use config::{require_api_key, NewsConfig};
use outputs::indexes;
use outputs::paths::EditionPaths;
use utils::ensure_writable_dir;

#[tokio::main(flavor = "current_thread")]
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
    info!("ai_newspaper starting up");

    let args = Cli::parse();
    debug!(output_dir = %args.output_dir.display(), source = ?args.source, reindex = args.reindex, "Parsed CLI arguments");

    if let Err(e) = run(args).await {
        error!(error = %e, "Run aborted");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

#[instrument(level = "info", skip_all)]
async fn run(args: Cli) -> Result<(), Box<dyn Error>> {
    // The credential is checked before any file or network access.
    let api_key = if args.reindex {
        None
    } else {
        Some(require_api_key(args.api_key)?)
    };

    let config = NewsConfig::load(args.config.as_deref()).await?;
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let paths = EditionPaths::new(args.output_dir, date);

    ensure_writable_dir(paths.root()).await?;

    let Some(api_key) = api_key else {
        let index = indexes::rebuild_index(paths.root(), &config, None).await?;
        info!(path = %index.display(), "Index rebuilt");
        return Ok(());
    };

    let http = reqwest::Client::new();
    let sections = sources::collect_sections(args.source, &config, &http).await?;
    let client = OpenAiClient::new(&config, api_key);

    let edition = pipeline::generate_edition(&client, &sections, &paths).await?;
    let index = pipeline::publish_edition(&config, &paths, &edition).await?;
    info!(
        pages = edition.pages.len(),
        dir = %paths.edition_dir().display(),
        index = %index.display(),
        "Edition published"
    );
    Ok(())
}
