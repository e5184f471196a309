//! Content sources for an edition.
//!
//! A run draws its sections from exactly one source:
//!
//! | Source | Input | Sections |
//! |--------|-------|----------|
//! | [`SourceKind::Sections`] | `sections` in the config | one per topical prompt |
//! | [`SourceKind::Feeds`] | `feeds` in the config | one per feed entry, first N per feed |
//!
//! Either way the result is an ordered `Vec<Section>`; position in the
//! vector becomes the page number.

pub mod feeds;

use crate::config::NewsConfig;
use crate::models::Section;
use clap::ValueEnum;
use reqwest::Client;
use std::error::Error;
use tracing::{info, instrument};

/// Where the sections of an edition come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Fixed topical prompts from the configuration.
    Sections,
    /// Entries fetched from the configured RSS/Atom feeds.
    Feeds,
}

/// Produce the sections for this run.
///
/// A source that yields nothing is an error, so an empty edition is never
/// published over an existing one.
#[instrument(level = "info", skip(config, client))]
pub async fn collect_sections(
    kind: SourceKind,
    config: &NewsConfig,
    client: &Client,
) -> Result<Vec<Section>, Box<dyn Error>> {
    let sections = match kind {
        SourceKind::Sections => config.sections.clone(),
        SourceKind::Feeds => feeds::fetch_all(client, &config.feeds, config.max_entries_per_feed)
            .await?
            .iter()
            .map(|entry| feeds::entry_to_section(entry, &config.summary_prompt))
            .collect(),
    };
    if sections.is_empty() {
        return Err(format!("{kind:?} source produced no sections; nothing to publish").into());
    }
    info!(count = sections.len(), "Collected sections");
    Ok(sections)
}
