//! Edition generation and publishing.
//!
//! Sections are sent to the model strictly one at a time, in order; each
//! response is written to its page file before the next request starts.
//! Any failure aborts the run and leaves already-written pages in place.

use crate::api::AskAsync;
use crate::config::NewsConfig;
use crate::models::{Edition, Section};
use crate::outputs::paths::EditionPaths;
use crate::outputs::{indexes, markdown};
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

/// Generate and write every page of the edition.
///
/// Refuses an empty section list before touching the filesystem.
#[instrument(level = "info", skip_all, fields(date = %paths.day_folder(), sections = sections.len()))]
pub async fn generate_edition<A: AskAsync>(
    ask: &A,
    sections: &[Section],
    paths: &EditionPaths,
) -> Result<Edition, Box<dyn Error>> {
    if sections.is_empty() {
        return Err("edition has no sections".into());
    }
    fs::create_dir_all(paths.edition_dir()).await?;

    let mut pages = Vec::with_capacity(sections.len());
    for (i, section) in sections.iter().enumerate() {
        let number = i + 1;
        info!(page = number, title = %section.title, "Generating page");
        let body = ask.ask(&section.prompt).await?;
        pages.push(markdown::write_page(paths, number, &section.title, &body).await?);
    }

    Ok(Edition {
        date: paths.date(),
        pages,
    })
}

/// Write the edition contents file, then rebuild the root index.
///
/// Returns the path of the rewritten index.
#[instrument(level = "info", skip_all, fields(date = %paths.day_folder()))]
pub async fn publish_edition(
    config: &NewsConfig,
    paths: &EditionPaths,
    edition: &Edition,
) -> Result<PathBuf, Box<dyn Error>> {
    markdown::write_edition_contents(paths, config, edition).await?;
    indexes::rebuild_index(paths.root(), config, Some(edition)).await
}
