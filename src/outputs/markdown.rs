//! Markdown rendering for pages and edition contents.
//!
//! A page file is exactly the section heading followed by the generated text:
//!
//! ```text
//! # Page 1
//!
//! <generated text>
//! ```
//!
//! The edition contents file lists every page of the day and is what the
//! root index links to from its archive.

use crate::config::NewsConfig;
use crate::models::{Edition, Page};
use crate::outputs::paths::{page_file_name, to_html_link, EditionPaths};
use itertools::Itertools;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

/// Render one page.
pub fn render_page(title: &str, body: &str) -> String {
    format!("# {title}\n\n{body}")
}

/// Render the per-edition contents page.
pub fn render_edition_contents(config: &NewsConfig, edition: &Edition) -> String {
    let pages = edition
        .pages
        .iter()
        .map(|page| format!("- [{}]({})", page.title, to_html_link(&page.file_name)))
        .join("\n");
    format!(
        "# {} – {}\n\n{}\n",
        config.title,
        edition.date.format("%Y-%m-%d"),
        pages
    )
}

/// Write a generated section to `page_NN.md` inside the edition directory.
///
/// The edition directory must already exist.
#[instrument(level = "info", skip(paths, body), fields(date = %paths.day_folder()))]
pub async fn write_page(
    paths: &EditionPaths,
    number: usize,
    title: &str,
    body: &str,
) -> Result<Page, Box<dyn Error>> {
    let path = paths.page_path(number);
    fs::write(&path, render_page(title, body)).await?;
    info!(path = %path.display(), bytes = body.len(), "Wrote page");
    Ok(Page {
        number,
        title: title.to_string(),
        file_name: page_file_name(number),
    })
}

/// Write `edition_YYYY-MM-DD.md` for a finished edition.
#[instrument(level = "info", skip_all, fields(date = %paths.day_folder(), pages = edition.pages.len()))]
pub async fn write_edition_contents(
    paths: &EditionPaths,
    config: &NewsConfig,
    edition: &Edition,
) -> Result<PathBuf, Box<dyn Error>> {
    let path = paths.edition_file();
    fs::write(&path, render_edition_contents(config, edition)).await?;
    info!(path = %path.display(), "Wrote edition contents");
    Ok(path)
}
