//! Root index rebuild.
//!
//! `index.md` is recomputed from scratch on every run: the current edition's
//! pages are listed inline and every edition found on disk is linked from the
//! archive, newest first. The output depends only on the files under the
//! output root and the edition passed in, so rebuilding twice without new
//! editions yields identical bytes.
//!
//! # Archive pattern
//!
//! Only files matching `YYYY-MM/YYYY-MM-DD/edition_YYYY-MM-DD.md`, with all
//! three dates in agreement, count as editions.

use crate::config::NewsConfig;
use crate::models::{ArchiveEntry, Edition};
use crate::outputs::paths::{index_path, to_html_link, EditionPaths, EDITION_PREFIX};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument};

static ARCHIVE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4}-[0-9]{2})/([0-9]{4}-[0-9]{2}-[0-9]{2})/edition_([0-9]{4}-[0-9]{2}-[0-9]{2})\.md$")
        .expect("archive pattern is valid")
});

/// Match a root-relative, `/`-separated path against the archive pattern.
pub fn archive_entry(relative: &str) -> Option<ArchiveEntry> {
    let caps = ARCHIVE_PATTERN.captures(relative)?;
    let (month, day, file_date) = (&caps[1], &caps[2], &caps[3]);
    if day != file_date || !day.starts_with(month) {
        return None;
    }
    let file_name = relative.rsplit('/').next()?;
    let label = file_name
        .strip_prefix(EDITION_PREFIX)?
        .strip_suffix(".md")?
        .to_string();
    Some(ArchiveEntry {
        label,
        link: to_html_link(relative),
    })
}

/// Names of the directory entries under `dir`; a missing directory is empty.
async fn list_dir(dir: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let mut reader = match fs::read_dir(dir).await {
        Ok(r) => r,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let mut names = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

/// Scan the output root for editions, newest first.
#[instrument(level = "info", skip_all, fields(root = %root.display()))]
pub async fn scan_archive(root: &Path) -> Result<Vec<ArchiveEntry>, Box<dyn Error>> {
    let mut entries = Vec::new();
    for month in list_dir(root).await? {
        let month_dir = root.join(&month);
        if !month_dir.is_dir() {
            continue;
        }
        for day in list_dir(&month_dir).await? {
            let day_dir = month_dir.join(&day);
            if !day_dir.is_dir() {
                continue;
            }
            for file in list_dir(&day_dir).await? {
                let relative = format!("{month}/{day}/{file}");
                match archive_entry(&relative) {
                    Some(entry) => entries.push(entry),
                    None => debug!(%relative, "Skipping non-edition file"),
                }
            }
        }
    }
    let entries = entries
        .into_iter()
        .sorted_by(|a, b| b.cmp(a))
        .collect::<Vec<_>>();
    info!(count = entries.len(), "Scanned archive");
    Ok(entries)
}

/// Render `index.md`.
///
/// With no current edition (re-index only) the pages block is omitted and the
/// heading carries the newest archive date.
pub fn render_index(
    config: &NewsConfig,
    current: Option<&Edition>,
    archive: &[ArchiveEntry],
) -> String {
    let heading_date = current
        .map(|e| e.date.format("%Y-%m-%d").to_string())
        .or_else(|| archive.first().map(|a| a.label.clone()));
    let mut md = match heading_date {
        Some(date) => format!("# 📰 {} – {}\n\n", config.title, date),
        None => format!("# 📰 {}\n\n", config.title),
    };
    md.push_str(&format!("### {}\n\n---\n\n", config.tagline));

    if let Some(edition) = current {
        let paths = EditionPaths::new("", edition.date);
        md.push_str("## 📑 Pages\n\n");
        for page in &edition.pages {
            md.push_str(&format!("- [{}]({})\n", page.title, paths.page_link(&page.file_name)));
        }
        md.push('\n');
    }

    md.push_str("## 🗂️ Archive\n\n");
    if archive.is_empty() {
        md.push_str("_No editions yet._\n");
    } else {
        let links = archive
            .iter()
            .map(|a| format!("- [{}]({})", a.label, a.link))
            .join("\n");
        md.push_str(&links);
        md.push('\n');
    }

    md.push_str(&format!("\n---\n{}\n", config.footer));
    md
}

/// Rescan the archive and rewrite `<root>/index.md` wholesale.
#[instrument(level = "info", skip(config, current), fields(root = %root.display()))]
pub async fn rebuild_index(
    root: &Path,
    config: &NewsConfig,
    current: Option<&Edition>,
) -> Result<PathBuf, Box<dyn Error>> {
    let archive = scan_archive(root).await?;
    let path = index_path(root);
    fs::write(&path, render_index(config, current, &archive)).await?;
    info!(path = %path.display(), editions = archive.len(), "Rebuilt index");
    Ok(path)
}
