//! Edition path resolution.
//!
//! All output paths derive from the output root and the edition date:
//!
//! ```text
//! <root>/index.md
//! <root>/<YYYY-MM>/<YYYY-MM-DD>/edition_<YYYY-MM-DD>.md
//! <root>/<YYYY-MM>/<YYYY-MM-DD>/page_NN.md
//! ```
//!
//! Links written into Markdown are relative, `/`-separated, and point at the
//! rendered `.html` siblings.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// File name of the root index page.
pub const INDEX_FILE: &str = "index.md";
/// Prefix of the per-edition contents file.
pub const EDITION_PREFIX: &str = "edition_";

/// Resolved locations for one edition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditionPaths {
    root: PathBuf,
    date: NaiveDate,
}

impl EditionPaths {
    pub fn new(root: impl Into<PathBuf>, date: NaiveDate) -> Self {
        Self {
            root: root.into(),
            date,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// `YYYY-MM`
    pub fn month_folder(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    /// `YYYY-MM-DD`
    pub fn day_folder(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Edition directory relative to the root, `/`-separated.
    pub fn relative_dir(&self) -> String {
        format!("{}/{}", self.month_folder(), self.day_folder())
    }

    pub fn edition_dir(&self) -> PathBuf {
        self.root.join(self.month_folder()).join(self.day_folder())
    }

    pub fn page_path(&self, number: usize) -> PathBuf {
        self.edition_dir().join(page_file_name(number))
    }

    /// `edition_YYYY-MM-DD.md`
    pub fn edition_file_name(&self) -> String {
        format!("{}{}.md", EDITION_PREFIX, self.day_folder())
    }

    pub fn edition_file(&self) -> PathBuf {
        self.edition_dir().join(self.edition_file_name())
    }

    pub fn index_path(&self) -> PathBuf {
        index_path(&self.root)
    }

    /// Link from the root index to a file inside this edition.
    pub fn page_link(&self, file_name: &str) -> String {
        to_html_link(&format!("{}/{}", self.relative_dir(), file_name))
    }
}

/// `page_NN.md`, 1-based and zero-padded to two digits.
pub fn page_file_name(number: usize) -> String {
    format!("page_{number:02}.md")
}

pub fn index_path(root: &Path) -> PathBuf {
    root.join(INDEX_FILE)
}

/// Rewrite a trailing `.md` extension to `.html`; other links are unchanged.
pub fn to_html_link(link: &str) -> String {
    match link.strip_suffix(".md") {
        Some(stem) => format!("{stem}.html"),
        None => link.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> EditionPaths {
        EditionPaths::new("output", NaiveDate::from_ymd_opt(2025, 1, 5).unwrap())
    }

    #[test]
    fn test_folders() {
        let p = paths();
        assert_eq!(p.month_folder(), "2025-01");
        assert_eq!(p.day_folder(), "2025-01-05");
        assert_eq!(p.relative_dir(), "2025-01/2025-01-05");
    }

    #[test]
    fn test_paths_are_deterministic() {
        let p = paths();
        assert_eq!(p, paths());
        assert_eq!(p.edition_dir(), PathBuf::from("output/2025-01/2025-01-05"));
        assert_eq!(
            p.edition_file(),
            PathBuf::from("output/2025-01/2025-01-05/edition_2025-01-05.md")
        );
        assert_eq!(p.page_path(3), PathBuf::from("output/2025-01/2025-01-05/page_03.md"));
        assert_eq!(p.index_path(), PathBuf::from("output/index.md"));
    }

    #[test]
    fn test_page_file_name_padding() {
        assert_eq!(page_file_name(1), "page_01.md");
        assert_eq!(page_file_name(16), "page_16.md");
        assert_eq!(page_file_name(120), "page_120.md");
    }

    #[test]
    fn test_page_link() {
        assert_eq!(paths().page_link("page_01.md"), "2025-01/2025-01-05/page_01.html");
    }

    #[test]
    fn test_to_html_link() {
        assert_eq!(to_html_link("a/b.md"), "a/b.html");
        assert_eq!(to_html_link("a/readme.txt"), "a/readme.txt");
        assert_eq!(to_html_link("notes.md.bak"), "notes.md.bak");
    }
}
