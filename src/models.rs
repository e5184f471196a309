//! Data models for section inputs, feed entries, and written editions.
//!
//! This module defines the values passed between the three pipeline steps:
//! - [`Section`]: One titled prompt produced by a content source
//! - [`FeedEntry`]: A single item read from an RSS or Atom feed
//! - [`Page`]: A section after its generated text has been written to disk
//! - [`Edition`]: All pages written for one date
//! - [`ArchiveEntry`]: A past edition discovered by scanning the output root
//!
//! Everything here lives for a single run; the only persistent state is the
//! output directory itself.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A titled prompt handed to the summarizer.
///
/// Sections have no identity beyond their position within the run; the
/// 1-based ordinal becomes the page number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Section {
    /// Heading written at the top of the page (e.g. `"Page 1"`).
    pub title: String,
    /// Full text sent to the model.
    pub prompt: String,
}

impl Section {
    pub fn new(title: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            prompt: prompt.into(),
        }
    }
}

/// One entry read from a news feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    /// The entry headline.
    pub title: String,
    /// Permalink to the story, empty when the feed omits it.
    pub link: String,
    /// Plain-text summary with any HTML markup stripped.
    pub summary: String,
}

/// A generated section that has been written to its page file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-based position within the edition.
    pub number: usize,
    /// The section title used as the page heading.
    pub title: String,
    /// Page file name relative to the edition directory (`page_NN.md`).
    pub file_name: String,
}

/// One day's output: the date plus its pages in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edition {
    pub date: NaiveDate,
    pub pages: Vec<Page>,
}

/// A past edition found under the output root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ArchiveEntry {
    /// Date label recovered from the edition file name (`YYYY-MM-DD`).
    pub label: String,
    /// Link relative to the output root, with `.md` rewritten to `.html`.
    pub link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_new() {
        let section = Section::new("Page 1", "Main Headlines");
        assert_eq!(section.title, "Page 1");
        assert_eq!(section.prompt, "Main Headlines");
    }

    #[test]
    fn test_section_yaml_shape() {
        let yaml = "title: Page 3\nprompt: Cool Tools\n";
        let section: Section = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(section, Section::new("Page 3", "Cool Tools"));
    }

    #[test]
    fn test_archive_entries_order_by_label() {
        let older = ArchiveEntry {
            label: "2025-01-04".to_string(),
            link: "2025-01/2025-01-04/edition_2025-01-04.html".to_string(),
        };
        let newer = ArchiveEntry {
            label: "2025-01-05".to_string(),
            link: "2025-01/2025-01-05/edition_2025-01-05.html".to_string(),
        };
        assert!(newer > older);
    }
}
