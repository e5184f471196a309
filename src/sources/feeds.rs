//! RSS and Atom feed reader.
//!
//! Each configured feed is downloaded once and its first few entries are
//! turned into [`Section`]s for the summarizer.
//!
//! # Supported formats
//!
//! | Root element | Format | Entries | Summary field |
//! |--------------|--------|---------|---------------|
//! | `<rss>` | RSS 2.0 | `channel/item` | `description` |
//! | `<feed>` | Atom 1.0 | `entry` | `summary`, else `content` |
//!
//! Summaries are reduced to plain text before they reach the prompt.

use crate::models::{FeedEntry, Section};
use crate::utils::html_to_text;
use futures::stream::{self, StreamExt, TryStreamExt};
use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::{Captures, Regex};
use reqwest::Client;
use serde::Deserialize;
use std::error::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Deserialize)]
struct RssDocument {
    channel: RssChannel,
}

#[derive(Debug, Deserialize)]
struct RssChannel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomDocument {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    #[serde(default)]
    title: Option<String>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    content: Option<AtomContent>,
}

/// `<content>` may hold escaped HTML or inline XHTML; only its text is kept.
#[derive(Debug, Deserialize)]
struct AtomContent {
    #[serde(rename = "$text", default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: String,
    #[serde(rename = "@rel", default)]
    rel: Option<String>,
}

impl AtomEntry {
    /// The `alternate` link, or the first link when none is marked.
    fn permalink(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.rel.as_deref().is_none_or(|r| r == "alternate"))
            .or_else(|| self.links.first())
            .map(|l| l.href.as_str())
    }

    /// `summary`, falling back to the text of `content`.
    fn summary_text(&self) -> Option<String> {
        self.summary
            .clone()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.content.as_ref().and_then(|c| c.text.clone()))
    }
}

/// Local name of the document's first element.
fn root_element(xml: &str) -> Result<String, Box<dyn Error>> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                return Ok(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Event::Eof => return Err("feed document has no root element".into()),
            _ => {}
        }
    }
}

fn entry(title: Option<String>, link: Option<&str>, summary: Option<String>) -> FeedEntry {
    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Untitled".to_string());
    FeedEntry {
        title,
        link: link.unwrap_or_default().trim().to_string(),
        summary: summary.as_deref().map(html_to_text).unwrap_or_default(),
    }
}

/// Parse a feed document and keep at most `max_entries` entries, in feed order.
pub fn parse_feed(xml: &str, max_entries: usize) -> Result<Vec<FeedEntry>, Box<dyn Error>> {
    let root = root_element(xml)?;
    let entries = match root.as_str() {
        "rss" => {
            let doc: RssDocument = quick_xml::de::from_str(xml)?;
            doc.channel
                .items
                .into_iter()
                .take(max_entries)
                .map(|item| entry(item.title, item.link.as_deref(), item.description))
                .collect()
        }
        "feed" => {
            let doc: AtomDocument = quick_xml::de::from_str(xml)?;
            doc.entries
                .into_iter()
                .take(max_entries)
                .map(|e| {
                    let link = e.permalink().map(str::to_owned);
                    // Atom titles may be `type="html"`.
                    let title = e.title.as_deref().map(html_to_text);
                    entry(title, link.as_deref(), e.summary_text())
                })
                .collect()
        }
        other => return Err(format!("unsupported feed format <{other}>").into()),
    };
    Ok(entries)
}

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(title|link|summary)\}").expect("placeholder pattern is valid"));

/// Fill the summary prompt template for one entry.
///
/// Placeholders are filled in a single pass, so braces inside feed text are
/// never substituted again.
pub fn entry_to_section(entry: &FeedEntry, template: &str) -> Section {
    let prompt = PLACEHOLDER.replace_all(template, |caps: &Captures| match &caps[1] {
        "title" => entry.title.clone(),
        "link" => entry.link.clone(),
        _ => entry.summary.clone(),
    });
    Section::new(entry.title.clone(), prompt.into_owned())
}

/// Download and parse a single feed.
#[instrument(level = "info", skip(client))]
pub async fn fetch_feed(
    client: &Client,
    url: &str,
    max_entries: usize,
) -> Result<Vec<FeedEntry>, Box<dyn Error>> {
    let body = client.get(url).send().await?.error_for_status()?.text().await?;
    debug!(bytes = body.len(), "Downloaded feed");
    let entries = parse_feed(&body, max_entries)?;
    info!(count = entries.len(), "Parsed feed entries");
    Ok(entries)
}

/// Fetch every feed in order and flatten their entries.
///
/// Feeds are read one after another; the first failure aborts.
#[instrument(level = "info", skip_all, fields(feeds = urls.len()))]
pub async fn fetch_all(
    client: &Client,
    urls: &[String],
    max_entries: usize,
) -> Result<Vec<FeedEntry>, Box<dyn Error>> {
    let per_feed: Vec<Vec<FeedEntry>> = stream::iter(urls)
        .then(|url| fetch_feed(client, url, max_entries))
        .try_collect()
        .await?;
    let entries: Vec<FeedEntry> = per_feed.into_iter().flatten().collect();
    info!(count = entries.len(), "Collected feed entries");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>AI Wire</title>
    <link>https://example.com</link>
    <item>
      <title>Model &amp; Friends</title>
      <link>https://example.com/a</link>
      <description><![CDATA[<p>A <b>new</b> model.</p>]]></description>
    </item>
    <item>
      <title>Second story</title>
      <link>https://example.com/b</link>
      <description>Plain summary</description>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Lab Blog</title>
  <entry>
    <title>Paper one</title>
    <link rel="replies" href="https://lab.example/one#comments"/>
    <link rel="alternate" href="https://lab.example/one"/>
    <summary type="html">&lt;p&gt;Short&lt;/p&gt;</summary>
  </entry>
  <entry>
    <title>Paper two</title>
    <link href="https://lab.example/two"/>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_rss_two_entries() {
        let entries = parse_feed(RSS, 3).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Model & Friends");
        assert_eq!(entries[0].link, "https://example.com/a");
        assert_eq!(entries[0].summary, "A new model.");
        assert_eq!(entries[1].title, "Second story");
        assert_eq!(entries[1].summary, "Plain summary");
    }

    #[test]
    fn test_parse_rss_truncates_to_max() {
        let entries = parse_feed(RSS, 1).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Model & Friends");
        assert!(parse_feed(RSS, 0).unwrap().is_empty());
    }

    #[test]
    fn test_parse_atom() {
        let entries = parse_feed(ATOM, 5).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].link, "https://lab.example/one");
        assert_eq!(entries[0].summary, "Short");
        assert_eq!(entries[1].link, "https://lab.example/two");
        assert_eq!(entries[1].summary, "");
    }

    #[test]
    fn test_parse_atom_links_split_by_other_elements() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <title type="html">Story &lt;em&gt;one&lt;/em&gt;</title>
    <link rel="alternate" href="https://blog.example/one"/>
    <id>tag:blog.example,2025:1</id>
    <updated>2025-01-05T06:00:00Z</updated>
    <summary type="html">S</summary>
    <link rel="replies" href="https://blog.example/one#comments"/>
  </entry>
</feed>"#;
        let entries = parse_feed(xml, 3).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Story one");
        assert_eq!(entries[0].link, "https://blog.example/one");
        assert_eq!(entries[0].summary, "S");
    }

    #[test]
    fn test_parse_rss_items_split_by_other_elements() {
        let xml = "<rss><channel><item><title>A</title></item><ttl>60</ttl>\
                   <item><title>B</title></item></channel></rss>";
        let titles: Vec<String> = parse_feed(xml, 5)
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_parse_atom_content_fallback() {
        let xml = r#"<feed><entry>
  <title>Only content</title>
  <link href="https://lab.example/c"/>
  <content type="html">&lt;p&gt;Body &lt;b&gt;text&lt;/b&gt;&lt;/p&gt;</content>
</entry></feed>"#;
        let entries = parse_feed(xml, 3).unwrap();
        assert_eq!(entries[0].summary, "Body text");
    }

    #[test]
    fn test_empty_channel() {
        let xml = "<rss version=\"2.0\"><channel><title>x</title></channel></rss>";
        assert!(parse_feed(xml, 3).unwrap().is_empty());
    }

    #[test]
    fn test_unsupported_root() {
        let err = parse_feed("<html><body/></html>", 3).unwrap_err();
        assert!(err.to_string().contains("unsupported feed format"));
    }

    #[test]
    fn test_missing_title_is_untitled() {
        let xml = "<rss><channel><item><link>https://x.example</link></item></channel></rss>";
        let entries = parse_feed(xml, 3).unwrap();
        assert_eq!(entries[0].title, "Untitled");
    }

    #[test]
    fn test_entry_to_section() {
        let entry = FeedEntry {
            title: "Big news".to_string(),
            link: "https://example.com/a".to_string(),
            summary: "Something happened".to_string(),
        };
        let section = entry_to_section(&entry, "T={title} L={link} S={summary}");
        assert_eq!(section.title, "Big news");
        assert_eq!(
            section.prompt,
            "T=Big news L=https://example.com/a S=Something happened"
        );
    }

    #[test]
    fn test_entry_placeholders_in_feed_text_are_literal() {
        let entry = FeedEntry {
            title: "Use {summary} now".to_string(),
            link: "https://example.com/{link}".to_string(),
            summary: "SECRET".to_string(),
        };
        let section = entry_to_section(&entry, "T={title} L={link} S={summary} {other}");
        assert_eq!(
            section.prompt,
            "T=Use {summary} now L=https://example.com/{link} S=SECRET {other}"
        );
    }
}
