//! Run configuration for the newspaper.
//!
//! The defaults reproduce the fixed daily edition: sixteen topical pages
//! generated with `gpt-4o-mini` at temperature 0.4. A YAML file may override
//! any field:
//!
//! ```yaml
//! title: AI Newspaper
//! model: gpt-4o-mini
//! temperature: 0.4
//! max_tokens: 700
//! feeds:
//!   - https://example.com/ai/rss.xml
//! max_entries_per_feed: 3
//! sections:
//!   - title: Page 1
//!     prompt: "Main Headlines: Summarize 3 biggest AI news stories."
//! ```
//!
//! The API credential is never read from the file; it comes from the
//! `OPENAI_API_KEY` environment variable (see [`require_api_key`]).

use crate::models::Section;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, instrument};
use url::Url;

/// Fatal startup errors, raised before any network or file-write call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set; export it before running")]
    MissingCredential,

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid feed URL {url:?}: {source}")]
    InvalidFeedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("config must define at least one section")]
    NoSections,
}

/// Everything the summarizer and publisher need to know about a run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NewsConfig {
    /// Newspaper name used in headings.
    pub title: String,
    /// Sub-heading shown under the index title.
    pub tagline: String,
    /// Closing line of the index page.
    pub footer: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens per section.
    pub max_tokens: u32,
    /// Base URL of the OpenAI-compatible API, without a trailing slash.
    pub api_base: String,
    /// Fixed topical prompts, one per page.
    pub sections: Vec<Section>,
    /// Feeds read when the feed source is selected.
    pub feeds: Vec<String>,
    /// Only the first N entries of each feed are used.
    pub max_entries_per_feed: usize,
    /// Prompt used for feed entries; `{title}`, `{link}` and `{summary}` are substituted.
    pub summary_prompt: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            title: "AI Newspaper".to_string(),
            tagline: "Powered by AI, 16-page daily digest".to_string(),
            footer: "© Powered by AI | Updated daily at 6 AM UTC".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.4,
            max_tokens: 700,
            api_base: "https://api.openai.com/v1".to_string(),
            sections: default_sections(),
            feeds: vec![
                "https://www.technologyreview.com/topic/artificial-intelligence/feed".to_string(),
                "https://blog.google/technology/ai/rss/".to_string(),
                "https://huggingface.co/blog/feed.xml".to_string(),
            ],
            max_entries_per_feed: 3,
            summary_prompt: "Summarize this AI news story in 3-4 sentences for a general reader. \
                             Mention why it matters.\n\nTitle: {title}\nLink: {link}\n\n{summary}"
                .to_string(),
        }
    }
}

fn default_sections() -> Vec<Section> {
    [
        "Main Headlines: Summarize 3 biggest AI news stories.",
        "Research Highlights: Summarize 2 new AI research papers.",
        "Cool Tools: Introduce 2-3 new AI tools, startups or repos.",
        "Entrepreneur Insights: How AI is impacting business.",
        "For Kids: Fun facts or beginner-level AI explanations.",
        "AI in Healthcare: Latest medical AI applications.",
        "AI in Education: Tools & research for learning.",
        "AI & Society: Ethics, regulations, policy.",
        "AI in Art & Creativity: Generative AI, music, design.",
        "AI in Gaming: Latest use of AI in gaming.",
        "Productivity & Work: AI in offices, workflow.",
        "Coding Corner: AI tools for developers.",
        "Future Trends: What's next in AI.",
        "Interview / Quote of the Day.",
        "Startups & Funding News.",
        "Summary & Closing Notes.",
    ]
    .iter()
    .enumerate()
    .map(|(i, prompt)| Section::new(format!("Page {}", i + 1), *prompt))
    .collect()
}

impl NewsConfig {
    /// Load the configuration, falling back to defaults when no file is given.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            debug!("No config file given; using defaults");
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::from_yaml(&raw)?;
        info!(path = %path.display(), sections = config.sections.len(), feeds = config.feeds.len(), "Loaded configuration");
        Ok(config)
    }

    /// Parse and validate a YAML document. Missing fields keep their defaults.
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sections.is_empty() {
            return Err(ConfigError::NoSections);
        }
        for feed in &self.feeds {
            Url::parse(feed).map_err(|source| ConfigError::InvalidFeedUrl {
                url: feed.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Full chat-completions endpoint for [`Self::api_base`].
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

/// Turn the optional credential into a hard requirement.
///
/// An empty value counts as missing.
pub fn require_api_key(key: Option<String>) -> Result<String, ConfigError> {
    match key {
        Some(k) if !k.trim().is_empty() => Ok(k),
        _ => Err(ConfigError::MissingCredential),
    }
}
