//! Command-line interface definitions for the AI newspaper.
//!
//! Every option has a default, so a bare `ai_newspaper` invocation produces
//! today's sixteen-page edition under `./output`. The API credential is read
//! from `OPENAI_API_KEY`.

use crate::sources::SourceKind;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the AI newspaper.
///
/// # Examples
///
/// ```sh
/// # Today's edition from the built-in topic prompts
/// OPENAI_API_KEY=sk-... ai_newspaper
///
/// # Summarize the configured feeds into a custom directory
/// ai_newspaper -s feeds -o ./site/output -c ./newspaper.yaml
///
/// # Only rebuild output/index.md from what is already on disk
/// ai_newspaper --reindex
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Root directory for editions and index.md
    #[arg(short, long, env = "AI_NEWSPAPER_OUTPUT", default_value = "output")]
    pub output_dir: PathBuf,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where the sections come from
    #[arg(short, long, value_enum, default_value_t = SourceKind::Sections)]
    pub source: SourceKind,

    /// Edition date (YYYY-MM-DD); defaults to today in local time
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Rebuild index.md from existing editions without calling the API
    #[arg(long)]
    pub reindex: bool,

    /// API credential for the text-generation service
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["ai_newspaper"]);
        assert_eq!(cli.source, SourceKind::Sections);
        assert!(cli.config.is_none());
        assert!(cli.date.is_none());
        assert!(!cli.reindex);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "ai_newspaper",
            "-o",
            "/tmp/news",
            "-s",
            "feeds",
            "-d",
            "2025-01-05",
            "-c",
            "news.yaml",
        ]);

        assert_eq!(cli.output_dir, PathBuf::from("/tmp/news"));
        assert_eq!(cli.source, SourceKind::Feeds);
        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2025, 1, 5));
        assert_eq!(cli.config, Some(PathBuf::from("news.yaml")));
    }

    #[test]
    fn test_cli_rejects_bad_date() {
        assert!(Cli::try_parse_from(["ai_newspaper", "--date", "05/01/2025"]).is_err());
    }

    #[test]
    fn test_cli_api_key_flag() {
        let cli = Cli::parse_from(["ai_newspaper", "--api-key", "sk-test", "--reindex"]);
        assert_eq!(cli.api_key.as_deref(), Some("sk-test"));
        assert!(cli.reindex);
    }
}
