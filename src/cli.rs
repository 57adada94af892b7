//! Command-line interface definitions for Gazette Digest.
//!
//! Every global option can also come from the environment; the model API key
//! is only ever read from here, never from the YAML config.

use clap::{ArgGroup, Parser, Subcommand};

/// Command-line arguments for the Gazette Digest application.
///
/// # Examples
///
/// ```sh
/// # Current front-page listing
/// gazette_digest articles
///
/// # Summarize the second listed article into a file
/// OPENAI_API_KEY=sk-... gazette_digest -o ./out/summary.json summarize --pick 2
///
/// # Summarize free text
/// gazette_digest summarize --text "The ministry announced ..."
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to config.yaml file
    #[arg(short, long, env = "GAZETTE_DIGEST_CONFIG")]
    pub config: Option<String>,

    /// Front page to crawl (overrides the config file)
    #[arg(long, env = "GAZETTE_BASE_URL")]
    pub base_url: Option<String>,

    /// How long a crawled listing stays fresh, in minutes
    #[arg(long, env = "GAZETTE_CACHE_TTL_MINUTES")]
    pub cache_ttl_minutes: Option<u64>,

    /// API key for the primary summary model; without it only the
    /// extractive summary is used
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Write the JSON report here instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// List the articles currently on the front page
    Articles {
        /// Ignore the cache and crawl again
        #[arg(long)]
        force_refresh: bool,
    },
    /// Summarize text or an article in Arabic
    #[command(group(ArgGroup::new("input").required(true).args(["text", "article_json", "pick"])))]
    Summarize {
        /// Free text to summarize
        #[arg(long)]
        text: Option<String>,

        /// Article as JSON: {"title": ..., "excerpt": ..., "link": ...}
        #[arg(long)]
        article_json: Option<String>,

        /// Summarize the N-th article of the front-page listing (1-based)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        pick: Option<u32>,
    },
}
