//! # Gazette Digest
//!
//! Crawls the Saudi Gazette front page and produces Arabic summaries of its
//! articles.
//!
//! ## Features
//!
//! - Extracts the current article listing with an ordered set of HTML
//!   heuristics, cached in memory for a configurable TTL
//! - Fetches and cleans full article bodies
//! - Detects the source language and translates to Arabic in sentence-aligned
//!   chunks
//! - Summarizes through an OpenAI-compatible chat completions API, falling back
//!   to a deterministic extractive summary when the model is not configured or
//!   fails
//! - Emits JSON reports on stdout or to a file
//!
//! ## Usage
//!
//! ```sh
//! gazette_digest articles
//! OPENAI_API_KEY=sk-... gazette_digest summarize --pick 1
//! ```
//!
//! ## Architecture
//!
//! 1. **Listing**: [`crawler::Crawler`] fetches the front page through
//!    [`fetch::PageFetcher`] and caches what [`scrapers::listing`] extracts
//! 2. **Resolution**: structured article input is expanded with the body text
//!    from [`scrapers::article_body`]
//! 3. **Translation**: [`translate::TranslationService`] turns the text into
//!    Arabic
//! 4. **Summary**: [`summarizer::Summarizer`] asks the primary model, then
//!    falls back to [`summarizer::extractive`]
//! 5. **Output**: [`outputs::json`] writes the report

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cache;
mod cli;
mod config;
mod crawler;
mod error;
mod fetch;
mod language;
mod models;
mod outputs;
mod scrapers;
mod summarizer;
mod translate;
mod utils;

#[cfg(test)]
mod test_support;

use api::OpenAiSummaryModel;
use cache::ArticleCache;
use cli::{Cli, Command};
use config::{DigestConfig, load_config};
use crawler::Crawler;
use fetch::HttpFetcher;
use language::WhatlangDetector;
use models::{ArticleData, SummaryRequest};
use outputs::json;
use scrapers::article_body::ArticleContentFetcher;
use summarizer::Summarizer;
use translate::{GoogleTranslator, TranslationService};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("gazette_digest starting up");

    let args = Cli::parse();
    debug!(command = ?args.command, config = ?args.config, output = ?args.output, "Parsed CLI arguments");

    let config = resolve_config(&args)?;

    let fetcher = HttpFetcher::new()?;
    let cache = Arc::new(ArticleCache::new(config.cache_ttl()?));
    let crawler = Crawler::new(fetcher.clone(), config.site.clone(), Arc::clone(&cache));

    match args.command {
        Command::Articles { force_refresh } => {
            let report = crawler.listing_report(force_refresh).await;
            info!(count = report.count, cache_valid = report.cache_valid, "Listing ready");
            json::write_report(&report, args.output.as_deref()).await?;
        }
        Command::Summarize {
            text,
            article_json,
            pick,
        } => {
            let request = match (text, article_json, pick) {
                (Some(text), _, _) => SummaryRequest::Text(text),
                (_, Some(raw), _) => SummaryRequest::Article(serde_json::from_str::<ArticleData>(&raw)?),
                (_, _, Some(n)) => {
                    let listing = crawler.fetch_listing(false).await;
                    let article = listing
                        .get(n as usize - 1)
                        .ok_or_else(|| format!("article {n} requested but the listing has {}", listing.len()))?;
                    info!(title = %article.title, placeholder = article.is_placeholder, "Picked article");
                    SummaryRequest::Article(ArticleData::from(article))
                }
                (None, None, None) => return Err("nothing to summarize".into()),
            };

            let summarizer = Summarizer::new(
                ArticleContentFetcher::new(fetcher, config.site.article_timeout()),
                TranslationService::new(
                    WhatlangDetector,
                    GoogleTranslator::new(&config.translation)?,
                    &config.translation,
                ),
                OpenAiSummaryModel::new(&config.summary, args.openai_api_key.clone())?,
                config.summary.clone(),
            );
            let result = summarizer.summarize(request).await;
            json::write_report(&result, args.output.as_deref()).await?;
        }
    }

    info!(elapsed_ms = start_time.elapsed().as_millis() as u64, "gazette_digest finished");
    Ok(())
}

/// Config file (or defaults) with command-line overrides applied.
fn resolve_config(args: &Cli) -> Result<DigestConfig, Box<dyn Error>> {
    let mut config = match args.config.as_deref() {
        Some(path) => load_config(path)?,
        None => DigestConfig::default(),
    };
    if let Some(base_url) = &args.base_url {
        config.site.base_url = base_url.clone();
        config.site.validate()?;
    }
    if let Some(minutes) = args.cache_ttl_minutes {
        config.cache_ttl_minutes = minutes;
    }
    Ok(config)
}
