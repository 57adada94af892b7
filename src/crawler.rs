//! Front-page crawler with a TTL cache and stale fallback.
//!
//! [`Crawler::fetch_listing`] never fails. It serves the cache while it is
//! fresh, otherwise makes one fetch of the front page. A successful
//! extraction replaces the cache; anything else (network error, HTTP error,
//! nothing extracted) leaves the cache alone and returns whatever it holds,
//! which may be nothing.

use crate::cache::{ArticleCache, CacheState};
use crate::config::SiteConfig;
use crate::fetch::PageFetcher;
use crate::models::{Article, ListingReport};
use crate::scrapers::listing::extract_articles;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

#[derive(Debug)]
pub struct Crawler<F> {
    fetcher: F,
    site: SiteConfig,
    cache: Arc<ArticleCache>,
}

impl<F: PageFetcher> Crawler<F> {
    pub fn new(fetcher: F, site: SiteConfig, cache: Arc<ArticleCache>) -> Self {
        Self { fetcher, site, cache }
    }

    /// Current article listing. `force_refresh` skips the freshness check.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_listing(&self, force_refresh: bool) -> Vec<Article> {
        let state = self.cache.state();
        if !force_refresh && state == CacheState::Fresh {
            let cached = self.cache.snapshot();
            info!(count = cached.articles.len(), "Serving articles from cache");
            return cached.articles.clone();
        }

        info!(?state, url = %self.site.base_url, "Fetching front page");
        let t0 = Instant::now();
        let html = match self.fetcher.fetch_page(&self.site.base_url, self.site.listing_timeout()).await {
            Ok(html) => html,
            Err(e) => {
                error!(error = %e, elapsed_ms = t0.elapsed().as_millis() as u64, "Front page fetch failed");
                return self.stale_fallback();
            }
        };

        let articles = extract_articles(&html, &self.site);
        if articles.is_empty() {
            warn!("No articles extracted from front page");
            return self.stale_fallback();
        }

        self.cache.replace(articles.clone(), Utc::now());
        info!(
            count = articles.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Refreshed article cache"
        );
        articles
    }

    /// Listing wrapped with cache metadata.
    pub async fn listing_report(&self, force_refresh: bool) -> ListingReport {
        let articles = self.fetch_listing(force_refresh).await;
        let snapshot = self.cache.snapshot();
        ListingReport {
            success: true,
            count: articles.len(),
            articles,
            last_update: snapshot.last_update,
            cache_valid: self.cache.is_valid(),
        }
    }

    fn stale_fallback(&self) -> Vec<Article> {
        let cached = self.cache.snapshot();
        if cached.articles.is_empty() {
            warn!("No cached articles to fall back on");
        } else {
            info!(count = cached.articles.len(), last_update = ?cached.last_update, "Serving stale articles from cache");
        }
        cached.articles.clone()
    }
}
