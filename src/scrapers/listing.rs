//! Front-page article listing extraction.
//!
//! Candidates are located by the first [`Strategy`] (in [`Strategy::PRIORITY`]
//! order) that yields at least [`MIN_CANDIDATES`] elements; when none does,
//! the first 15 links on the page are used instead. Each candidate is then
//! turned into an [`Article`] if its title and link pass the filters.
//!
//! Results shorter than three entries are padded with placeholder articles
//! flagged by [`Article::is_placeholder`].

use super::{HEADING, LINK, class_matches, visible_text};
use crate::config::SiteConfig;
use crate::models::{Article, NO_EXCERPT};
use crate::utils::{char_len, truncate_chars};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// A strategy must find this many candidates to be used.
pub const MIN_CANDIDATES: usize = 3;
/// Hard cap on articles returned from one pass.
pub const MAX_ARTICLES: usize = 8;
/// Listings shorter than this are padded with placeholders.
pub const MIN_ARTICLES: usize = 3;

const MAX_CANDIDATES_EXAMINED: usize = 20;
const FALLBACK_LINKS: usize = 15;
const CONTAINER_KEYWORDS: &[&str] = &["post", "article", "news", "story", "item"];

static CLASSED_CONTAINER: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article[class], div[class]").expect("static selector"));
static DIV: Lazy<Selector> = Lazy::new(|| Selector::parse("div").expect("static selector"));
static EXCERPT_BLOCK: Lazy<Selector> = Lazy::new(|| Selector::parse("p, div, span").expect("static selector"));

/// Ways of finding article containers on the front page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `article`/`div` elements whose class mentions post, article, news, story or item.
    ClassKeyword,
    /// Links whose visible text is longer than 20 characters.
    LongLinkText,
    /// Links that directly wrap a heading.
    HeadingInLink,
    /// `div`s holding both a link and a heading.
    LinkAndHeadingContainer,
}

impl Strategy {
    pub const PRIORITY: [Strategy; 4] = [
        Strategy::ClassKeyword,
        Strategy::LongLinkText,
        Strategy::HeadingInLink,
        Strategy::LinkAndHeadingContainer,
    ];

    /// Candidate containers in document order.
    pub fn candidates<'a>(self, doc: &'a Html) -> Vec<ElementRef<'a>> {
        match self {
            Strategy::ClassKeyword => doc
                .select(&CLASSED_CONTAINER)
                .filter(|el| class_matches(*el, CONTAINER_KEYWORDS))
                .collect(),
            Strategy::LongLinkText => doc
                .select(&LINK)
                .filter(|a| char_len(&visible_text(*a)) > 20)
                .collect(),
            Strategy::HeadingInLink => doc
                .select(&HEADING)
                .filter_map(|h| h.parent().and_then(ElementRef::wrap))
                .filter(|parent| parent.value().name() == "a")
                .collect(),
            Strategy::LinkAndHeadingContainer => doc
                .select(&DIV)
                .filter(|div| div.select(&LINK).next().is_some() && div.select(&HEADING).next().is_some())
                .collect(),
        }
    }
}

/// Pick candidates with the first strategy that finds enough of them. `None`
/// as the strategy means the plain-link fallback was used.
pub fn select_candidates(doc: &Html) -> (Option<Strategy>, Vec<ElementRef<'_>>) {
    for strategy in Strategy::PRIORITY {
        let found = strategy.candidates(doc);
        debug!(?strategy, count = found.len(), "Tried extraction strategy");
        if found.len() >= MIN_CANDIDATES {
            return (Some(strategy), found);
        }
    }
    (None, doc.select(&LINK).take(FALLBACK_LINKS).collect())
}

/// Extract up to [`MAX_ARTICLES`] articles from front-page HTML, padding with
/// placeholders to at least [`MIN_ARTICLES`].
#[instrument(level = "info", skip_all, fields(base_url = %site.base_url))]
pub fn extract_articles(html: &str, site: &SiteConfig) -> Vec<Article> {
    let doc = Html::parse_document(html);
    let (strategy, candidates) = select_candidates(&doc);
    let scraped_at = Utc::now();

    let mut seen = HashSet::new();
    let mut articles = Vec::new();
    for candidate in candidates.into_iter().take(MAX_CANDIDATES_EXAMINED) {
        let Some(article) = article_from_candidate(candidate, site, scraped_at) else {
            continue;
        };
        if !seen.insert(article.title.to_lowercase()) {
            continue;
        }
        articles.push(article);
        if articles.len() >= MAX_ARTICLES {
            break;
        }
    }

    let real = articles.len();
    for n in 1..=MIN_ARTICLES.saturating_sub(real) {
        articles.push(Article::placeholder(n, &site.base_url, scraped_at));
    }

    info!(?strategy, real, placeholders = articles.len() - real, "Extracted articles");
    articles
}

fn article_from_candidate(el: ElementRef<'_>, site: &SiteConfig, scraped_at: DateTime<Utc>) -> Option<Article> {
    let is_link = el.value().name() == "a";
    let first_link = || el.select(&LINK).next();

    let title = if is_link {
        visible_text(el)
    } else if let Some(heading) = el.select(&HEADING).next() {
        visible_text(heading)
    } else {
        first_link().map(visible_text).unwrap_or_default()
    };

    let href = if is_link {
        el.value().attr("href")
    } else {
        first_link().and_then(|a| a.value().attr("href"))
    };
    let link = resolve_link(href.unwrap_or_default(), &site.base_url);

    let title_len = char_len(&title);
    if title_len <= 15 || title_len >= 150 || link.is_empty() || !link.contains(&site.domain) {
        return None;
    }

    let excerpt = if is_link { None } else { find_excerpt(el) };
    Some(Article {
        title,
        link,
        excerpt: excerpt.unwrap_or_else(|| NO_EXCERPT.to_string()),
        scraped_at,
        is_placeholder: false,
    })
}

/// First paragraph-like block whose text is between 30 and 300 characters,
/// cut to 200.
fn find_excerpt(el: ElementRef<'_>) -> Option<String> {
    el.select(&EXCERPT_BLOCK)
        .map(visible_text)
        .find(|text| (31..300).contains(&char_len(text)))
        .map(|text| truncate_chars(&text, 200).to_string())
}

/// Make `href` absolute against `base_url`. Links already starting with
/// `http` are returned unchanged.
pub fn resolve_link(href: &str, base_url: &str) -> String {
    if href.is_empty() || href.starts_with("http") {
        return href.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{base}{href}")
    } else {
        format!("{base}/{}", href.trim_start_matches('/'))
    }
}
