//! Full-text extraction for a single article page.
//!
//! The body is looked for in this order, stopping at the first non-empty hit:
//!
//! 1. the first `<article>`, minus scripts, navigation, asides and similar noise
//! 2. the `div` with the most text among those whose class looks content-ish
//! 3. the first `<main>`
//! 4. every paragraph longer than 20 characters
//!
//! The text is then normalised and capped. Anything at or under
//! [`MIN_BODY_CHARS`] counts as "no content".

use super::{class_matches, spaced_text};
use crate::fetch::PageFetcher;
use crate::utils::{Whitelist, char_len, collapse_whitespace, strip_disallowed, truncate_chars};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

pub const MAX_BODY_CHARS: usize = 4000;
pub const MIN_BODY_CHARS: usize = 100;

const NOISE_TAGS: &[&str] = &["script", "style", "nav", "aside", "footer", "header", "iframe", "noscript"];
const CONTENT_KEYWORDS: &[&str] = &["content", "article", "post", "story", "body", "text", "entry"];

static ARTICLE: Lazy<Selector> = Lazy::new(|| Selector::parse("article").expect("static selector"));
static CLASSED_DIV: Lazy<Selector> = Lazy::new(|| Selector::parse("div[class]").expect("static selector"));
static MAIN: Lazy<Selector> = Lazy::new(|| Selector::parse("main").expect("static selector"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("static selector"));

/// Downloads article pages and pulls out their body text.
#[derive(Debug, Clone)]
pub struct ArticleContentFetcher<F> {
    fetcher: F,
    timeout: Duration,
}

impl<F: PageFetcher> ArticleContentFetcher<F> {
    pub fn new(fetcher: F, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }

    /// Body text of the article at `url`, or `None` if the page could not be
    /// fetched or held too little text.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn fetch_content(&self, url: &str) -> Option<String> {
        let html = match self.fetcher.fetch_page(url, self.timeout).await {
            Ok(html) => html,
            Err(e) => {
                warn!(error = %e, "Article fetch failed");
                return None;
            }
        };
        let content = extract_body_text(&html);
        match &content {
            Some(text) => info!(chars = char_len(text), "Extracted article body"),
            None => warn!("Article page held too little text"),
        }
        content
    }
}

/// Pull the main text out of an article page.
pub fn extract_body_text(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);

    let mut content = doc.select(&ARTICLE).next().map(text_without_noise).unwrap_or_default();

    if content.is_empty() {
        content = doc
            .select(&CLASSED_DIV)
            .filter(|div| class_matches(*div, CONTENT_KEYWORDS))
            .map(spaced_text)
            .fold(String::new(), |best, text| {
                if char_len(&text) > char_len(&best) { text } else { best }
            });
    }

    if content.is_empty() {
        content = doc.select(&MAIN).next().map(spaced_text).unwrap_or_default();
    }

    if content.is_empty() {
        content = doc
            .select(&PARAGRAPH)
            .map(spaced_text)
            .filter(|p| char_len(p) > 20)
            .collect::<Vec<_>>()
            .join(" ");
    }

    let content = strip_disallowed(&collapse_whitespace(&content), Whitelist::ArticleBody);
    let content = if char_len(&content) > MAX_BODY_CHARS {
        format!("{}...", truncate_chars(&content, MAX_BODY_CHARS))
    } else {
        content
    };

    debug!(chars = char_len(&content), "Normalised article body");
    (char_len(&content) > MIN_BODY_CHARS).then_some(content)
}

fn text_without_noise(el: ElementRef<'_>) -> String {
    let mut parts = Vec::new();
    collect_text(el, &mut parts);
    parts.join(" ")
}

fn collect_text(el: ElementRef<'_>, out: &mut Vec<String>) {
    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            if !NOISE_TAGS.contains(&child_el.value().name()) {
                collect_text(child_el, out);
            }
        } else if let Some(text) = child.value().as_text() {
            let text = text.trim();
            if !text.is_empty() {
                out.push(text.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedFetcher;

    const SENTENCE: &str = "The ministry said the new rules would apply to all residents from next month.";

    fn paragraphs(n: usize) -> String {
        (0..n).map(|_| format!("<p>{SENTENCE}</p>")).collect()
    }

    #[test]
    fn article_tag_wins_and_noise_is_removed() {
        let html = format!(
            r#"<html><body><article><nav>Home | News</nav><script>var x = 1;</script>{}<footer>Copyright</footer></article>
            <div class="content">{}</div></body></html>"#,
            paragraphs(2),
            paragraphs(5)
        );
        let text = extract_body_text(&html).unwrap();
        assert_eq!(text, format!("{SENTENCE} {SENTENCE}"));
        assert!(!text.contains("Home"));
        assert!(!text.contains("var x"));
        assert!(!text.contains("Copyright"));
    }

    #[test]
    fn largest_content_div_is_used_without_article_tag() {
        let html = format!(
            r#"<html><body><div class="sidebar-text">Short aside text</div><div class="entry-content">{}</div></body></html>"#,
            paragraphs(3)
        );
        let text = extract_body_text(&html).unwrap();
        assert!(text.starts_with(SENTENCE));
        assert!(!text.contains("aside"));
    }

    #[test]
    fn main_then_paragraphs_are_fallbacks() {
        let main = format!("<html><body><main>{}</main></body></html>", paragraphs(2));
        assert!(extract_body_text(&main).is_some());

        let bare = format!("<html><body><section>{}<p>tiny</p></section></body></html>", paragraphs(2));
        let text = extract_body_text(&bare).unwrap();
        assert!(!text.contains("tiny"));
    }

    #[test]
    fn short_pages_yield_none() {
        assert_eq!(extract_body_text("<html><body><article>Too short.</article></body></html>"), None);
    }

    #[test]
    fn long_bodies_are_capped_with_ellipsis() {
        let html = format!("<html><body><article>{}</article></body></html>", paragraphs(80));
        let text = extract_body_text(&html).unwrap();
        assert_eq!(char_len(&text), MAX_BODY_CHARS + 3);
        assert!(text.ends_with("..."));
    }

    #[test]
    fn disallowed_characters_are_stripped() {
        let html = format!("<html><body><article><p>{SENTENCE} #hashtag @user</p><p>{SENTENCE}</p></article></body></html>");
        let text = extract_body_text(&html).unwrap();
        assert!(text.contains("hashtag user"));
        assert!(!text.contains('#'));
    }

    #[tokio::test]
    async fn fetch_failure_yields_none() {
        let fetcher = ScriptedFetcher::new();
        fetcher.fail("https://saudigazette.com.sa/a", 500);
        let content = ArticleContentFetcher::new(fetcher.clone(), Duration::from_secs(1));
        assert_eq!(content.fetch_content("https://saudigazette.com.sa/a").await, None);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn fetch_success_returns_body() {
        let fetcher = ScriptedFetcher::new();
        let url = "https://saudigazette.com.sa/article/9";
        fetcher.serve(url, &format!("<html><body><article>{}</article></body></html>", paragraphs(3)));
        let content = ArticleContentFetcher::new(fetcher, Duration::from_secs(1));
        let text = content.fetch_content(url).await.unwrap();
        assert!(text.starts_with(SENTENCE));
    }
}
