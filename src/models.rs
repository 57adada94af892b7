//! Data models shared between the crawler, the summarizer, and the JSON output.
//!
//! - [`Article`]: one entry of the front-page listing
//! - [`ArticleData`]: structured summary input, usually built from an [`Article`]
//! - [`SummaryRequest`]: free text or structured article data
//! - [`SummaryResult`]: outcome of a summary request, success or failure
//! - [`ListingReport`]: listing plus cache metadata
//!
//! Field names are the JSON contract with whatever serves these over HTTP.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Excerpt used when no suitable paragraph was found next to a headline.
pub const NO_EXCERPT: &str = "No excerpt available";

/// One article discovered on the front page.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Article {
    pub title: String,
    /// Absolute URL on the crawled site.
    pub link: String,
    /// At most 200 characters, or [`NO_EXCERPT`].
    pub excerpt: String,
    pub scraped_at: DateTime<Utc>,
    /// Synthetic entry padded in when extraction found fewer than three articles.
    #[serde(default)]
    pub is_placeholder: bool,
}

impl Article {
    /// A synthetic listing entry. `n` starts at 1.
    pub fn placeholder(n: usize, base_url: &str, scraped_at: DateTime<Utc>) -> Self {
        Self {
            title: format!("Sample Article {n} - Saudi Arabia News"),
            link: format!("{}/sample-article-{n}", base_url.trim_end_matches('/')),
            excerpt: format!(
                "This is a sample article {n} for testing purposes. It contains news about Saudi Arabia and recent developments."
            ),
            scraped_at,
            is_placeholder: true,
        }
    }
}

/// Structured article input for the summarizer. Every field is optional so a
/// caller can pass whatever it has.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ArticleData {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl From<&Article> for ArticleData {
    fn from(article: &Article) -> Self {
        Self {
            title: Some(article.title.clone()),
            excerpt: Some(article.excerpt.clone()),
            link: Some(article.link.clone()),
        }
    }
}

/// What to summarize.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryRequest {
    Text(String),
    Article(ArticleData),
}

/// Which path produced the summary text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum SummaryMethod {
    PrimaryModel,
    ExtractiveFallback,
}

/// Outcome of a summary request. Failures carry `error` and no `summary`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SummaryResult {
    pub success: bool,
    pub summary: Option<String>,
    pub error: Option<String>,
    pub original_length: usize,
    pub summary_length: usize,
    pub method_used: Option<SummaryMethod>,
    pub was_translated: bool,
    pub timestamp: DateTime<Utc>,
}

impl SummaryResult {
    pub fn succeeded(
        summary: String,
        method: SummaryMethod,
        original_length: usize,
        was_translated: bool,
    ) -> Self {
        Self {
            success: true,
            summary_length: summary.chars().count(),
            summary: Some(summary),
            error: None,
            original_length,
            method_used: Some(method),
            was_translated,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(error: impl ToString, original_length: usize, was_translated: bool) -> Self {
        Self {
            success: false,
            summary: None,
            error: Some(error.to_string()),
            original_length,
            summary_length: 0,
            method_used: None,
            was_translated,
            timestamp: Utc::now(),
        }
    }
}

/// The listing as handed to callers, with cache metadata.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ListingReport {
    pub success: bool,
    pub count: usize,
    pub articles: Vec<Article>,
    pub last_update: Option<DateTime<Utc>>,
    pub cache_valid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_flagged_and_deterministic() {
        let now = Utc::now();
        let a = Article::placeholder(2, "https://saudigazette.com.sa/", now);
        assert!(a.is_placeholder);
        assert_eq!(a.title, "Sample Article 2 - Saudi Arabia News");
        assert_eq!(a.link, "https://saudigazette.com.sa/sample-article-2");
        assert_eq!(a, Article::placeholder(2, "https://saudigazette.com.sa", now));
    }

    #[test]
    fn article_data_from_listing_entry() {
        let article = Article {
            title: "Riyadh hosts regional summit".to_string(),
            link: "https://saudigazette.com.sa/article/1".to_string(),
            excerpt: NO_EXCERPT.to_string(),
            scraped_at: Utc::now(),
            is_placeholder: false,
        };
        let data = ArticleData::from(&article);
        assert_eq!(data.title.as_deref(), Some("Riyadh hosts regional summit"));
        assert_eq!(data.link.as_deref(), Some("https://saudigazette.com.sa/article/1"));
    }

    #[test]
    fn article_data_accepts_null_link() {
        let json = r#"{"title": "XXXXXXXXXXXXXXXXXXXX", "excerpt": "No excerpt available", "link": null}"#;
        let data: ArticleData = serde_json::from_str(json).unwrap();
        assert_eq!(data.link, None);
    }

    #[test]
    fn failed_result_has_no_summary() {
        let result = SummaryResult::failed("text is empty", 0, false);
        assert!(!result.success);
        assert_eq!(result.summary, None);
        assert_eq!(result.error.as_deref(), Some("text is empty"));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["summary"], serde_json::Value::Null);
        assert_eq!(json["success"], false);
    }

    #[test]
    fn succeeded_result_counts_characters() {
        let result = SummaryResult::succeeded("ملخص.".to_string(), SummaryMethod::ExtractiveFallback, 120, true);
        assert_eq!(result.summary_length, 5);
        assert_eq!(result.method_used, Some(SummaryMethod::ExtractiveFallback));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["method_used"], "ExtractiveFallback");
    }
}
