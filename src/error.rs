//! Error types for each collaborator seam of the pipeline.
//!
//! None of these escape the two public entry points
//! ([`crate::crawler::Crawler::fetch_listing`] and
//! [`crate::summarizer::Summarizer::summarize`]). Fetch, translation, and
//! model failures are absorbed into degraded results; only [`SummaryError`]
//! is surfaced, and then only as the message of a failed
//! [`crate::models::SummaryResult`].

use thiserror::Error;

/// Failure while downloading a page from the site.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("request timed out")]
    Timeout,
    #[error("server responded with HTTP {0}")]
    Status(u16),
}

impl FetchError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Network(err)
        }
    }
}

/// Language detection produced no answer.
#[derive(Debug, Error)]
#[error("could not detect language of {chars} characters of text")]
pub struct DetectError {
    pub chars: usize,
}

/// Failure while translating a single chunk.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("translation service responded with HTTP {0}")]
    Status(u16),
    #[error("unexpected translation payload: {0}")]
    Malformed(String),
}

/// Failure of the primary generative model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no API key configured for the summary model")]
    MissingApiKey,
    #[error("model request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model API responded with HTTP {status}: {message}")]
    Api { status: u16, message: String },
    #[error("could not decode model response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("model returned an empty summary")]
    EmptyResponse,
}

/// Failure while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("cache TTL of {minutes} minutes is too large")]
    CacheTtl { minutes: u64 },
    #[error("invalid base URL {url}: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Reasons a summary request is rejected. The `Display` text is what callers
/// see in [`crate::models::SummaryResult::error`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryError {
    #[error("could not extract enough content from the article to summarize")]
    InsufficientContent,
    #[error("text is empty")]
    EmptyInput,
    #[error("text is too long; the maximum is {max} characters")]
    TooLong { max: usize },
    #[error("text is too short to summarize; at least {min} characters are required")]
    TooShort { min: usize },
    #[error("could not extract a useful summary from the given text")]
    NoUsableSentences,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_error_messages_are_human_readable() {
        assert_eq!(
            SummaryError::TooLong { max: 8000 }.to_string(),
            "text is too long; the maximum is 8000 characters"
        );
        assert_eq!(SummaryError::EmptyInput.to_string(), "text is empty");
    }

    #[test]
    fn fetch_status_display() {
        assert_eq!(FetchError::Status(503).to_string(), "server responded with HTTP 503");
    }
}
