//! Summary pipeline: resolve, clean, translate, validate, summarize.
//!
//! [`Summarizer::summarize`] never fails. Input problems come back as a
//! [`SummaryResult`] with `success == false` and a readable `error`; every
//! other problem (article fetch, translation chunk, primary model) degrades
//! the result instead of aborting it.

pub mod clean;
pub mod extractive;

use crate::api::{SummaryModel, ask_for_summary};
use crate::config::SummaryConfig;
use crate::error::SummaryError;
use crate::fetch::PageFetcher;
use crate::language::LanguageDetector;
use crate::models::{ArticleData, NO_EXCERPT, SummaryMethod, SummaryRequest, SummaryResult};
use crate::scrapers::article_body::ArticleContentFetcher;
use crate::translate::{TranslationService, Translator};
use crate::utils::char_len;
use clean::clean_text;
use extractive::extractive_summary;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Resolved article text must be longer than this.
pub const MIN_RESOLVED_CHARS: usize = 50;
/// Translated text must have at least this many characters once trimmed.
pub const MIN_INPUT_CHARS: usize = 30;

pub struct Summarizer<F, D, T, M> {
    content: ArticleContentFetcher<F>,
    translation: TranslationService<D, T>,
    model: M,
    config: SummaryConfig,
}

impl<F, D, T, M> Summarizer<F, D, T, M>
where
    F: PageFetcher,
    D: LanguageDetector,
    T: Translator,
    M: SummaryModel,
{
    pub fn new(
        content: ArticleContentFetcher<F>,
        translation: TranslationService<D, T>,
        model: M,
        config: SummaryConfig,
    ) -> Self {
        Self {
            content,
            translation,
            model,
            config,
        }
    }

    #[instrument(level = "info", skip_all)]
    pub async fn summarize(&self, request: SummaryRequest) -> SummaryResult {
        let t0 = Instant::now();
        let result = self.run(request).await;
        let elapsed_ms = t0.elapsed().as_millis() as u64;
        match &result.error {
            None => info!(
                method = ?result.method_used,
                original_length = result.original_length,
                summary_length = result.summary_length,
                was_translated = result.was_translated,
                elapsed_ms,
                "Summary produced"
            ),
            Some(error) => warn!(%error, elapsed_ms, "Summary request failed"),
        }
        result
    }

    async fn run(&self, request: SummaryRequest) -> SummaryResult {
        let text = match request {
            SummaryRequest::Text(text) => text,
            SummaryRequest::Article(data) => {
                let resolved = self.resolve_article(&data).await;
                if char_len(resolved.trim()) <= MIN_RESOLVED_CHARS {
                    return SummaryResult::failed(SummaryError::InsufficientContent, char_len(&resolved), false);
                }
                resolved
            }
        };
        let original_length = char_len(&text);

        let cleaned = clean_text(&text);
        let translation = self.translation.translate_to_arabic(&cleaned).await;
        let was_translated = translation.was_translated;
        if translation.failed_chunks > 0 {
            warn!(failed_chunks = translation.failed_chunks, "Summarizing a partial translation");
        }

        if let Err(e) = self.validate(&translation.text) {
            return SummaryResult::failed(e, original_length, was_translated);
        }

        if let Some(summary) = ask_for_summary(&self.model, &translation.text, &self.config).await {
            return SummaryResult::succeeded(summary, SummaryMethod::PrimaryModel, original_length, was_translated);
        }

        // The translator may reintroduce characters outside the whitelist.
        match extractive_summary(&clean_text(&translation.text)) {
            Ok(summary) => {
                SummaryResult::succeeded(summary, SummaryMethod::ExtractiveFallback, original_length, was_translated)
            }
            Err(e) => SummaryResult::failed(e, original_length, was_translated),
        }
    }

    /// Title, excerpt and (when it can be fetched) the article body, separated
    /// by blank lines. Missing parts are skipped.
    async fn resolve_article(&self, data: &ArticleData) -> String {
        let mut parts = Vec::new();
        if let Some(title) = data.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            parts.push(title.to_string());
        }
        if let Some(excerpt) = data
            .excerpt
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty() && *e != NO_EXCERPT)
        {
            parts.push(excerpt.to_string());
        }
        if let Some(link) = data.link.as_deref().filter(|l| !l.trim().is_empty()) {
            match self.content.fetch_content(link).await {
                Some(body) => parts.push(body),
                None => debug!(%link, "Continuing without article body"),
            }
        }
        parts.join("\n\n")
    }

    fn validate(&self, text: &str) -> Result<(), SummaryError> {
        if text.trim().is_empty() {
            return Err(SummaryError::EmptyInput);
        }
        if char_len(text) > self.config.max_input_chars {
            return Err(SummaryError::TooLong {
                max: self.config.max_input_chars,
            });
        }
        if char_len(text.trim()) < MIN_INPUT_CHARS {
            return Err(SummaryError::TooShort { min: MIN_INPUT_CHARS });
        }
        Ok(())
    }
}
