//! Translation of article text into Arabic.
//!
//! Long texts are cut into chunks of at most `chunk_chars` characters along
//! sentence boundaries and translated one after another, so the output keeps
//! the input's order. A chunk that fails to translate is kept in its original
//! language; the call as a whole still counts as translated.
//!
//! Sentence splitting is a plain punctuation split. Abbreviations such as
//! "U.S." end a sentence early; that only moves a chunk boundary.

use crate::config::TranslationConfig;
use crate::error::TranslateError;
use crate::language::{ARABIC, LanguageDetector, LanguageService};
use crate::utils::{char_len, truncate_for_log};
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

static SENTENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?؟]+[.!?؟]*").expect("static regex"));

/// A machine translation backend.
pub trait Translator {
    /// Translate `text` from `source` to `target` (ISO 639-1 codes).
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, TranslateError>;
}

/// [`Translator`] using the public Google Translate web endpoint.
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl GoogleTranslator {
    pub fn new(config: &TranslationConfig) -> Result<Self, TranslateError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }
}

impl Translator for GoogleTranslator {
    #[instrument(level = "debug", skip_all, fields(%source, %target, chars = char_len(text)))]
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, TranslateError> {
        let url = format!(
            "{}?client=gtx&dt=t&sl={}&tl={}&q={}",
            self.endpoint,
            urlencoding::encode(source),
            urlencoding::encode(target),
            urlencoding::encode(text)
        );
        let response = self.client.get(&url).timeout(self.timeout).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Status(status.as_u16()));
        }
        let payload: Value = response.json().await?;
        parse_translation(&payload)
    }
}

/// The endpoint answers `[[["translated", "original", ...], ...], ...]`;
/// the translation is the concatenation of each segment's first element.
fn parse_translation(payload: &Value) -> Result<String, TranslateError> {
    let segments = payload
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::Malformed(truncate_for_log(&payload.to_string(), 120)))?;
    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();
    if text.trim().is_empty() {
        return Err(TranslateError::Malformed("no translated segments".to_string()));
    }
    Ok(text)
}

/// Result of [`TranslationService::translate_to_arabic`].
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOutcome {
    pub text: String,
    /// `false` only when translation was skipped (blank or already Arabic).
    pub was_translated: bool,
    pub source_language: Option<String>,
    /// Chunks left untranslated because their request failed.
    pub failed_chunks: usize,
}

impl TranslationOutcome {
    fn skipped(text: &str, source_language: Option<String>) -> Self {
        Self {
            text: text.to_string(),
            was_translated: false,
            source_language,
            failed_chunks: 0,
        }
    }
}

/// Detect-then-translate, chunk by chunk.
#[derive(Debug, Clone)]
pub struct TranslationService<D, T> {
    language: LanguageService<D>,
    translator: T,
    target: String,
    chunk_chars: usize,
}

impl<D: LanguageDetector, T: Translator> TranslationService<D, T> {
    pub fn new(detector: D, translator: T, config: &TranslationConfig) -> Self {
        Self {
            language: LanguageService::new(detector),
            translator,
            target: config.target_language.clone(),
            chunk_chars: config.chunk_chars,
        }
    }

    #[instrument(level = "info", skip_all, fields(chars = char_len(text)))]
    pub async fn translate_to_arabic(&self, text: &str) -> TranslationOutcome {
        if text.trim().is_empty() {
            return TranslationOutcome::skipped(text, None);
        }

        let source = self.language.detect(text);
        if source == ARABIC {
            info!("Text is already Arabic; skipping translation");
            return TranslationOutcome::skipped(text, Some(source));
        }

        let t0 = Instant::now();
        let chunks = split_into_chunks(text, self.chunk_chars);
        info!(%source, chunks = chunks.len(), "Translating to Arabic");

        let source_ref = &source;
        let translated: Vec<(String, bool)> = stream::iter(chunks.into_iter().enumerate())
            .then(|(i, chunk)| async move {
                match self.translator.translate(&chunk, source_ref, &self.target).await {
                    Ok(out) => {
                        debug!(index = i, "Translated chunk");
                        (out, false)
                    }
                    Err(e) => {
                        warn!(index = i, error = %e, "Chunk translation failed; keeping original text");
                        (chunk, true)
                    }
                }
            })
            .collect()
            .await;

        let failed_chunks = translated.iter().filter(|(_, failed)| *failed).count();
        let text = translated.into_iter().map(|(chunk, _)| chunk).collect::<Vec<_>>().join(" ");
        info!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            failed_chunks, "Translation finished"
        );

        TranslationOutcome {
            text,
            was_translated: true,
            source_language: Some(source),
            failed_chunks,
        }
    }
}

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Sentences are packed greedily; a new chunk starts when the next sentence
/// would push the current one over the limit. A single sentence longer than
/// the limit is cut at character boundaries.
pub fn split_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    if char_len(text) <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for sentence in SENTENCE.find_iter(text).map(|m| m.as_str().trim()).filter(|s| !s.is_empty()) {
        let sentence_len = char_len(sentence);
        if sentence_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = sentence.chars().collect();
            chunks.extend(chars.chunks(max_chars).map(|piece| piece.iter().collect::<String>()));
            continue;
        }

        if current.is_empty() {
            current.push_str(sentence);
            current_len = sentence_len;
        } else if current_len + 1 + sentence_len <= max_chars {
            current.push(' ');
            current.push_str(sentence);
            current_len += 1 + sentence_len;
        } else {
            chunks.push(std::mem::replace(&mut current, sentence.to_string()));
            current_len = sentence_len;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
