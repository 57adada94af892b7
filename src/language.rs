//! Source-language detection.
//!
//! [`LanguageService::detect`] never fails: when the underlying
//! [`LanguageDetector`] gives no answer it falls back to counting Arabic
//! letters, and otherwise assumes English.

use crate::error::DetectError;
use crate::utils::{arabic_char_count, collapse_whitespace, truncate_chars};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};
use whatlang::Lang;

pub const ARABIC: &str = "ar";
pub const ENGLISH: &str = "en";

/// Detection only looks at this many leading characters.
const SAMPLE_CHARS: usize = 100;
/// More Arabic letters than this means the fallback calls the text Arabic.
const ARABIC_THRESHOLD: usize = 10;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("static regex"));

/// Something that can name the language of a text.
pub trait LanguageDetector {
    /// ISO 639-1 code of the language of `text`.
    fn detect(&self, text: &str) -> Result<String, DetectError>;
}

/// [`LanguageDetector`] backed by the `whatlang` trigram model.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Result<String, DetectError> {
        let info = whatlang::detect(text).ok_or(DetectError {
            chars: text.chars().count(),
        })?;
        Ok(iso_639_1(info.lang())
            .map(str::to_string)
            .unwrap_or_else(|| info.lang().code().to_string()))
    }
}

fn iso_639_1(lang: Lang) -> Option<&'static str> {
    Some(match lang {
        Lang::Ara => "ar",
        Lang::Eng => "en",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Spa => "es",
        Lang::Ita => "it",
        Lang::Por => "pt",
        Lang::Rus => "ru",
        Lang::Tur => "tr",
        Lang::Pes => "fa",
        Lang::Urd => "ur",
        Lang::Hin => "hi",
        Lang::Ben => "bn",
        Lang::Ind => "id",
        Lang::Nld => "nl",
        Lang::Cmn => "zh",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        Lang::Heb => "he",
        Lang::Tgl => "tl",
        _ => return None,
    })
}

/// Two-tier language detection.
#[derive(Debug, Clone, Default)]
pub struct LanguageService<D> {
    detector: D,
}

impl<D: LanguageDetector> LanguageService<D> {
    pub fn new(detector: D) -> Self {
        Self { detector }
    }

    /// Language code of `text`. Always returns something.
    pub fn detect(&self, text: &str) -> String {
        let normalized = collapse_whitespace(&NON_WORD.replace_all(text, " "));
        let sample = truncate_chars(&normalized, SAMPLE_CHARS);
        match self.detector.detect(sample) {
            Ok(lang) => {
                debug!(%lang, "Detected language");
                lang
            }
            Err(e) => {
                let lang = script_fallback(text);
                warn!(error = %e, %lang, "Language detection failed; using script heuristic");
                lang.to_string()
            }
        }
    }
}

/// Arabic if `text` holds more than ten Arabic letters, otherwise English.
pub fn script_fallback(text: &str) -> &'static str {
    if arabic_char_count(text) > ARABIC_THRESHOLD {
        ARABIC
    } else {
        ENGLISH
    }
}
