//! Deterministic extractive summary, used whenever the primary model gives
//! nothing back.
//!
//! Sentences of 40 characters or fewer are ignored. Of the rest:
//!
//! | sentences | picked                                        |
//! |-----------|-----------------------------------------------|
//! | 1..=3     | all of them                                   |
//! | 4..=8     | first two and last two                        |
//! | 9..       | first, the two starting at `n / 3`, and last  |
//!
//! A pick shorter than 150 characters is replaced by the first four
//! sentences when there are more than three to choose from.

use crate::error::SummaryError;
use crate::utils::char_len;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;

/// Sentences must be longer than this to be considered.
pub const MIN_SENTENCE_CHARS: usize = 40;
/// Summaries shorter than this are padded out to the first four sentences.
pub const MIN_SUMMARY_CHARS: usize = 150;

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?؟]+").expect("static regex"));

/// Sentences of `text` long enough to be picked, in order.
pub fn usable_sentences(text: &str) -> Vec<&str> {
    SENTENCE_END
        .split(text)
        .map(str::trim)
        .filter(|s| char_len(s) > MIN_SENTENCE_CHARS)
        .collect()
}

/// Indices picked out of `n` usable sentences.
pub fn select_indices(n: usize) -> Vec<usize> {
    match n {
        0..=3 => (0..n).collect(),
        4..=8 => vec![0, 1, n - 2, n - 1],
        _ => {
            let third = n / 3;
            vec![0, third, third + 1, n - 1]
        }
    }
}

pub fn extractive_summary(text: &str) -> Result<String, SummaryError> {
    let sentences = usable_sentences(text);
    if sentences.is_empty() {
        return Err(SummaryError::NoUsableSentences);
    }

    let mut summary = with_period(select_indices(sentences.len()).into_iter().map(|i| sentences[i]).join(". "));
    if char_len(&summary) < MIN_SUMMARY_CHARS && sentences.len() > 3 {
        summary = with_period(sentences.iter().take(4).join(". "));
    }
    Ok(summary)
}

fn with_period(mut s: String) -> String {
    if !s.ends_with('.') {
        s.push('.');
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A sentence of exactly 49 characters plus its period.
    fn sentence(i: usize) -> String {
        let head = format!("Sentence number {i:02} talks about the economy");
        format!("{head:x<49}.")
    }

    fn text_of(n: usize) -> String {
        (0..n).map(sentence).join(" ")
    }

    fn trimmed(i: usize) -> String {
        sentence(i).trim_end_matches('.').to_string()
    }

    #[test]
    fn selection_tiers() {
        assert_eq!(select_indices(2), vec![0, 1]);
        assert_eq!(select_indices(3), vec![0, 1, 2]);
        assert_eq!(select_indices(4), vec![0, 1, 2, 3]);
        assert_eq!(select_indices(8), vec![0, 1, 6, 7]);
        assert_eq!(select_indices(10), vec![0, 3, 4, 9]);
        assert_eq!(select_indices(20), vec![0, 6, 7, 19]);
    }

    #[test]
    fn ten_sentences_pick_first_third_mark_and_last() {
        let summary = extractive_summary(&text_of(10)).unwrap();
        let expected = format!("{}. {}. {}. {}.", trimmed(0), trimmed(3), trimmed(4), trimmed(9));
        assert_eq!(summary, expected);
    }

    #[test]
    fn short_sentences_are_ignored() {
        let text = format!("Too short. {} Also short! {}", sentence(1), sentence(2));
        assert_eq!(usable_sentences(&text), vec![trimmed(1), trimmed(2)]);
    }

    #[test]
    fn arabic_question_mark_ends_a_sentence() {
        let text = "هل ستبدأ المرحلة الثانية من مشروع المترو في العاصمة قريبا؟ أعلنت الهيئة أن الأعمال ستبدأ مطلع العام المقبل";
        assert_eq!(usable_sentences(text).len(), 2);
    }

    #[test]
    fn nothing_usable_is_an_error() {
        assert_eq!(extractive_summary("Tiny. Bits. Only!"), Err(SummaryError::NoUsableSentences));
        assert_eq!(extractive_summary(""), Err(SummaryError::NoUsableSentences));
    }

    #[test]
    fn single_sentence_gets_a_period() {
        let s = "The council approved the new budget for the coming fiscal year";
        assert_eq!(extractive_summary(s).unwrap(), format!("{s}."));
    }

    #[test]
    fn is_deterministic() {
        let text = text_of(13);
        assert_eq!(extractive_summary(&text), extractive_summary(&text));
    }
}
