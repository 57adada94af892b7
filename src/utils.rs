//! Text helpers shared by the extraction, translation, and summary stages.
//!
//! Everything here counts Unicode scalar values rather than bytes, since most
//! of the text flowing through the pipeline is Arabic and a byte slice would
//! land in the middle of a code point.
//!
//! - Truncation for logging and for bounded outputs
//! - Whitespace collapsing and character whitelisting
//! - Arabic-script detection used by the language fallback heuristic

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Characters kept in extracted article bodies: word characters, whitespace,
/// the Arabic-script blocks, and basic punctuation.
static BODY_DISALLOWED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"[^\w\s\x{0600}-\x{06FF}\x{0750}-\x{077F}\x{08A0}-\x{08FF}\x{FB50}-\x{FDFF}\x{FE70}-\x{FEFF}.,!?;:()\-"]"#,
    )
    .expect("static regex")
});

/// Same as [`BODY_DISALLOWED`] but also keeps Arabic guillemets.
static SUMMARY_DISALLOWED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"[^\w\s\x{0600}-\x{06FF}\x{0750}-\x{077F}\x{08A0}-\x{08FF}\x{FB50}-\x{FDFF}\x{FE70}-\x{FEFF}.,!?;:()\-"»«]"#,
    )
    .expect("static regex")
});

/// Which character whitelist to apply in [`strip_disallowed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whitelist {
    /// Used for article bodies pulled from the site.
    ArticleBody,
    /// Used when cleaning text before summarization; adds `»` and `«`.
    SummaryInput,
}

/// Number of characters (not bytes) in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Take at most `max` characters from the start of `s`.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let head = truncate_chars(s, max);
    if head.len() == s.len() {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", head, s.len() - head.len())
    }
}

/// Replace every run of whitespace with a single space and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s, " ").trim().to_string()
}

/// Remove every character that falls outside the chosen whitelist.
pub fn strip_disallowed(s: &str, whitelist: Whitelist) -> String {
    let re = match whitelist {
        Whitelist::ArticleBody => &*BODY_DISALLOWED,
        Whitelist::SummaryInput => &*SUMMARY_DISALLOWED,
    };
    re.replace_all(s, "").into_owned()
}

/// Count characters in the basic Arabic block (U+0600..=U+06FF).
pub fn arabic_char_count(s: &str) -> usize {
    s.chars().filter(|c| ('\u{0600}'..='\u{06FF}').contains(c)).count()
}
