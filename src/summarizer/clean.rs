//! Normalisation applied to every summary input before translation.

use crate::utils::{Whitelist, strip_disallowed};
use once_cell::sync::Lazy;
use regex::Regex;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("static regex"));
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("static regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Strip markup, squeeze whitespace and drop characters outside the summary
/// whitelist.
pub fn clean_text(text: &str) -> String {
    let text = TAG.replace_all(text, "");
    let text = BLANK_LINES.replace_all(&text, "\n\n");
    let text = WHITESPACE.replace_all(&text, " ");
    strip_disallowed(text.trim(), Whitelist::SummaryInput)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_tags_and_squeezes_whitespace() {
        let raw = "<p>First   line</p>\n\n\n<b>Second</b>\tline ";
        assert_eq!(clean_text(raw), "First line Second line");
    }

    #[test]
    fn keeps_arabic_and_guillemets() {
        let raw = "قال الوزير «إن المشروع سيكتمل» اليوم. #عاجل @news";
        assert_eq!(clean_text(raw), "قال الوزير «إن المشروع سيكتمل» اليوم. عاجل news");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(clean_text("  <br/>  "), "");
    }
}
