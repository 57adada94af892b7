//! HTML extraction for the Saudi Gazette.
//!
//! The site's markup shifts often, so neither extractor depends on exact
//! selectors. Both try an ordered list of heuristics and keep the first one
//! that produces something usable.
//!
//! | Module | Input | Output |
//! |--------|-------|--------|
//! | [`listing`] | front page HTML | up to 8 [`crate::models::Article`]s |
//! | [`article_body`] | article URL | cleaned body text, or `None` |

pub mod article_body;
pub mod listing;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

pub(crate) static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("static selector"));
pub(crate) static HEADING: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").expect("static selector"));

/// Text of `el` with whitespace runs collapsed, as it would read on screen.
pub(crate) fn visible_text(el: ElementRef<'_>) -> String {
    crate::utils::collapse_whitespace(&el.text().collect::<String>())
}

/// Text nodes of `el`, each trimmed, joined by single spaces.
pub(crate) fn spaced_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether `el` has a class attribute containing any of `keywords`,
/// compared case-insensitively.
pub(crate) fn class_matches(el: ElementRef<'_>, keywords: &[&str]) -> bool {
    el.value()
        .attr("class")
        .map(|class| {
            let class = class.to_lowercase();
            keywords.iter().any(|k| class.contains(k))
        })
        .unwrap_or(false)
}
