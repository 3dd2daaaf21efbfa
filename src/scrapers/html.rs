//! Small helpers over `scraper` shared by the marketplace scrapers.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};

/// Compile a configured CSS selector.
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Compile a configured regular expression.
pub fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| AppError::pattern(pattern, e))
}

/// Parse markup into a document, or `None` when there is nothing to parse.
pub fn document(markup: Option<&str>) -> Option<Html> {
    let markup = markup?;
    if markup.trim().is_empty() {
        return None;
    }
    Some(Html::parse_document(markup))
}

/// Element text with runs of whitespace (including `&nbsp;`) collapsed.
pub fn text(element: ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first element matching `selector`, if it has any.
pub fn select_text(scope: ElementRef, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(text)
        .filter(|s| !s.is_empty())
}

/// First non-empty value among `attrs` on `element`.
pub fn attr<'a>(element: ElementRef<'a>, attrs: &[&str]) -> Option<&'a str> {
    attrs
        .iter()
        .filter_map(|name| element.value().attr(name))
        .map(str::trim)
        .find(|value| !value.is_empty())
}
