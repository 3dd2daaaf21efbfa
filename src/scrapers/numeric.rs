//! Numeric normalization shared by every marketplace scraper.
//!
//! All helpers are total: bad input yields `None`, never a panic or error.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

/// Amount (digits with space group separators and an optional fraction)
/// followed by whatever currency token the site prints.
static PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9](?:[0-9\s]*[0-9])?(?:[.,][0-9]+)?)\s*(.*?)\s*$").unwrap()
});

/// Separator and digits left over after the amount, as in `"1,850,000"`
static STRAY_GROUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[.,][0-9]").unwrap());

/// Area units sites append to square meter values
const AREA_UNITS: [&str; 6] = ["м²", "м2", "кв. м", "кв.м", "m²", "m2"];

/// Parse a strictly formatted non-negative decimal like `"23.8"` or `"14"`.
///
/// Surrounding whitespace is ignored; signs, inner whitespace and anything
/// non-numeric are rejected.
pub fn parse_unsigned_decimal(raw: Option<&str>) -> Option<f64> {
    let text = raw?.trim();
    let mut digits = 0;
    let mut points = 0;
    for c in text.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return None,
        }
    }
    if digits == 0 || points > 1 {
        return None;
    }
    text.parse().ok()
}

/// Parse the integer a field starts with, ignoring whatever trails it.
///
/// `"  9 7"` gives 9 and `"12.3"` gives 12, while a leading sign or letter
/// gives `None`.
pub fn parse_leading_integer(raw: Option<&str>) -> Option<u32> {
    let text = raw?.trim_start();
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    if end == 0 {
        return None;
    }
    text[..end].parse().ok()
}

/// Split a rendered price such as `"1 850 000 грн."` into its amount and
/// currency token. The token is `None` when the site printed none.
///
/// Amounts grouped with commas or dots, like `"1,850,000"`, yield `None`.
pub fn parse_price(raw: &str) -> Option<(Decimal, Option<String>)> {
    let caps = PRICE.captures(raw)?;
    if STRAY_GROUP.is_match(&caps[2]) {
        return None;
    }
    let amount: String = caps[1]
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    let amount = Decimal::from_str(&amount).ok()?;
    let currency = caps
        .get(2)
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    Some((amount, currency))
}

/// Parse a square meter value, tolerating a trailing unit like `"46 м²"`.
pub fn parse_area(raw: Option<&str>) -> Option<f64> {
    let mut text = raw?.trim();
    for unit in AREA_UNITS {
        if let Some(stripped) = text.strip_suffix(unit) {
            text = stripped;
            break;
        }
    }
    parse_unsigned_decimal(Some(text))
}
