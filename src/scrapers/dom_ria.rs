//! DOM.RIA flat scraper.
//!
//! Listing cards already render the thumbnail and the three areas, and the
//! detail page sometimes drops or reformats them, so card values travel
//! through `Summary` into the flat unchanged. Location comes from the page
//! state script: coordinates when the seller placed a pin, otherwise the
//! address names.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::config::DomRiaConfig;
use crate::error::{AppError, Result};
use crate::models::{Flat, Location, Source};
use crate::scrapers::html::{self, compile, parse_selector};
use crate::scrapers::numeric::{
    parse_area, parse_leading_integer, parse_price, parse_unsigned_decimal,
};
use crate::scrapers::traits::ScraperTrait;
use crate::scrapers::types::{Offer, Summary};

/// Trailing unit after a ceiling height, "2.71 м" or "270 см"
static HEIGHT_UNIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*(?:см|м|cm|m)\.?\s*$").unwrap());

/// Building number at the start of a street suffix, "буд. 13" or "70"
static BUILDING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+[\p{L}\d/-]*").unwrap());

/// Second number of a floor pair, "13 з 14" or "13 из 14"
static TOTAL_FLOOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:з|из|/)\s*(\d+)").unwrap());

/// Street type abbreviations dropped from street names
const STREET_TYPES: [&str; 10] = [
    "ул.", "вул.", "пр.", "просп.", "пр-т", "пер.", "пров.", "бул.", "бульв.", "пл.",
];

const ROOMS: [&str; 2] = ["Кімнат", "Комнат"];
const FLOOR: [&str; 2] = ["Поверх", "Этаж"];
const CEILING: [&str; 2] = ["Висота стель", "Высота потолков"];

/// DOM.RIA flat scraper
pub struct DomRiaScraper {
    base_url: Url,
    default_currency: String,
    search_marker: String,
    counter: Regex,
    card: Selector,
    card_link: Selector,
    card_image: Selector,
    card_area: Selector,
    price: Selector,
    published: Selector,
    characteristic: Selector,
    characteristic_label: Selector,
    characteristic_value: Selector,
    tag: Selector,
    state_marker: String,
    offer: Selector,
    canonical_link: Selector,
    canonical: Regex,
}

impl DomRiaScraper {
    /// Create a scraper for the given page layout
    pub fn new(config: &DomRiaConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            AppError::config(format!("Invalid DOM.RIA base URL '{}': {}", config.base_url, e))
        })?;
        if config.state_marker.trim().is_empty() || config.search_marker.trim().is_empty() {
            return Err(AppError::config("DOM.RIA state markers must not be empty"));
        }

        Ok(Self {
            base_url,
            default_currency: config.default_currency.clone(),
            search_marker: config.search_marker.clone(),
            counter: compile(&config.counter_pattern)?,
            card: parse_selector(&config.card_selector)?,
            card_link: parse_selector(&config.card_link_selector)?,
            card_image: parse_selector(&config.card_image_selector)?,
            card_area: parse_selector(&config.card_area_selector)?,
            price: parse_selector(&config.price_selector)?,
            published: parse_selector(&config.published_selector)?,
            characteristic: parse_selector(&config.characteristic_selector)?,
            characteristic_label: parse_selector(&config.characteristic_label_selector)?,
            characteristic_value: parse_selector(&config.characteristic_value_selector)?,
            tag: parse_selector(&config.tag_selector)?,
            state_marker: config.state_marker.clone(),
            offer: parse_selector(&config.offer_selector)?,
            canonical_link: parse_selector(r#"link[rel="canonical"]"#)?,
            canonical: compile(&config.canonical_pattern)?,
        })
    }

    /// Canonical offer URL the page declares for itself.
    ///
    /// `None` unless the page is a live offer page whose canonical link
    /// looks like an offer URL. Callers compare the result with the
    /// requested URL to spot listings merged into another one.
    pub fn detect_junk(&self, offer: Option<&Offer>) -> Option<String> {
        let (url, markup) = offer?.parts()?;
        let document = Html::parse_document(markup);
        let root = document.root_element();

        root.select(&self.offer).next()?;
        let canonical = root
            .select(&self.canonical_link)
            .next()
            .and_then(|link| html::attr(link, &["href"]))?;
        if !self.canonical.is_match(canonical) {
            debug!("Canonical link {} of {} is not an offer URL", canonical, url);
            return None;
        }
        if canonical != url {
            debug!("{} declares {} as canonical", url, canonical);
        }
        Some(canonical.to_string())
    }

    /// Realty object out of the page state script.
    fn parse_state(&self, markup: &str) -> Option<Value> {
        match assigned_state(markup, &self.state_marker)?.0 {
            Value::Object(mut map) => map.remove("realty"),
            _ => None,
        }
    }

    fn parse_location(&self, markup: &str) -> Option<Location> {
        let realty = self.parse_state(markup)?;
        let coordinate = |key: &str| realty.get(key)?.as_f64().filter(|v| *v != 0.0);
        if let (Some(longitude), Some(latitude)) = (coordinate("longitude"), coordinate("latitude")) {
            return Some(Location::Point {
                longitude,
                latitude,
            });
        }
        normalize_address(Some(&realty))
            .ok()
            .filter(|address| !address.is_empty())
            .map(Location::Address)
    }

    fn parse_card(&self, card: ElementRef) -> Option<Summary> {
        let href = card
            .select(&self.card_link)
            .next()
            .and_then(|link| html::attr(link, &["href"]))?;
        let url = self.base_url.join(href).ok()?;

        let avatar = card.select(&self.card_image).next().and_then(|img| {
            html::attr(img, &["src", "data-src"])
                .or_else(|| html::attr(img, &["srcset"])?.split_whitespace().next())
                .map(str::to_string)
        });

        // "44.5 / 18 / 21 м²", a dash stands for an unknown value
        let areas = html::select_text(card, &self.card_area).unwrap_or_default();
        let mut areas = areas.split('/').map(|part| parse_area(Some(part)));

        Some(Summary {
            url: url.to_string(),
            avatar,
            area: areas.next().flatten(),
            living_area: areas.next().flatten(),
            kitchen_area: areas.next().flatten(),
        })
    }
}

/// First JSON object a page script assigns to `marker`, along with its
/// source text. Mentions of the marker that are not assignments are skipped.
fn assigned_state<'a>(markup: &'a str, marker: &str) -> Option<(Value, &'a str)> {
    markup.match_indices(marker).find_map(|(start, _)| {
        let rest = markup[start + marker.len()..]
            .trim_start()
            .strip_prefix('=')?;
        let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<Value>();
        match stream.next()? {
            Ok(state @ Value::Object(_)) => Some((state, &rest[..stream.byte_offset()])),
            _ => None,
        }
    })
}

impl ScraperTrait for DomRiaScraper {
    fn detect_boundary(&self, markup: Option<&str>) -> Option<u32> {
        let (_, state) = assigned_state(markup?, &self.search_marker)?;
        self.counter.captures(state)?.get(1)?.as_str().parse().ok()
    }

    fn enumerate_page(&self, markup: Option<&str>) -> Vec<Summary> {
        let Some(document) = html::document(markup) else {
            return Vec::new();
        };
        let summaries: Vec<Summary> = document
            .select(&self.card)
            .filter_map(|card| self.parse_card(card))
            .collect();

        info!("Found {} DOM.RIA offer cards", summaries.len());
        summaries
    }

    fn extract_offer(&self, offer: Option<&Offer>) -> Option<Flat> {
        let offer = offer?;
        let (url, markup) = offer.parts()?;
        let document = Html::parse_document(markup);
        let root = document.root_element();

        let Some(price) = html::select_text(root, &self.price) else {
            debug!("No price block on {}, offer is gone", url);
            return None;
        };
        let (price, currency) = parse_price(&price)?;
        let published = html::select_text(root, &self.published)
            .and_then(|date| NaiveDate::parse_from_str(&date, "%d.%m.%Y").ok());
        let Some(published) = published else {
            debug!("No publication date on {}", url);
            return None;
        };

        let mut rooms = None;
        let mut floor = None;
        let mut total_floor = None;
        let mut ceiling_height = None;
        for row in root.select(&self.characteristic) {
            let label = html::select_text(row, &self.characteristic_label).unwrap_or_default();
            let value = html::select_text(row, &self.characteristic_value);
            let label = label.trim_end_matches(':').trim();
            if ROOMS.contains(&label) {
                rooms = parse_leading_integer(value.as_deref());
            } else if FLOOR.contains(&label) {
                floor = parse_leading_integer(value.as_deref());
                total_floor = value
                    .as_deref()
                    .and_then(|v| TOTAL_FLOOR.captures(v))
                    .and_then(|caps| caps[1].parse().ok());
            } else if CEILING.contains(&label) {
                let value = value.map(|v| HEIGHT_UNIT.replace(&v, "").into_owned());
                ceiling_height = normalize_ceiling_height(value.as_deref());
            }
        }

        Some(Flat {
            url: url.to_string(),
            avatar: offer.avatar.clone(),
            published,
            location: self.parse_location(markup),
            price,
            currency: currency.filter(|c| *c != self.default_currency),
            area: offer.area,
            living_area: offer.living_area,
            kitchen_area: offer.kitchen_area,
            rooms,
            floor,
            total_floor,
            ceiling_height,
            details: root.select(&self.tag).map(html::text).filter(|t| !t.is_empty()).collect(),
        })
    }

    fn source(&self) -> Source {
        Source::DomRia
    }
}

/// Join city, district and street names into one address line.
///
/// Ukrainian (`*_name_uk`) names win over the untranslated ones; every
/// other key is ignored. Street type abbreviations and building markers are
/// dropped: `"Зодчих ул., 70"` becomes `"Зодчих, 70"`.
///
/// Anything but a JSON object is a caller bug and yields an error.
pub fn normalize_address(fields: Option<&Value>) -> Result<String> {
    let fields = match fields {
        Some(Value::Object(map)) => map,
        Some(other) => return Err(AppError::invalid_address(kind_of(other))),
        None => return Err(AppError::invalid_address("nothing")),
    };
    let name = |key: &str| {
        [format!("{key}_name_uk"), format!("{key}_name")]
            .iter()
            .filter_map(|k| fields.get(k)?.as_str())
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string)
    };

    let parts: Vec<String> = [
        name("city"),
        name("district"),
        name("street").map(|street| normalize_street(&street)),
    ]
    .into_iter()
    .flatten()
    .collect();
    Ok(parts.join(", "))
}

fn normalize_street(street: &str) -> String {
    let (name, suffix) = street.split_once(',').unwrap_or((street, ""));
    let name = name
        .split_whitespace()
        .filter(|word| !STREET_TYPES.contains(&word.to_lowercase().as_str()))
        .collect::<Vec<_>>()
        .join(" ");
    match BUILDING.find(suffix) {
        Some(number) => format!("{}, {}", name, number.as_str()),
        None => name,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse a ceiling height in meters typed in free form.
///
/// Whitespace is dropped first. Text with a decimal point is read as is;
/// bare digits are centimeters or millimeters run together, so the point
/// goes after the first digit: `"27"` is 2.7 and `"2 800"` is 2.8.
pub fn normalize_ceiling_height(raw: Option<&str>) -> Option<f64> {
    let compact: String = raw?.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.contains('.') {
        return parse_unsigned_decimal(Some(&compact));
    }
    let first = compact.find(|c: char| c.is_ascii_digit())?;
    let (head, tail) = compact.split_at(first + 1);
    parse_unsigned_decimal(Some(&format!("{head}.{tail}")))
}
