//! Extractor configuration.
//!
//! Everything marketplace-specific that is not a parsing rule lives here:
//! default currencies, base URLs, CSS selectors and marker patterns. Each
//! scraper receives its section at construction time; nothing is read from
//! global state. Every field has a default, so a TOML file only needs the
//! keys it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AppError, Result};

/// Top-level configuration file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub olx: OlxConfig,
    pub dom_ria: DomRiaConfig,
}

impl Config {
    /// Parse configuration from TOML text, failing on malformed input.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// OLX page layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OlxConfig {
    /// Currency printed for prices that need no explicit currency
    pub default_currency: String,
    /// Element holding the "found N offers" counter
    pub counter_selector: String,
    /// Title link of each listing card
    pub card_link_selector: String,
    pub price_selector: String,
    /// Line carrying the "added at" timestamp
    pub published_selector: String,
    /// Element with `data-lat` / `data-lon` attributes
    pub map_selector: String,
    pub avatar_selector: String,
    /// One row of the parameters table; holds a `th` label and a value cell
    pub details_row_selector: String,
    pub details_label_selector: String,
    pub details_value_selector: String,
}

impl Default for OlxConfig {
    fn default() -> Self {
        Self {
            default_currency: "$".to_string(),
            counter_selector: "div.dontHasPromoted h2".to_string(),
            card_link_selector: "td.offer h3 a.detailsLink".to_string(),
            price_selector: "div.price-label strong".to_string(),
            published_selector: "div.offer-titlebox__details em".to_string(),
            map_selector: "#mapcontainer".to_string(),
            avatar_selector: "#photo-gallery-opener img".to_string(),
            details_row_selector: "table.details table.item tr".to_string(),
            details_label_selector: "th".to_string(),
            details_value_selector: "td.value".to_string(),
        }
    }
}

/// DOM.RIA page layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DomRiaConfig {
    /// Base for resolving the relative links on listing cards
    pub base_url: String,
    pub default_currency: String,
    /// Script assignment prefix of the listing page's search state
    pub search_marker: String,
    /// Regex whose first group captures the total offer count, matched
    /// only inside the search state
    pub counter_pattern: String,
    pub card_selector: String,
    pub card_link_selector: String,
    pub card_image_selector: String,
    /// Card line shaped like `"44.5 / 18 / 21 м²"`
    pub card_area_selector: String,
    pub price_selector: String,
    pub published_selector: String,
    pub characteristic_selector: String,
    pub characteristic_label_selector: String,
    pub characteristic_value_selector: String,
    pub tag_selector: String,
    /// Script assignment prefix of the embedded page state
    pub state_marker: String,
    /// Container every live offer page renders
    pub offer_selector: String,
    /// Regex a canonical link must match to count as an offer URL
    pub canonical_pattern: String,
}

impl Default for DomRiaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dom.ria.com".to_string(),
            default_currency: "$".to_string(),
            search_marker: "window.__SEARCH_STATE__".to_string(),
            counter_pattern: r#""count"\s*:\s*(\d+)"#.to_string(),
            card_selector: "section.realty-item".to_string(),
            card_link_selector: "a.realty-link".to_string(),
            card_image_selector: "img".to_string(),
            card_area_selector: "span.point-before.area".to_string(),
            price_selector: "div.price-seller span.price".to_string(),
            published_selector: "li.published b".to_string(),
            characteristic_selector: "ul.characteristics li".to_string(),
            characteristic_label_selector: "span.label".to_string(),
            characteristic_value_selector: "span.value".to_string(),
            tag_selector: "div.tags span.tag".to_string(),
            state_marker: "window.__INITIAL_STATE__".to_string(),
            offer_selector: "#finalPage".to_string(),
            canonical_pattern: r"^https://dom\.ria\.com/(?:uk/|ru/)?realty-[\w-]+-\d+\.html$"
                .to_string(),
        }
    }
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file is missing or invalid.
pub fn load_config(path: &Path) -> Config {
    let loaded = std::fs::read_to_string(path)
        .map_err(AppError::from)
        .and_then(|text| Config::from_toml_str(&text));

    match loaded {
        Ok(config) => {
            info!("Loaded configuration from {}", path.display());
            config
        }
        Err(e) => {
            warn!("Failed to load config from {}: {}", path.display(), e);
            warn!("Using default configuration.");
            Config::default()
        }
    }
}
