use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use crate::config::OlxConfig;
use crate::error::Result;
use crate::models::{Flat, Location, Source};
use crate::scrapers::html::{self, parse_selector};
use crate::scrapers::numeric::{parse_area, parse_leading_integer, parse_price};
use crate::scrapers::traits::ScraperTrait;
use crate::scrapers::types::{Offer, Summary};

/// First number in the counter, group separators allowed ("1 234")
static COUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d[\d\s]*").unwrap());

/// "25 лютого 2019" inside the "added at" line
static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\s+(\p{L}+)\s+(\d{4})").unwrap());

/// Genitive month names as OLX prints them, Ukrainian then Russian
const MONTHS: [[&str; 2]; 12] = [
    ["січня", "января"],
    ["лютого", "февраля"],
    ["березня", "марта"],
    ["квітня", "апреля"],
    ["травня", "мая"],
    ["червня", "июня"],
    ["липня", "июля"],
    ["серпня", "августа"],
    ["вересня", "сентября"],
    ["жовтня", "октября"],
    ["листопада", "ноября"],
    ["грудня", "декабря"],
];

const AREA: [&str; 2] = ["Загальна площа", "Общая площадь"];
const LIVING_AREA: [&str; 2] = ["Житлова площа", "Жилая площадь"];
const KITCHEN_AREA: [&str; 2] = ["Площа кухні", "Площадь кухни"];
const ROOMS: [&str; 2] = ["Кількість кімнат", "Количество комнат"];
const FLOOR: [&str; 2] = ["Поверх", "Этаж"];
const TOTAL_FLOOR: [&str; 2] = ["Поверховість", "Этажность"];
/// Rows describing the ad rather than the flat
const IGNORED: [&str; 2] = ["Оголошення від", "Объявление от"];

/// Numeric fields and free-form tags read off the parameters table
#[derive(Debug, Default)]
struct Parameters {
    area: Option<f64>,
    living_area: Option<f64>,
    kitchen_area: Option<f64>,
    rooms: Option<u32>,
    floor: Option<u32>,
    total_floor: Option<u32>,
    details: Vec<String>,
}

/// OLX flat scraper
pub struct OlxScraper {
    default_currency: String,
    counter: Selector,
    card_link: Selector,
    price: Selector,
    published: Selector,
    map: Selector,
    avatar: Selector,
    details_row: Selector,
    details_label: Selector,
    details_value: Selector,
}

impl OlxScraper {
    /// Create a scraper for the given page layout
    pub fn new(config: &OlxConfig) -> Result<Self> {
        Ok(Self {
            default_currency: config.default_currency.clone(),
            counter: parse_selector(&config.counter_selector)?,
            card_link: parse_selector(&config.card_link_selector)?,
            price: parse_selector(&config.price_selector)?,
            published: parse_selector(&config.published_selector)?,
            map: parse_selector(&config.map_selector)?,
            avatar: parse_selector(&config.avatar_selector)?,
            details_row: parse_selector(&config.details_row_selector)?,
            details_label: parse_selector(&config.details_label_selector)?,
            details_value: parse_selector(&config.details_value_selector)?,
        })
    }

    fn parse_published(&self, root: ElementRef) -> Option<NaiveDate> {
        let line = html::select_text(root, &self.published)?;
        let caps = DATE.captures(&line)?;
        let day = caps[1].parse().ok()?;
        let month = caps[2].to_lowercase();
        let month = MONTHS.iter().position(|names| names.contains(&month.as_str()))? as u32 + 1;
        let year = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    fn parse_point(&self, root: ElementRef) -> Option<Location> {
        let map = root.select(&self.map).next()?;
        let latitude = html::attr(map, &["data-lat"])?.parse().ok()?;
        let longitude = html::attr(map, &["data-lon"])?.parse().ok()?;
        Some(Location::Point {
            longitude,
            latitude,
        })
    }

    fn parse_parameters(&self, root: ElementRef) -> Parameters {
        let mut parameters = Parameters::default();
        for row in root.select(&self.details_row) {
            let Some(label) = html::select_text(row, &self.details_label) else {
                continue;
            };
            let Some(value) = html::select_text(row, &self.details_value) else {
                continue;
            };
            let label = label.trim_end_matches(':').trim();
            let value = Some(value.as_str());

            if AREA.contains(&label) {
                parameters.area = parse_area(value);
            } else if LIVING_AREA.contains(&label) {
                parameters.living_area = parse_area(value);
            } else if KITCHEN_AREA.contains(&label) {
                parameters.kitchen_area = parse_area(value);
            } else if ROOMS.contains(&label) {
                parameters.rooms = parse_leading_integer(value);
            } else if FLOOR.contains(&label) {
                parameters.floor = parse_leading_integer(value);
            } else if TOTAL_FLOOR.contains(&label) {
                parameters.total_floor = parse_leading_integer(value);
            } else if !IGNORED.contains(&label) {
                parameters.details.extend(value.map(str::to_string));
            }
        }
        parameters
    }
}

impl ScraperTrait for OlxScraper {
    fn detect_boundary(&self, markup: Option<&str>) -> Option<u32> {
        let document = html::document(markup)?;
        let counter = html::select_text(document.root_element(), &self.counter)?;
        let digits: String = COUNT
            .find(&counter)?
            .as_str()
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        digits.parse().ok()
    }

    fn enumerate_page(&self, markup: Option<&str>) -> Vec<Summary> {
        let Some(document) = html::document(markup) else {
            return Vec::new();
        };

        // Promoted cards carry tracking fragments like "#a8d8c1;promoted"
        let mut urls: Vec<&str> = document
            .select(&self.card_link)
            .filter_map(|link| link.value().attr("href"))
            .filter_map(|href| href.split(['#', '?']).next())
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .collect();
        urls.dedup();

        info!("Found {} OLX offer cards", urls.len());
        urls.into_iter().map(Summary::new).collect()
    }

    fn extract_offer(&self, offer: Option<&Offer>) -> Option<Flat> {
        let (url, markup) = offer?.parts()?;
        let document = Html::parse_document(markup);
        let root = document.root_element();

        let Some(price) = html::select_text(root, &self.price) else {
            debug!("No price block on {}, offer is gone", url);
            return None;
        };
        let (price, currency) = parse_price(&price)?;
        let Some(published) = self.parse_published(root) else {
            debug!("No publication date on {}", url);
            return None;
        };
        let parameters = self.parse_parameters(root);

        Some(Flat {
            url: url.to_string(),
            avatar: root
                .select(&self.avatar)
                .next()
                .and_then(|img| html::attr(img, &["src", "data-src"]))
                .map(str::to_string),
            published,
            location: self.parse_point(root),
            price,
            currency: currency.filter(|c| *c != self.default_currency),
            area: parameters.area,
            living_area: parameters.living_area,
            kitchen_area: parameters.kitchen_area,
            rooms: parameters.rooms,
            floor: parameters.floor,
            total_floor: parameters.total_floor,
            ceiling_height: None,
            details: parameters.details,
        })
    }

    fn source(&self) -> Source {
        Source::Olx
    }
}
