use chrono::NaiveDate;
use flat_scout::config::OlxConfig;
use flat_scout::scrapers::{OlxScraper, ScraperTrait, Summary};
use flat_scout::{Flat, Location};
use rust_decimal::Decimal;

const PAGE: &str = include_str!("fixtures/olx_page.html");
const OFFER0: &str = include_str!("fixtures/olx_offer0.html");
const OFFER1: &str = include_str!("fixtures/olx_offer1.html");
const REMOVED: &str = include_str!("fixtures/olx_removed.html");

const URL0: &str = "https://www.olx.ua/obyavlenie/prodam-2k-kvartiru-v-tsentre-1000-melochey-IDDqNsA.html";
const URL1: &str = "https://www.olx.ua/obyavlenie/2-komnatnaya-kvartira-74-metra-v-novopecherskoy-vezhe-po-ul-kikvidze-41-IDCqiKk.html";

fn scraper() -> OlxScraper {
    OlxScraper::new(&OlxConfig::default()).unwrap()
}

#[test]
fn test_detect_boundary() {
    let scraper = scraper();
    assert_eq!(scraper.detect_boundary(Some(PAGE)), Some(500));
}

#[test]
fn test_detect_boundary_invalid() {
    let scraper = scraper();
    assert_eq!(scraper.detect_boundary(None), None);
    assert_eq!(scraper.detect_boundary(Some("")), None);
    assert_eq!(scraper.detect_boundary(Some("https://example.org/")), None);
    assert_eq!(scraper.detect_boundary(Some(OFFER0)), None);
}

#[test]
fn test_enumerate_page() {
    let scraper = scraper();
    assert_eq!(
        scraper.enumerate_page(Some(PAGE)),
        vec![
            Summary::new("https://www.olx.ua/obyavlenie/1komnatnaya-s-remontom-IDCGxWq.html"),
            Summary::new(
                "https://www.olx.ua/obyavlenie/prodam-2-komnatnaya-kvartira-alekseevka-ul-klochkovskaya-nedorogo-IDDHmS1.html"
            ),
            Summary::new(
                "https://www.olx.ua/obyavlenie/1k-kv-ul-pogranichnaya-4-slobodskaya-13500-IDwTGfi.html"
            ),
            Summary::new("https://www.olx.ua/obyavlenie/3-komnatnaya-na-kirova-IDE8Nh7.html"),
        ]
    );
}

#[test]
fn test_enumerate_page_invalid() {
    let scraper = scraper();
    assert!(scraper.enumerate_page(None).is_empty());
    assert!(scraper.enumerate_page(Some("")).is_empty());
    assert!(scraper.enumerate_page(Some("<html><body>503</body></html>")).is_empty());
}

#[test]
fn test_extract_offer() {
    let scraper = scraper();
    let offer = Summary::new(URL0).merge(OFFER0);
    assert_eq!(
        scraper.extract_offer(Some(&offer)),
        Some(Flat {
            url: URL0.to_string(),
            avatar: Some(
                "https://apollo-ireland.akamaized.net:443/v1/files/atbs10v8fzy43-UA/image;s=644x461"
                    .to_string()
            ),
            published: NaiveDate::from_ymd_opt(2019, 2, 25).unwrap(),
            location: Some(Location::Point {
                longitude: 37.56492189,
                latitude: 47.13203091,
            }),
            price: "18200.000".parse::<Decimal>().unwrap(),
            currency: None,
            area: Some(46.0),
            living_area: None,
            kitchen_area: Some(6.0),
            rooms: Some(2),
            floor: Some(5),
            total_floor: Some(5),
            ceiling_height: None,
            details: vec![],
        })
    );
}

#[test]
fn test_extract_offer_with_currency_and_details() {
    let scraper = scraper();
    let offer = Summary::new(URL1).merge(OFFER1);
    let flat = scraper.extract_offer(Some(&offer)).unwrap();

    assert_eq!(flat.price, Decimal::new(1_850_000, 0));
    assert_eq!(flat.currency.as_deref(), Some("грн."));
    assert_eq!(flat.published, NaiveDate::from_ymd_opt(2019, 2, 27).unwrap());
    assert_eq!(
        flat.location,
        Some(Location::Point {
            longitude: 30.55172926,
            latitude: 50.4070917,
        })
    );
    assert_eq!(flat.area, Some(74.0));
    assert_eq!(flat.kitchen_area, Some(28.0));
    assert_eq!((flat.rooms, flat.floor, flat.total_floor), (Some(2), Some(8), Some(26)));
    assert_eq!(
        flat.details,
        vec![
            "На етапі будівництва",
            "Моноліт",
            "Роздільне планування",
            "Роздільний санвузол",
            "Власна котельня",
            "Щойно споруджено",
            "Меблі відсутні",
        ]
    );
    assert!(flat.is_consistent());
}

#[test]
fn test_extract_offer_is_idempotent() {
    let scraper = scraper();
    let offer = Summary::new(URL1).merge(OFFER1);
    assert_eq!(scraper.extract_offer(Some(&offer)), scraper.extract_offer(Some(&offer)));
}

#[test]
fn test_extract_offer_removed() {
    let scraper = scraper();
    let offer = Summary::new(URL0).merge(REMOVED);
    assert_eq!(scraper.extract_offer(Some(&offer)), None);
}

#[test]
fn test_extract_offer_invalid() {
    let scraper = scraper();
    let offer: flat_scout::scrapers::Offer = serde_json::from_str(r#"{"url": "xxx"}"#).unwrap();
    assert_eq!(scraper.extract_offer(Some(&offer)), None);
    assert_eq!(scraper.extract_offer(None), None);
    assert_eq!(scraper.extract_offer(Some(&Summary::new(URL0).merge(""))), None);
}
