use crate::models::{Flat, Source};
use crate::scrapers::types::{Offer, Summary};

/// Common contract for all marketplace scrapers.
///
/// The three stages mirror how a crawl walks a marketplace: learn where
/// pagination ends, turn each listing page into stubs, then turn each stub
/// merged with its detail page into a flat. Every stage is pure and total:
/// malformed input produces `None` or an empty `Vec`.
pub trait ScraperTrait: Send + Sync {
    /// Read the pagination boundary marker off a listing page
    fn detect_boundary(&self, markup: Option<&str>) -> Option<u32>;

    /// Extract one stub per listing card, in document order
    fn enumerate_page(&self, markup: Option<&str>) -> Vec<Summary>;

    /// Build a flat from a stub merged with its detail page
    fn extract_offer(&self, offer: Option<&Offer>) -> Option<Flat>;

    /// Marketplace served by this scraper
    fn source(&self) -> Source;
}
