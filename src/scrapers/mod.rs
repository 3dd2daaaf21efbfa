pub mod dom_ria;
pub mod html;
pub mod numeric;
pub mod olx;
pub mod traits;
pub mod types;

pub use dom_ria::{normalize_address, normalize_ceiling_height, DomRiaScraper};
pub use olx::OlxScraper;
pub use traits::ScraperTrait;
pub use types::{Offer, Summary};

use crate::config::Config;
use crate::error::Result;
use crate::models::Source;

/// Build the scraper serving `source` from its configuration section
pub fn scraper_for(source: Source, config: &Config) -> Result<Box<dyn ScraperTrait>> {
    Ok(match source {
        Source::Olx => Box::new(OlxScraper::new(&config.olx)?),
        Source::DomRia => Box::new(DomRiaScraper::new(&config.dom_ria)?),
    })
}
