//! Extraction layer turning OLX and DOM.RIA listing pages into one
//! normalized flat record.

pub mod config;
pub mod error;
pub mod models;
pub mod scrapers;

pub use error::{AppError, Result};
pub use models::{Flat, Location, Source};
