use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Marketplace a listing was scraped from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Olx,
    DomRia,
}

impl Source {
    pub fn name(&self) -> &'static str {
        match self {
            Source::Olx => "OLX",
            Source::DomRia => "DOM.RIA",
        }
    }
}

/// Where a flat is: either coordinates or a normalized address line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Point { longitude: f64, latitude: f64 },
    Address(String),
}

/// Core flat data model, identical in shape for every marketplace
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flat {
    pub url: String,
    pub avatar: Option<String>,
    pub published: NaiveDate,
    pub location: Option<Location>,
    pub price: Decimal,
    /// `None` stands for the marketplace's default currency
    pub currency: Option<String>,
    pub area: Option<f64>,
    pub living_area: Option<f64>,
    pub kitchen_area: Option<f64>,
    pub rooms: Option<u32>,
    pub floor: Option<u32>,
    pub total_floor: Option<u32>,
    pub ceiling_height: Option<f64>,
    pub details: Vec<String>,
}

impl Flat {
    /// Whether the floor fits into the building. Records missing either
    /// number are considered consistent.
    pub fn is_consistent(&self) -> bool {
        match (self.floor, self.total_floor) {
            (Some(floor), Some(total)) => floor <= total,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat() -> Flat {
        Flat {
            url: "https://www.olx.ua/obyavlenie/kvartira-IDDqNsA.html".to_string(),
            avatar: None,
            published: NaiveDate::from_ymd_opt(2019, 2, 25).unwrap(),
            location: Some(Location::Point {
                longitude: 37.56492189,
                latitude: 47.13203091,
            }),
            price: Decimal::new(18200, 0),
            currency: None,
            area: Some(46.0),
            living_area: None,
            kitchen_area: Some(6.0),
            rooms: Some(2),
            floor: Some(5),
            total_floor: Some(5),
            ceiling_height: None,
            details: vec![],
        }
    }

    #[test]
    fn test_consistency() {
        let mut flat = flat();
        assert!(flat.is_consistent());
        flat.floor = Some(6);
        assert!(!flat.is_consistent());
        flat.total_floor = None;
        assert!(flat.is_consistent());
    }

    #[test]
    fn test_price_equality_ignores_scale() {
        let mut other = flat();
        other.price = "18200.000".parse().unwrap();
        assert_eq!(flat(), other);
    }

    #[test]
    fn test_location_serialization() {
        let point = serde_json::to_value(&flat().location).unwrap();
        assert_eq!(
            point,
            json!({"point": {"longitude": 37.56492189, "latitude": 47.13203091}})
        );
        let address = serde_json::to_value(Location::Address("Київ".to_string())).unwrap();
        assert_eq!(address, json!({"address": "Київ"}));
    }
}
