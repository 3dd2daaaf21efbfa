use serde::{Deserialize, Serialize};

/// Listing card stub produced by page enumeration.
///
/// Only `url` is guaranteed. Marketplaces that render thumbnails and areas
/// on the card fill the rest, and those values win over the detail page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub living_area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kitchen_area: Option<f64>,
}

impl Summary {
    /// Stub carrying nothing but the offer URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Attach fetched detail markup, producing the offer extraction input
    pub fn merge(self, markup: impl Into<String>) -> Offer {
        Offer {
            url: Some(self.url),
            markup: Some(markup.into()),
            avatar: self.avatar,
            area: self.area,
            living_area: self.living_area,
            kitchen_area: self.kitchen_area,
        }
    }
}

/// A stub merged with its detail page markup.
///
/// Every key is optional because the record travels through external
/// collaborators as a loose JSON object; extraction rejects records that
/// lack `url` or `markup`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Offer {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub markup: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub living_area: Option<f64>,
    #[serde(default)]
    pub kitchen_area: Option<f64>,
}

impl Offer {
    /// Borrow `url` and `markup` together, if both are present
    pub fn parts(&self) -> Option<(&str, &str)> {
        Some((self.url.as_deref()?, self.markup.as_deref()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_carries_card_fields() {
        let summary = Summary {
            url: "https://dom.ria.com/uk/realty-1.html".to_string(),
            avatar: Some("https://cdn.riastatic.com/1.webp".to_string()),
            area: Some(44.5),
            living_area: None,
            kitchen_area: Some(21.0),
        };
        let offer = summary.merge("<html></html>");
        assert_eq!(offer.parts(), Some(("https://dom.ria.com/uk/realty-1.html", "<html></html>")));
        assert_eq!(offer.area, Some(44.5));
        assert_eq!(offer.living_area, None);
        assert_eq!(offer.kitchen_area, Some(21.0));
    }

    #[test]
    fn test_parts_requires_url_and_markup() {
        let offer: Offer = serde_json::from_str(r#"{"url": "xxx"}"#).unwrap();
        assert_eq!(offer.parts(), None);
        assert_eq!(Offer::default().parts(), None);
    }

    #[test]
    fn test_summary_skips_empty_fields() {
        let json = serde_json::to_value(Summary::new("https://www.olx.ua/a.html")).unwrap();
        assert_eq!(json, serde_json::json!({"url": "https://www.olx.ua/a.html"}));
    }
}
