use serde::{Deserialize, Serialize};
use std::fmt;
use url::form_urlencoded;

pub const PRICE_MISSING: &str = "Not available";
pub const PRICE_UNIDENTIFIED: &str = "Not identified";
pub const RATING_MISSING: &str = "No rating";
pub const REVIEWS_MISSING: &str = "No reviews";
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// Storefronts the scout knows how to search, in merge priority order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceTag {
    Amazon,
    Flipkart,
}

impl SourceTag {
    pub const ALL: [SourceTag; 2] = [SourceTag::Amazon, SourceTag::Flipkart];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Amazon => "Amazon",
            SourceTag::Flipkart => "Flipkart",
        }
    }

    pub fn default_origin(&self) -> &'static str {
        match self {
            SourceTag::Amazon => "https://www.amazon.in",
            SourceTag::Flipkart => "https://www.flipkart.com",
        }
    }

    // (path, query parameter) of the storefront search page
    fn search_endpoint(&self) -> (&'static str, &'static str) {
        match self {
            SourceTag::Amazon => ("/s", "k"),
            SourceTag::Flipkart => ("/search", "q"),
        }
    }

    /// Search-results URL on the public storefront.
    pub fn search_url(&self, query: &str) -> String {
        self.search_url_at(self.default_origin(), query)
    }

    /// Search-results URL rooted at an arbitrary origin (mirrors, test servers).
    pub fn search_url_at(&self, origin: &str, query: &str) -> String {
        let (path, param) = self.search_endpoint();
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        format!("{}{}?{}={}", origin.trim_end_matches('/'), path, param, encoded)
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of resolving one field of a listing.
///
/// Keeps "nothing there" apart from "something there we could not read", which
/// the sorting layer ranks differently from real values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum FieldOutcome {
    Found(String),
    Unidentified,
    Missing,
}

impl FieldOutcome {
    pub fn from_option(value: Option<String>) -> Self {
        match value {
            Some(text) => FieldOutcome::Found(text),
            None => FieldOutcome::Missing,
        }
    }

    pub fn as_found(&self) -> Option<&str> {
        match self {
            FieldOutcome::Found(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, FieldOutcome::Found(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FieldOutcome::Missing)
    }

    /// Plain text for display, using `missing` as the absent sentinel.
    pub fn display_or(&self, missing: &str) -> String {
        match self {
            FieldOutcome::Found(text) => text.clone(),
            FieldOutcome::Unidentified => PRICE_UNIDENTIFIED.to_string(),
            FieldOutcome::Missing => missing.to_string(),
        }
    }
}

/// One product listing as extracted from a storefront page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub price: FieldOutcome,
    pub rating: FieldOutcome,
    pub reviews: FieldOutcome,
    pub source: SourceTag,
    pub link: Option<String>,
    pub image: Option<String>,
}

impl ProductRecord {
    pub fn to_plain(&self) -> PlainProduct {
        PlainProduct {
            name: self.name.clone(),
            price: self.price.display_or(PRICE_MISSING),
            rating: self.rating.display_or(RATING_MISSING),
            reviews: self.reviews.display_or(REVIEWS_MISSING),
            source: self.source,
            link: self.link.clone(),
            image: self.image.clone(),
        }
    }
}

/// Flat, sentinel-string form of a record for JSON output and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainProduct {
    pub name: String,
    pub price: String,
    pub rating: String,
    pub reviews: String,
    pub source: SourceTag,
    pub link: Option<String>,
    pub image: Option<String>,
}
