//! Sortable keys for free-text prices and ratings, plus the filtering and
//! ordering helpers display layers build on.
//!
//! Nothing here feeds back into extraction; records are never modified.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::models::{FieldOutcome, ProductRecord, SourceTag};

static FIRST_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("number pattern"));

/// Currency symbols and thousands separators stripped before reading a price.
const PRICE_NOISE: &[char] = &['₹', '$', '€', '£', '¥', ','];

/// Ordering key for a field that may be absent or unreadable.
///
/// Real values always sort ahead of `Unparseable`, which sorts ahead of
/// `Absent`, whichever direction the values themselves are ordered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NumericKey {
    Value(Decimal),
    Unparseable,
    Absent,
}

impl NumericKey {
    pub fn value(&self) -> Option<Decimal> {
        match self {
            NumericKey::Value(v) => Some(*v),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            NumericKey::Value(_) => 0,
            NumericKey::Unparseable => 1,
            NumericKey::Absent => 2,
        }
    }

    /// Compares two keys with values ordered ascending or descending and
    /// non-values always last.
    pub fn cmp_directed(&self, other: &Self, descending: bool) -> Ordering {
        match (self, other) {
            (NumericKey::Value(a), NumericKey::Value(b)) if descending => b.cmp(a),
            (NumericKey::Value(a), NumericKey::Value(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

fn first_number(text: &str) -> Option<Decimal> {
    FIRST_NUMBER
        .find(text)
        .and_then(|m| Decimal::from_str(m.as_str()).ok())
}

fn key_for(outcome: &FieldOutcome, parse: impl Fn(&str) -> Option<Decimal>) -> NumericKey {
    match outcome {
        FieldOutcome::Found(text) => parse(text).map_or(NumericKey::Unparseable, NumericKey::Value),
        FieldOutcome::Unidentified => NumericKey::Unparseable,
        FieldOutcome::Missing => NumericKey::Absent,
    }
}

/// Parses a price such as `"₹1,299"` or `"$19.99"`.
pub fn parse_price(text: &str) -> Option<Decimal> {
    let cleaned: String = text.chars().filter(|c| !PRICE_NOISE.contains(c)).collect();
    first_number(&cleaned)
}

/// Parses a rating such as `"4.3 out of 5 stars"` or `"4.1 stars"`.
pub fn parse_rating(text: &str) -> Option<Decimal> {
    first_number(text)
}

pub fn price_key(record: &ProductRecord) -> NumericKey {
    key_for(&record.price, parse_price)
}

pub fn rating_key(record: &ProductRecord) -> NumericKey {
    key_for(&record.rating, parse_rating)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    PriceLowToHigh,
    PriceHighToLow,
    RatingHighToLow,
}

impl SortOrder {
    fn compare(&self, a: &ProductRecord, b: &ProductRecord) -> Ordering {
        match self {
            SortOrder::PriceLowToHigh => price_key(a).cmp_directed(&price_key(b), false),
            SortOrder::PriceHighToLow => price_key(a).cmp_directed(&price_key(b), true),
            SortOrder::RatingHighToLow => rating_key(a).cmp_directed(&rating_key(b), true),
        }
    }
}

/// Stable sort: records with equal keys keep their merged order.
pub fn sort_products(products: &mut [ProductRecord], order: SortOrder) {
    products.sort_by(|a, b| order.compare(a, b));
}

pub fn sorted(products: &[ProductRecord], order: SortOrder) -> Vec<ProductRecord> {
    let mut copy = products.to_vec();
    sort_products(&mut copy, order);
    copy
}

/// Records whose source is one of `sources`, in their original order.
pub fn filter_sources<'a>(products: &'a [ProductRecord], sources: &[SourceTag]) -> Vec<&'a ProductRecord> {
    products
        .iter()
        .filter(|record| sources.contains(&record.source))
        .collect()
}

/// The record's own link, or a storefront search for its name when none was
/// extracted.
pub fn link_or_search(record: &ProductRecord) -> String {
    match &record.link {
        Some(link) => link.clone(),
        None => record.source.search_url(&record.name),
    }
}
