pub mod amazon;
pub mod direct;
pub mod flipkart;
pub mod rendered;

pub use direct::DirectFetchAdapter;
pub use rendered::RenderedFetchAdapter;

use rust_decimal::Decimal;
use scraper::{ElementRef, Html};
use std::str::FromStr;
use url::Url;

use crate::element_finder::{
    collapsed_text, find_currency_amount, flattened_text, raw_name_preview, ContainerLocator,
    FieldExtractor, RuleChain,
};
use crate::models::{FieldOutcome, ProductRecord, SearchQuery, SourceTag, UNKNOWN_PRODUCT};
use crate::utils::error::{AppError, Result};

/// Accepted records kept per adapter call, in document order.
pub const MAX_RECORDS_PER_SOURCE: usize = 5;

/// Which fields a container must yield before it counts as a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptancePolicy {
    RequireName,
    NameOrPrice,
}

impl AcceptancePolicy {
    fn accepts(&self, name: Option<&str>, price: &FieldOutcome) -> bool {
        match self {
            AcceptancePolicy::RequireName => name.is_some(),
            AcceptancePolicy::NameOrPrice => name.is_some() || !price.is_missing(),
        }
    }
}

/// Everything that makes one storefront different from another: its rules,
/// thresholds and acceptance policy. Fetching is left to the adapters.
#[derive(Debug, Clone)]
pub struct SourceProfile {
    pub source: SourceTag,
    pub containers: ContainerLocator,
    pub name: RuleChain,
    pub price: RuleChain,
    pub rating: RuleChain,
    pub reviews: RuleChain,
    pub link: RuleChain,
    pub image: RuleChain,
    pub acceptance: AcceptancePolicy,
    /// Use flattened container text when both name and price are absent
    pub raw_text_fallback: bool,
    /// Appended to ratings that are a bare number, e.g. "4.3" -> "4.3 stars"
    pub rating_suffix: Option<&'static str>,
    extractor: FieldExtractor,
}

impl SourceProfile {
    /// Builds the built-in profile for `source`, rooted at its public origin.
    pub fn for_source(source: SourceTag) -> Result<Self> {
        match source {
            SourceTag::Amazon => amazon::profile(),
            SourceTag::Flipkart => flipkart::profile(),
        }
    }

    pub(crate) fn builder(source: SourceTag, containers: ContainerLocator) -> ProfileBuilder {
        ProfileBuilder::new(source, containers)
    }

    pub fn origin(&self) -> &Url {
        self.extractor.origin()
    }

    /// Re-roots the profile at another origin (a mirror or a local test server).
    pub fn with_origin(mut self, origin: &str) -> Result<Self> {
        let url = Url::parse(origin).map_err(|e| AppError::Validation(format!(
            "Invalid origin for {}: {} ({})",
            self.source, origin, e
        )))?;
        self.extractor = FieldExtractor::new(url);
        Ok(self)
    }

    pub fn search_url(&self, query: &SearchQuery) -> String {
        self.source.search_url_at(self.origin().as_str(), query.as_str())
    }

    /// Runs container location, field extraction, acceptance and the cap over
    /// one HTML snapshot. Pure: the same input always yields the same records.
    pub fn extract_listing(&self, html: &str) -> Vec<ProductRecord> {
        let document = Html::parse_document(html);
        let containers = self.containers.locate(&document);

        if containers.is_empty() {
            tracing::info!(source = %self.source, "No product containers found on page");
            return Vec::new();
        }

        let mut records = Vec::new();
        for (index, container) in containers.into_iter().enumerate() {
            if records.len() == MAX_RECORDS_PER_SOURCE {
                break;
            }

            match self.extract_record(container) {
                Some(record) => records.push(record),
                None => {
                    tracing::debug!(source = %self.source, index, "Container rejected by acceptance policy");
                }
            }
        }

        records
    }

    fn extract_record(&self, container: ElementRef<'_>) -> Option<ProductRecord> {
        let extractor = &self.extractor;

        let mut name = extractor.extract(container, &self.name);
        let mut price = FieldOutcome::from_option(extractor.extract(container, &self.price));
        let rating = extractor.extract(container, &self.rating);
        let reviews = extractor.extract(container, &self.reviews);
        // An unusable href only costs the record its link
        let link = extractor.extract_link(container, &self.link).unwrap_or_else(|e| {
            tracing::warn!(source = %self.source, "Dropping product link: {}", e);
            None
        });
        let image = extractor.extract(container, &self.image);

        if self.raw_text_fallback && name.is_none() && price.is_missing() {
            let text = flattened_text(container);
            if !text.is_empty() {
                name = Some(raw_name_preview(&text));
                price = match find_currency_amount(&text) {
                    Some(amount) => FieldOutcome::Found(amount),
                    None => FieldOutcome::Unidentified,
                };
                tracing::debug!(source = %self.source, "Used raw-text fallback for container");
            }
        }

        if !self.acceptance.accepts(name.as_deref(), &price) {
            tracing::trace!(
                source = %self.source,
                text = %collapsed_text(container),
                "Container yielded no usable fields"
            );
            return None;
        }

        Some(ProductRecord {
            name: name.unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
            price,
            rating: FieldOutcome::from_option(rating.map(|r| self.decorate_rating(r))),
            reviews: FieldOutcome::from_option(reviews),
            source: self.source,
            link,
            image,
        })
    }

    fn decorate_rating(&self, rating: String) -> String {
        match self.rating_suffix {
            Some(suffix) if Decimal::from_str(&rating).is_ok() => format!("{} {}", rating, suffix),
            _ => rating,
        }
    }
}

/// Assembles a [`SourceProfile`] from selector lists.
pub(crate) struct ProfileBuilder {
    source: SourceTag,
    containers: ContainerLocator,
    name: Vec<&'static str>,
    price: Vec<&'static str>,
    rating: Vec<&'static str>,
    reviews: Vec<&'static str>,
    link: Vec<&'static str>,
    image: Vec<&'static str>,
    acceptance: AcceptancePolicy,
    raw_text_fallback: bool,
    rating_suffix: Option<&'static str>,
}

impl ProfileBuilder {
    fn new(source: SourceTag, containers: ContainerLocator) -> Self {
        Self {
            source,
            containers,
            name: Vec::new(),
            price: Vec::new(),
            rating: Vec::new(),
            reviews: Vec::new(),
            link: Vec::new(),
            image: Vec::new(),
            acceptance: AcceptancePolicy::RequireName,
            raw_text_fallback: false,
            rating_suffix: None,
        }
    }

    pub fn name(mut self, rules: &[&'static str]) -> Self {
        self.name = rules.to_vec();
        self
    }

    pub fn price(mut self, rules: &[&'static str]) -> Self {
        self.price = rules.to_vec();
        self
    }

    pub fn rating(mut self, rules: &[&'static str]) -> Self {
        self.rating = rules.to_vec();
        self
    }

    pub fn reviews(mut self, rules: &[&'static str]) -> Self {
        self.reviews = rules.to_vec();
        self
    }

    pub fn link(mut self, rules: &[&'static str]) -> Self {
        self.link = rules.to_vec();
        self
    }

    pub fn image(mut self, rules: &[&'static str]) -> Self {
        self.image = rules.to_vec();
        self
    }

    pub fn acceptance(mut self, acceptance: AcceptancePolicy) -> Self {
        self.acceptance = acceptance;
        self
    }

    pub fn raw_text_fallback(mut self, enabled: bool) -> Self {
        self.raw_text_fallback = enabled;
        self
    }

    pub fn rating_suffix(mut self, suffix: &'static str) -> Self {
        self.rating_suffix = Some(suffix);
        self
    }

    pub fn build(self) -> Result<SourceProfile> {
        use crate::element_finder::FieldKind;

        let origin = Url::parse(self.source.default_origin())
            .map_err(|e| AppError::Internal(format!("Bad built-in origin: {}", e)))?;

        Ok(SourceProfile {
            source: self.source,
            containers: self.containers,
            name: RuleChain::new(FieldKind::Name, &self.name)?,
            price: RuleChain::new(FieldKind::Price, &self.price)?,
            rating: RuleChain::new(FieldKind::Rating, &self.rating)?,
            reviews: RuleChain::new(FieldKind::Reviews, &self.reviews)?,
            link: RuleChain::new(FieldKind::Link, &self.link)?,
            image: RuleChain::new(FieldKind::Image, &self.image)?,
            acceptance: self.acceptance,
            raw_text_fallback: self.raw_text_fallback,
            rating_suffix: self.rating_suffix,
            extractor: FieldExtractor::new(origin),
        })
    }
}
