use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

use crate::utils::error::{AppError, Result};

/// At most this many price markers are considered by the container heuristic.
pub const MAX_PRICE_MARKERS: usize = 10;
/// Ancestors with this much stripped text or less are treated as chrome.
pub const MIN_CONTAINER_TEXT: usize = 20;
/// Character length of the raw-text name preview.
pub const RAW_NAME_PREVIEW: usize = 100;

static CURRENCY_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[₹$€£¥]\s?\d[\d,]*(?:\.\d+)?").expect("currency amount pattern"));

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Container,
    Name,
    Price,
    Rating,
    Reviews,
    Link,
    Image,
}

impl FieldKind {
    /// Attribute read instead of text content, for URL-valued fields.
    pub fn attribute(&self) -> Option<&'static str> {
        match self {
            FieldKind::Link => Some("href"),
            FieldKind::Image => Some("src"),
            _ => None,
        }
    }
}

/// One candidate way of finding a field: a CSS selector tagged with its field.
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    field: FieldKind,
    expression: String,
    selector: Selector,
}

impl ExtractionRule {
    pub fn new(field: FieldKind, expression: &str) -> Result<Self> {
        let selector = Selector::parse(expression).map_err(|e| {
            tracing::debug!("Rejected selector '{}': {:?}", expression, e);
            AppError::InvalidSelector {
                selector: expression.to_string(),
            }
        })?;

        Ok(Self {
            field,
            expression: expression.to_string(),
            selector,
        })
    }

    pub fn field(&self) -> FieldKind {
        self.field
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// First non-empty value this rule yields inside `node`.
    fn resolve(&self, node: ElementRef<'_>) -> Option<String> {
        node.select(&self.selector).find_map(|element| match self.field.attribute() {
            Some(attr) => element
                .value()
                .attr(attr)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
            None => {
                let text = collapsed_text(element);
                (!text.is_empty()).then_some(text)
            }
        })
    }
}

/// Ordered candidate rules for a single field. Earlier rules win.
#[derive(Debug, Clone)]
pub struct RuleChain {
    field: FieldKind,
    rules: Vec<ExtractionRule>,
}

impl RuleChain {
    pub fn new(field: FieldKind, expressions: &[&str]) -> Result<Self> {
        let rules = expressions
            .iter()
            .map(|expression| ExtractionRule::new(field, expression))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { field, rules })
    }

    pub fn field(&self) -> FieldKind {
        self.field
    }

    pub fn rules(&self) -> &[ExtractionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Finds the nodes of a page that look like individual listings.
#[derive(Debug, Clone)]
pub struct ContainerLocator {
    rules: RuleChain,
    min_matches: usize,
    price_marker: Option<ExtractionRule>,
}

impl ContainerLocator {
    /// `min_matches` is the smallest match count a rule needs to be trusted;
    /// anything below it is assumed to have hit page chrome.
    pub fn new(rules: RuleChain, min_matches: usize, price_marker: Option<ExtractionRule>) -> Self {
        Self {
            rules,
            min_matches: min_matches.max(1),
            price_marker,
        }
    }

    pub fn min_matches(&self) -> usize {
        self.min_matches
    }

    pub fn locate<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        for rule in self.rules.rules() {
            let matches: Vec<ElementRef<'a>> = document.select(rule.selector()).collect();
            if matches.len() >= self.min_matches {
                tracing::debug!(
                    selector = rule.expression(),
                    count = matches.len(),
                    "Container rule accepted"
                );
                return matches;
            }
            tracing::trace!(
                selector = rule.expression(),
                count = matches.len(),
                "Container rule below threshold"
            );
        }

        match &self.price_marker {
            Some(marker) => {
                let containers = Self::locate_by_price_marker(marker, document);
                tracing::debug!(
                    marker = marker.expression(),
                    count = containers.len(),
                    "Container rules exhausted, used price-marker heuristic"
                );
                containers
            }
            None => Vec::new(),
        }
    }

    fn locate_by_price_marker<'a>(marker: &ExtractionRule, document: &'a Html) -> Vec<ElementRef<'a>> {
        let mut seen = HashSet::new();
        let mut containers = Vec::new();

        for price in document.select(marker.selector()).take(MAX_PRICE_MARKERS) {
            // parent, grandparent, great-grandparent
            let ancestors: Vec<ElementRef<'a>> = price
                .ancestors()
                .filter_map(ElementRef::wrap)
                .take(3)
                .collect();

            let candidate = ancestors
                .iter()
                .rev()
                .find(|ancestor| stripped_text_len(**ancestor) > MIN_CONTAINER_TEXT);

            if let Some(container) = candidate {
                if seen.insert(container.id()) {
                    containers.push(*container);
                }
            }
        }

        containers
    }
}

/// Resolves individual fields inside a container.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    origin: Url,
}

impl FieldExtractor {
    pub fn new(origin: Url) -> Self {
        Self { origin }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn extract(&self, container: ElementRef<'_>, chain: &RuleChain) -> Option<String> {
        chain.rules().iter().find_map(|rule| rule.resolve(container))
    }

    /// Like [`extract`](Self::extract) but resolves the value against the
    /// source origin. Fails if the href cannot form a URL at all.
    pub fn extract_link(&self, container: ElementRef<'_>, chain: &RuleChain) -> Result<Option<String>> {
        match self.extract(container, chain) {
            Some(href) => absolutize(&self.origin, &href).map(Some),
            None => Ok(None),
        }
    }
}

pub fn absolutize(origin: &Url, href: &str) -> Result<String> {
    origin
        .join(href)
        .map(|url| url.to_string())
        .map_err(|e| AppError::Parse {
            message: format!("Unresolvable link '{}': {}", href, e),
        })
}

/// Element text with all whitespace runs collapsed to single spaces.
pub fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text nodes trimmed and joined by single spaces.
pub fn flattened_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn stripped_text_len(element: ElementRef<'_>) -> usize {
    element.text().map(|part| part.trim().chars().count()).sum()
}

/// Bounded preview of raw container text used as a stand-in name.
pub fn raw_name_preview(text: &str) -> String {
    if text.chars().count() > RAW_NAME_PREVIEW {
        let preview: String = text.chars().take(RAW_NAME_PREVIEW).collect();
        format!("{}...", preview)
    } else {
        text.to_string()
    }
}

/// First currency-symbol-prefixed amount in free text, e.g. `₹1,299`.
pub fn find_currency_amount(text: &str) -> Option<String> {
    CURRENCY_AMOUNT.find(text).map(|m| m.as_str().to_string())
}
