use serde::{Deserialize, Serialize};

use super::product::{PlainProduct, ProductRecord, SourceTag};

/// Records produced by one adapter call, in page order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceResult {
    source: SourceTag,
    products: Vec<ProductRecord>,
    count: usize,
}

impl SourceResult {
    pub fn new(source: SourceTag, products: Vec<ProductRecord>) -> Self {
        let count = products.len();
        Self {
            source,
            products,
            count,
        }
    }

    pub fn empty(source: SourceTag) -> Self {
        Self::new(source, Vec::new())
    }

    pub fn source(&self) -> SourceTag {
        self.source
    }

    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Merged outcome of one query across every configured source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateResult {
    query: String,
    products: Vec<ProductRecord>,
    total_found: usize,
    source_counts: Vec<(SourceTag, usize)>,
}

impl AggregateResult {
    /// Concatenates per-source results in source priority order, whatever
    /// order they arrived in.
    pub fn merge(query: impl Into<String>, mut results: Vec<SourceResult>) -> Self {
        results.sort_by_key(|result| result.source);

        let source_counts = results.iter().map(|r| (r.source, r.count)).collect();
        let products: Vec<ProductRecord> = results.into_iter().flat_map(|r| r.products).collect();

        Self {
            query: query.into(),
            total_found: products.len(),
            products,
            source_counts,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    pub fn total_found(&self) -> usize {
        self.total_found
    }

    pub fn source_counts(&self) -> &[(SourceTag, usize)] {
        &self.source_counts
    }

    pub fn count_for(&self, source: SourceTag) -> usize {
        self.source_counts
            .iter()
            .find(|(tag, _)| *tag == source)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// No source returned anything. A valid outcome, not a failure.
    pub fn is_empty(&self) -> bool {
        self.total_found == 0
    }

    pub fn into_products(self) -> Vec<ProductRecord> {
        self.products
    }

    pub fn to_report(&self) -> SearchReport {
        SearchReport {
            query: self.query.clone(),
            products: self.products.iter().map(ProductRecord::to_plain).collect(),
            total_found: self.total_found,
            amazon_count: self.count_for(SourceTag::Amazon),
            flipkart_count: self.count_for(SourceTag::Flipkart),
        }
    }
}

/// Serializable shape handed to display layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReport {
    pub query: String,
    pub products: Vec<PlainProduct>,
    pub total_found: usize,
    pub amazon_count: usize,
    pub flipkart_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldOutcome;

    fn record(name: &str, source: SourceTag) -> ProductRecord {
        ProductRecord {
            name: name.to_string(),
            price: FieldOutcome::Found("₹499".to_string()),
            rating: FieldOutcome::Missing,
            reviews: FieldOutcome::Missing,
            source,
            link: None,
            image: None,
        }
    }

    #[test]
    fn test_source_result_count_matches_products() {
        let result = SourceResult::new(
            SourceTag::Amazon,
            vec![record("a", SourceTag::Amazon), record("b", SourceTag::Amazon)],
        );
        assert_eq!(result.count(), 2);
        assert!(!result.is_empty());
        assert!(SourceResult::empty(SourceTag::Flipkart).is_empty());
    }

    #[test]
    fn test_merge_uses_source_priority_not_arrival_order() {
        let flipkart = SourceResult::new(SourceTag::Flipkart, vec![record("f1", SourceTag::Flipkart)]);
        let amazon = SourceResult::new(
            SourceTag::Amazon,
            vec![record("a1", SourceTag::Amazon), record("a2", SourceTag::Amazon)],
        );

        let aggregate = AggregateResult::merge("mouse", vec![flipkart, amazon]);
        let names: Vec<&str> = aggregate.products().iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, vec!["a1", "a2", "f1"]);
        assert_eq!(aggregate.total_found(), 3);
        assert_eq!(aggregate.count_for(SourceTag::Amazon), 2);
        assert_eq!(aggregate.count_for(SourceTag::Flipkart), 1);
    }

    #[test]
    fn test_merge_invariant_holds_for_empty_results() {
        let aggregate = AggregateResult::merge(
            "mouse",
            vec![SourceResult::empty(SourceTag::Amazon), SourceResult::empty(SourceTag::Flipkart)],
        );

        assert!(aggregate.is_empty());
        let sum: usize = aggregate.source_counts().iter().map(|(_, c)| c).sum();
        assert_eq!(aggregate.total_found(), sum);
        assert_eq!(aggregate.total_found(), aggregate.products().len());
    }

    #[test]
    fn test_report_shape() {
        let aggregate = AggregateResult::merge(
            "mouse",
            vec![SourceResult::new(SourceTag::Flipkart, vec![record("f1", SourceTag::Flipkart)])],
        );
        let json = serde_json::to_value(aggregate.to_report()).unwrap();

        assert_eq!(json["query"], "mouse");
        assert_eq!(json["total_found"], 1);
        assert_eq!(json["amazon_count"], 0);
        assert_eq!(json["flipkart_count"], 1);
        assert_eq!(json["products"][0]["rating"], "No rating");
    }
}
