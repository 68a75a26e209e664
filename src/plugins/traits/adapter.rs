use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{SearchQuery, SourceResult, SourceTag};
use crate::utils::error::Result;

/// How an adapter obtains the page it extracts from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FetchStrategy {
    /// Headless browser with script execution
    Rendered,
    /// Single plain HTTP GET
    Direct,
}

/// Trait for implementing storefront adapters (one per source)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn source(&self) -> SourceTag;
    fn strategy(&self) -> FetchStrategy;

    /// Fetches one results page for `query` and extracts up to the per-source
    /// cap of accepted records.
    ///
    /// Transport failures are recovered here and surface as an empty result;
    /// an `Err` means something unexpected broke inside the adapter.
    async fn fetch_and_extract(&self, query: &SearchQuery) -> Result<SourceResult>;
}
