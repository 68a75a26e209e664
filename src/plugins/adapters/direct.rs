use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::models::{SearchQuery, SourceResult, SourceTag};
use crate::plugins::traits::{FetchStrategy, SourceAdapter};
use crate::utils::error::Result;
use crate::utils::identity::IdentityPool;

use super::SourceProfile;

/// Adapter for storefronts that serve their listings in the initial HTML.
pub struct DirectFetchAdapter {
    profile: SourceProfile,
    client: Client,
    identities: IdentityPool,
}

impl DirectFetchAdapter {
    pub fn new(profile: SourceProfile, identities: IdentityPool, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        Ok(Self {
            profile,
            client,
            identities,
        })
    }

    pub fn profile(&self) -> &SourceProfile {
        &self.profile
    }

    async fn fetch_page(&self, url: &str) -> Result<Option<String>> {
        let identity = self.identities.pick();
        tracing::debug!(source = %self.profile.source, url, user_agent = %identity.user_agent, "Fetching search page");

        let response = self
            .client
            .get(url)
            .headers(identity.browser_headers())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(source = %self.profile.source, %status, "Search page request was not successful");
            return Ok(None);
        }

        Ok(Some(response.text().await?))
    }
}

#[async_trait]
impl SourceAdapter for DirectFetchAdapter {
    fn source(&self) -> SourceTag {
        self.profile.source
    }

    fn strategy(&self) -> FetchStrategy {
        FetchStrategy::Direct
    }

    async fn fetch_and_extract(&self, query: &SearchQuery) -> Result<SourceResult> {
        let source = self.profile.source;
        let url = self.profile.search_url(query);

        let html = match self.fetch_page(&url).await {
            Ok(Some(html)) => html,
            Ok(None) => return Ok(SourceResult::empty(source)),
            Err(e) if e.is_transport() => {
                tracing::warn!(source = %source, "Search page request failed: {}", e);
                return Ok(SourceResult::empty(source));
            }
            Err(e) => return Err(e),
        };

        let products = self.profile.extract_listing(&html);
        Ok(SourceResult::new(source, products))
    }
}
