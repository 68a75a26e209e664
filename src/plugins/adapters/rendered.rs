use async_trait::async_trait;
use std::sync::Arc;

use crate::models::{SearchQuery, SourceResult, SourceTag};
use crate::plugins::traits::{FetchStrategy, SourceAdapter};
use crate::scraper::PageRenderer;
use crate::utils::error::{AppError, Result};
use crate::utils::identity::IdentityPool;

use super::SourceProfile;

/// Adapter for storefronts that only produce listings after client-side
/// rendering. The whole render and extract cycle runs on the blocking pool.
pub struct RenderedFetchAdapter<R: PageRenderer + 'static> {
    profile: Arc<SourceProfile>,
    renderer: Arc<R>,
    identities: IdentityPool,
}

impl<R: PageRenderer + 'static> RenderedFetchAdapter<R> {
    pub fn new(profile: SourceProfile, renderer: R, identities: IdentityPool) -> Self {
        Self {
            profile: Arc::new(profile),
            renderer: Arc::new(renderer),
            identities,
        }
    }

    pub fn profile(&self) -> &SourceProfile {
        &self.profile
    }
}

#[async_trait]
impl<R: PageRenderer + 'static> SourceAdapter for RenderedFetchAdapter<R> {
    fn source(&self) -> SourceTag {
        self.profile.source
    }

    fn strategy(&self) -> FetchStrategy {
        FetchStrategy::Rendered
    }

    async fn fetch_and_extract(&self, query: &SearchQuery) -> Result<SourceResult> {
        let source = self.profile.source;
        let url = self.profile.search_url(query);
        let identity = self.identities.pick();
        let profile = Arc::clone(&self.profile);
        let renderer = Arc::clone(&self.renderer);

        tracing::debug!(source = %source, url = %url, user_agent = %identity.user_agent, "Rendering search page");

        // Html is !Send, so parsing stays on the blocking thread with the render
        let outcome = tokio::task::spawn_blocking(move || -> Result<SourceResult> {
            let html = renderer.render(&url, &identity)?;
            Ok(SourceResult::new(source, profile.extract_listing(&html)))
        })
        .await
        .map_err(|e| AppError::Internal(format!("Render task for {} failed: {}", source, e)))?;

        match outcome {
            Ok(result) => Ok(result),
            Err(e) if e.is_transport() => {
                tracing::warn!(source = %source, "Rendered fetch failed: {}", e);
                Ok(SourceResult::empty(source))
            }
            Err(e) => Err(e),
        }
    }
}
