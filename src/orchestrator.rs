use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::models::{AggregateResult, SearchQuery, SourceResult, SourceTag};
use crate::plugins::adapters::{DirectFetchAdapter, RenderedFetchAdapter, SourceProfile};
use crate::plugins::traits::SourceAdapter;
use crate::scraper::{ChromeRenderer, RenderSettings};
use crate::utils::error::Result;
use crate::utils::identity::IdentityPool;

/// Runs every configured source for a query and merges what comes back.
///
/// A source that errors, panics or overruns its time budget contributes an
/// empty result; the others are unaffected.
///
/// The time budget bounds how long `search` waits, not how long a rendered
/// fetch runs. Blocking render work cannot be cancelled, so an overrunning
/// browser session keeps going in the background until its own page-ready
/// timeout, settle delay and scroll steps finish, and is torn down then.
#[derive(Clone)]
pub struct Orchestrator {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    adapter_timeout: Duration,
}

impl Orchestrator {
    pub fn new(adapter_timeout: Duration) -> Self {
        Self {
            adapters: Vec::new(),
            adapter_timeout,
        }
    }

    pub fn with_adapter(mut self, adapter: Arc<dyn SourceAdapter>) -> Self {
        self.adapters.push(adapter);
        self
    }

    /// Wires the built-in adapters for `sources`, skipping any disabled in
    /// configuration. Amazon is rendered, Flipkart is fetched directly.
    pub fn from_config(config: &AppConfig, sources: &[SourceTag]) -> Result<Self> {
        let scraper = &config.scraper;
        let identities = IdentityPool::new(
            scraper
                .user_agents
                .iter()
                .filter(|ua| !ua.trim().is_empty())
                .cloned()
                .collect(),
        );
        let mut orchestrator = Self::new(Duration::from_secs(scraper.adapter_timeout));

        for &source in sources {
            let source_config = config.source(source);
            if !source_config.enabled {
                info!(source = %source, "Source disabled in configuration, skipping");
                continue;
            }

            let profile = SourceProfile::for_source(source)?.with_origin(&source_config.base_url)?;

            let adapter: Arc<dyn SourceAdapter> = match source {
                SourceTag::Amazon => Arc::new(RenderedFetchAdapter::new(
                    profile,
                    ChromeRenderer::new(RenderSettings::from(scraper)),
                    identities.clone(),
                )),
                SourceTag::Flipkart => Arc::new(DirectFetchAdapter::new(
                    profile,
                    identities.clone(),
                    Duration::from_secs(scraper.request_timeout),
                )?),
            };
            orchestrator = orchestrator.with_adapter(adapter);
        }

        Ok(orchestrator)
    }

    pub fn sources(&self) -> Vec<SourceTag> {
        self.adapters.iter().map(|adapter| adapter.source()).collect()
    }

    pub async fn search(&self, query: &SearchQuery) -> AggregateResult {
        info!(query = %query, sources = self.adapters.len(), "Starting search");

        let handles: Vec<_> = self
            .adapters
            .iter()
            .map(|adapter| {
                let adapter = Arc::clone(adapter);
                let query = query.clone();
                let limit = self.adapter_timeout;
                let source = adapter.source();
                let handle = tokio::spawn(async move {
                    tokio::time::timeout(limit, adapter.fetch_and_extract(&query)).await
                });
                (source, handle)
            })
            .collect();

        let results = join_all(handles.into_iter().map(|(source, handle)| async move {
            let result = match handle.await {
                Ok(Ok(Ok(result))) => Some(result),
                Ok(Ok(Err(e))) => {
                    warn!(source = %source, "Adapter failed: {}", e);
                    None
                }
                Ok(Err(_)) => {
                    warn!(source = %source, "Adapter timed out after {:?}", self.adapter_timeout);
                    None
                }
                Err(e) => {
                    warn!(source = %source, "Adapter task aborted: {}", e);
                    None
                }
            };

            match result {
                Some(result) if result.source() == source => {
                    metrics::counter!("scout_source_records_total", "source" => source.as_str())
                        .increment(result.count() as u64);
                    info!(source = %source, count = result.count(), "Source finished");
                    result
                }
                Some(result) => {
                    warn!(source = %source, reported = %result.source(), "Adapter reported a foreign source, discarding");
                    metrics::counter!("scout_source_failures_total", "source" => source.as_str()).increment(1);
                    SourceResult::empty(source)
                }
                None => {
                    metrics::counter!("scout_source_failures_total", "source" => source.as_str()).increment(1);
                    SourceResult::empty(source)
                }
            }
        }))
        .await;

        let aggregate = AggregateResult::merge(query.as_str(), results);
        info!(query = %query, total = aggregate.total_found(), "Search complete");
        aggregate
    }
}
