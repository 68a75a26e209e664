use std::sync::Arc;
use std::time::Duration;

use product_scout::normalize::{self, SortOrder};
use product_scout::{Orchestrator, SearchQuery, SourceTag};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

async fn flipkart_server(body: String, delay: Duration) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "wireless mouse"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .set_delay(delay),
        )
        .mount(&server)
        .await;
    server
}

fn query() -> SearchQuery {
    SearchQuery::new("wireless mouse").unwrap()
}

#[tokio::test]
async fn test_both_sources_contribute_up_to_ten() -> anyhow::Result<()> {
    let server = flipkart_server(flipkart_results_page(8), Duration::ZERO).await;

    let orchestrator = Orchestrator::new(Duration::from_secs(10))
        .with_adapter(Arc::new(flipkart_adapter(&server, Duration::from_secs(5))))
        .with_adapter(Arc::new(amazon_adapter(StaticRenderer::serving(amazon_results_page(7)))));

    let aggregate = orchestrator.search(&query()).await;

    assert_eq!(aggregate.total_found(), 10);
    assert_eq!(aggregate.count_for(SourceTag::Amazon), 5);
    assert_eq!(aggregate.count_for(SourceTag::Flipkart), 5);
    assert!(aggregate.products()[..5].iter().all(|p| p.source == SourceTag::Amazon));
    assert!(aggregate.products()[5..].iter().all(|p| p.source == SourceTag::Flipkart));

    let report = aggregate.to_report();
    assert_eq!(report.amazon_count + report.flipkart_count, report.total_found);
    assert_eq!(report.products.len(), report.total_found);

    println!("✓ Merged {} products from two sources", report.total_found);
    Ok(())
}

#[tokio::test]
async fn test_direct_timeout_does_not_affect_rendered_source() -> anyhow::Result<()> {
    // The direct request times out long before the server answers
    let server = flipkart_server(flipkart_results_page(5), Duration::from_secs(3)).await;

    let orchestrator = Orchestrator::new(Duration::from_secs(10))
        .with_adapter(Arc::new(amazon_adapter(StaticRenderer::serving(amazon_results_page(3)))))
        .with_adapter(Arc::new(flipkart_adapter(&server, Duration::from_millis(300))));

    let aggregate = orchestrator.search(&query()).await;

    assert_eq!(aggregate.total_found(), 3);
    assert_eq!(aggregate.count_for(SourceTag::Amazon), 3);
    assert_eq!(aggregate.count_for(SourceTag::Flipkart), 0);
    Ok(())
}

#[tokio::test]
async fn test_render_failure_does_not_affect_direct_source() -> anyhow::Result<()> {
    let server = flipkart_server(flipkart_results_page(4), Duration::ZERO).await;

    let orchestrator = Orchestrator::new(Duration::from_secs(10))
        .with_adapter(Arc::new(amazon_adapter(StaticRenderer::failing())))
        .with_adapter(Arc::new(flipkart_adapter(&server, Duration::from_secs(5))));

    let aggregate = orchestrator.search(&query()).await;

    assert_eq!(aggregate.total_found(), 4);
    assert_eq!(aggregate.count_for(SourceTag::Amazon), 0);
    Ok(())
}

#[tokio::test]
async fn test_slow_renderer_is_cut_off_by_adapter_timeout() -> anyhow::Result<()> {
    let server = flipkart_server(flipkart_results_page(3), Duration::ZERO).await;

    let orchestrator = Orchestrator::new(Duration::from_millis(500))
        .with_adapter(Arc::new(amazon_adapter(
            StaticRenderer::serving(amazon_results_page(5)).with_delay(Duration::from_secs(3)),
        )))
        .with_adapter(Arc::new(flipkart_adapter(&server, Duration::from_secs(5))));

    let started = std::time::Instant::now();
    let aggregate = orchestrator.search(&query()).await;

    // Returns on the adapter budget while the render is still sleeping
    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(aggregate.count_for(SourceTag::Amazon), 0);
    assert_eq!(aggregate.total_found(), 3);
    Ok(())
}

#[tokio::test]
async fn test_all_sources_empty_is_a_valid_outcome() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let orchestrator = Orchestrator::new(Duration::from_secs(10))
        .with_adapter(Arc::new(amazon_adapter(StaticRenderer::serving("<html><body></body></html>"))))
        .with_adapter(Arc::new(flipkart_adapter(&server, Duration::from_secs(5))));

    let aggregate = orchestrator.search(&query()).await;

    assert!(aggregate.is_empty());
    assert_eq!(aggregate.source_counts().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_sorted_and_filtered_view_of_results() -> anyhow::Result<()> {
    let server = flipkart_server(flipkart_results_page(3), Duration::ZERO).await;

    let orchestrator = Orchestrator::new(Duration::from_secs(10))
        .with_adapter(Arc::new(amazon_adapter(StaticRenderer::serving(amazon_results_page(3)))))
        .with_adapter(Arc::new(flipkart_adapter(&server, Duration::from_secs(5))));

    let aggregate = orchestrator.search(&query()).await;

    // Flipkart prices are 290, 330, 370; Amazon 350, 400, 450
    let cheapest_first = normalize::sorted(aggregate.products(), SortOrder::PriceLowToHigh);
    let prices: Vec<&str> = cheapest_first
        .iter()
        .filter_map(|p| p.price.as_found())
        .collect();
    assert_eq!(prices, vec!["₹290", "₹330", "₹350", "₹370", "₹400", "₹450"]);

    let flipkart_only = normalize::filter_sources(aggregate.products(), &[SourceTag::Flipkart]);
    assert_eq!(flipkart_only.len(), 3);
    assert!(flipkart_only[0].link.as_deref().unwrap().starts_with(&server.uri()));
    Ok(())
}
