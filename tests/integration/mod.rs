// Integration tests for Product Scout
// These tests drive the real adapters against local fixtures: a canned page
// renderer for the rendered source and a wiremock server for the direct one.

pub mod extraction_tests;
pub mod search_flow_tests;

use std::time::Duration;

use product_scout::{
    plugins::{DirectFetchAdapter, RenderedFetchAdapter, SourceProfile},
    scraper::PageRenderer,
    utils::{AppError, ClientIdentity, IdentityPool},
    SourceTag,
};
use wiremock::MockServer;

pub const TEST_USER_AGENT: &str = "ProductScout-Test/1.0";

/// Serves a fixed document instead of driving a browser.
pub struct StaticRenderer {
    html: Option<String>,
    delay: Duration,
}

impl StaticRenderer {
    pub fn serving(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            delay: Duration::ZERO,
        }
    }

    /// Simulates a browser that never finds the document body.
    pub fn failing() -> Self {
        Self {
            html: None,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl PageRenderer for StaticRenderer {
    fn render(&self, _url: &str, _identity: &ClientIdentity) -> Result<String, AppError> {
        std::thread::sleep(self.delay);
        self.html.clone().ok_or(AppError::Timeout {
            operation: "document body".to_string(),
            seconds: 10,
        })
    }
}

pub fn amazon_adapter(renderer: StaticRenderer) -> RenderedFetchAdapter<StaticRenderer> {
    let profile = SourceProfile::for_source(SourceTag::Amazon).expect("amazon profile");
    RenderedFetchAdapter::new(profile, renderer, IdentityPool::fixed(TEST_USER_AGENT))
}

pub fn flipkart_adapter(server: &MockServer, request_timeout: Duration) -> DirectFetchAdapter {
    let profile = SourceProfile::for_source(SourceTag::Flipkart)
        .and_then(|profile| profile.with_origin(&server.uri()))
        .expect("flipkart profile");
    DirectFetchAdapter::new(profile, IdentityPool::fixed(TEST_USER_AGENT), request_timeout)
        .expect("http client")
}

/// An Amazon results page with `count` complete listings.
pub fn amazon_results_page(count: usize) -> String {
    let items: String = (1..=count)
        .map(|i| {
            format!(
                r#"<div data-asin="B0{i:04}" data-component-type="s-search-result" class="s-result-item s-asin">
                     <img class="s-image" src="https://m.media-amazon.com/images/I/{i}.jpg">
                     <h2><a class="a-link-normal" href="/dp/B0{i:04}"><span class="a-text-normal">Wireless Mouse Model {i}</span></a></h2>
                     <i class="a-icon a-icon-star-small"><span class="a-icon-alt">4.{i} out of 5 stars</span></i>
                     <span class="a-price"><span class="a-offscreen">₹{price}</span></span>
                   </div>"#,
                i = i,
                price = 300 + i * 50
            )
        })
        .collect();

    format!(r#"<html><body><div class="s-main-slot">{}</div></body></html>"#, items)
}

/// A Flipkart results page with `count` product tiles.
pub fn flipkart_results_page(count: usize) -> String {
    let items: String = (1..=count)
        .map(|i| {
            format!(
                r#"<div class="_4ddWXP" data-id="MOU{i}">
                     <a class="s1Q9rs" href="/mouse-{i}/p/itm{i}" title="Flipkart Mouse {i}">Flipkart Mouse {i}</a>
                     <div class="_30jeq3">₹{price}</div>
                     <div class="_3LWZlK">4.{i}</div>
                     <span class="_2_R_DZ">({i},024)</span>
                     <img src="https://rukminim1.flixcart.com/{i}.jpg">
                   </div>"#,
                i = i,
                price = 250 + i * 40
            )
        })
        .collect();

    format!("<html><body><div class=\"_1YokD2\">{}</div></body></html>", items)
}
