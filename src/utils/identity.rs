//! Client identity shaping for outbound fetches.
//!
//! Everything random about how the scout presents itself to a storefront
//! lives here, so the extraction code stays deterministic.

use rand::Rng;
use reqwest::header::{self, HeaderMap, HeaderValue};

pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:122.0) Gecko/20100101 Firefox/122.0",
];

/// The identity presented for a single fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub user_agent: String,
}

impl ClientIdentity {
    /// Browser-like request headers for a plain HTTP fetch.
    ///
    /// `Accept-Encoding` is left to reqwest so responses are decoded transparently.
    pub fn browser_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(value) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(header::USER_AGENT, value);
        }
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(header::DNT, HeaderValue::from_static("1"));
        headers.insert(header::UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
        headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
        headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
        headers.insert("sec-fetch-user", HeaderValue::from_static("?1"));

        headers
    }
}

/// A fixed pool of user agents to draw identities from.
#[derive(Debug, Clone)]
pub struct IdentityPool {
    user_agents: Vec<String>,
}

impl IdentityPool {
    pub fn new(user_agents: Vec<String>) -> Self {
        Self { user_agents }
    }

    /// Pool that always yields the same identity. Used by tests.
    pub fn fixed(user_agent: &str) -> Self {
        Self::new(vec![user_agent.to_string()])
    }

    pub fn pick(&self) -> ClientIdentity {
        let user_agent = if self.user_agents.is_empty() {
            USER_AGENTS[0].to_string()
        } else {
            self.user_agents[rand::rng().random_range(0..self.user_agents.len())].clone()
        };

        ClientIdentity { user_agent }
    }

    pub fn len(&self) -> usize {
        self.user_agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.user_agents.is_empty()
    }
}

impl Default for IdentityPool {
    fn default() -> Self {
        Self::new(USER_AGENTS.iter().map(|ua| ua.to_string()).collect())
    }
}
