use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use url::Url;

use crate::models::SourceTag;
use crate::utils::identity::USER_AGENTS;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scraper: ScraperConfig,
    pub sources: SourcesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Direct-fetch HTTP timeout, seconds
    pub request_timeout: u64,
    /// Rendered-fetch wait for the document body, seconds
    pub page_ready_timeout: u64,
    pub settle_delay_ms: u64,
    pub scroll_steps: u32,
    pub scroll_distance_px: u32,
    pub scroll_pause_ms: u64,
    /// Outer bound on any single adapter call, seconds
    pub adapter_timeout: u64,
    pub window_width: u32,
    pub window_height: u32,
    pub headless: bool,
    pub chrome_path: Option<String>,
    pub user_agents: Vec<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            request_timeout: 30,
            page_ready_timeout: 10,
            settle_delay_ms: 3000,
            scroll_steps: 2,
            scroll_distance_px: 800,
            scroll_pause_ms: 1500,
            adapter_timeout: 90,
            window_width: 1920,
            window_height: 1080,
            headless: true,
            chrome_path: None,
            user_agents: USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub amazon: SourceConfig,
    pub flipkart: SourceConfig,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            amazon: SourceConfig::for_source(SourceTag::Amazon),
            flipkart: SourceConfig::for_source(SourceTag::Flipkart),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub base_url: String,
    pub enabled: bool,
}

impl SourceConfig {
    pub fn for_source(source: SourceTag) -> Self {
        Self {
            base_url: source.default_origin().to_string(),
            enabled: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start with built-in defaults
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::with_name("config/default").required(false))
            // Add environment-specific config
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add local config (ignored by git)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix "SCOUT__"
            .add_source(Environment::with_prefix("SCOUT").separator("__"))
            .build()?;

        Self::finish(s.try_deserialize()?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::from(path))
            .build()?;

        Self::finish(s.try_deserialize()?)
    }

    fn finish(mut config: AppConfig) -> Result<Self, ConfigError> {
        // Add Chrome path from environment if not set
        if config.scraper.chrome_path.is_none() {
            config.scraper.chrome_path = env::var("CHROME_PATH").ok();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn source(&self, source: SourceTag) -> &SourceConfig {
        match source {
            SourceTag::Amazon => &self.sources.amazon,
            SourceTag::Flipkart => &self.sources.flipkart,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let scraper = &self.scraper;

        if scraper.request_timeout == 0 {
            return Err(ConfigError::Message("Scraper request_timeout must be greater than 0".into()));
        }

        if scraper.page_ready_timeout == 0 {
            return Err(ConfigError::Message("Scraper page_ready_timeout must be greater than 0".into()));
        }

        if scraper.adapter_timeout == 0 {
            return Err(ConfigError::Message("Scraper adapter_timeout must be greater than 0".into()));
        }

        if scraper.window_width == 0 || scraper.window_height == 0 {
            return Err(ConfigError::Message("Scraper window size must be non-zero".into()));
        }

        if scraper.scroll_steps > 0 && scraper.scroll_distance_px == 0 {
            return Err(ConfigError::Message("Scraper scroll_distance_px must be greater than 0 when scrolling".into()));
        }

        if scraper.user_agents.iter().all(|ua| ua.trim().is_empty()) {
            return Err(ConfigError::Message("Scraper user_agents must contain at least one entry".into()));
        }

        for source in SourceTag::ALL {
            let base_url = &self.source(source).base_url;
            match Url::parse(base_url) {
                Ok(url) if url.has_host() => {}
                _ => {
                    return Err(ConfigError::Message(format!(
                        "Invalid base URL for {}: {}",
                        source, base_url
                    )));
                }
            }
        }

        Ok(())
    }
}
