pub mod config;
pub mod element_finder;
pub mod models;
pub mod normalize;
pub mod orchestrator;
pub mod plugins;
pub mod report;
pub mod scraper;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use models::{AggregateResult, ProductRecord, SearchQuery, SearchReport, SourceTag};
pub use orchestrator::Orchestrator;
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
