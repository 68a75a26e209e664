pub mod adapters;
pub mod traits;

pub use adapters::{DirectFetchAdapter, RenderedFetchAdapter, SourceProfile};
pub use traits::{FetchStrategy, SourceAdapter};
