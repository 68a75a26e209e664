pub mod adapter;

pub use adapter::{FetchStrategy, SourceAdapter};

#[cfg(test)]
pub use adapter::MockSourceAdapter;
