pub mod product;
pub mod query;
pub mod result;

// Re-exports for convenience
pub use product::*;
pub use query::*;
pub use result::*;
