pub mod error;
pub mod identity;

pub use error::{AppError, Result};
pub use identity::{ClientIdentity, IdentityPool};
