pub mod config;
pub mod dates;
pub mod error;
pub mod types;

pub use config::NewsLensConfig;
pub use dates::normalize_published;
pub use error::{NewsLensError, Result};
pub use types::*;
