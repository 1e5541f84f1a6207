pub mod config;
pub mod error;
pub mod types;

pub use config::GreenoraConfig;
pub use error::{GreenoraError, Result};
pub use types::*;
