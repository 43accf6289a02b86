pub mod config;
pub mod error;
pub mod types;

pub use config::NotewiseConfig;
pub use error::{NotewiseError, Result};
pub use types::*;
