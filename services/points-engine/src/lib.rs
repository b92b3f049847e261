pub mod config;
pub mod errors;
pub mod models;
pub mod handlers;
pub mod validation;

pub use config::Config;
pub use errors::{PointsEngineError, Result};
