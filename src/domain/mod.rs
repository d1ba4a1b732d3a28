//! Domain layer - core types and errors.
//!
//! This layer contains pure domain models and error types
//! without any external dependencies (filesystem, HTML, CSV).

pub mod config;
pub mod error;
pub mod models;

pub use config::{AppConfig, BatchConfig, ExtractConfig, PathConfig};
pub use error::{AppError, Result};
pub use models::{ClearOutcome, Record, Resource, Row, StoreState, DATA_FIELD};
