//! Shared library for the book finder workspace.
//!
//! This crate provides common functionality used by the finder crate and
//! its binary:
//! - Configuration management and credential resolution
//! - Domain models (books, categories, languages)
//! - Logging infrastructure
//! - Shared error types

pub mod config;
pub mod error;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use config::{Config, Credentials};
pub use error::{FinderError, FinderResult};
pub use logging::LogConfig;
pub use models::*;

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
