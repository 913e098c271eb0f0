//! Google Books API client implementation.
//!
//! This module provides the [`SearchBackend`] seam and a reqwest-based
//! implementation for the public volumes endpoint.

pub mod client;
pub mod types;

pub use client::{GoogleBooksClient, SearchBackend};
pub use types::*;
