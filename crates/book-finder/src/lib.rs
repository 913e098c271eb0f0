//! Book finder library.
//!
//! Searches the Google Books API by category and language, accumulates
//! paginated results with deduplication and exhaustion detection, and
//! discovers popular categories from a sample of results.

pub mod accumulator;
pub mod api;
pub mod catalog;
pub mod discovery;
pub mod retail;
pub mod session;
pub mod trigger;

#[cfg(test)]
mod test_support;

pub use accumulator::{PageOutcome, PageRequest, Query, ResultAccumulator, FETCH_ERROR_MESSAGE};
pub use api::{GoogleBooksClient, SearchBackend, SearchRequest};
pub use catalog::{CatalogSource, CategoryCatalog};
pub use discovery::{rank_categories, CategoryDiscoverer};
pub use retail::RetailLinkBuilder;
pub use session::SearchSession;
pub use trigger::ScrollMetrics;
