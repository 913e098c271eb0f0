//! Category discovery.
//!
//! Samples one broad page of results and ranks the category labels found on
//! it by how many books carry them. The ranking replaces the built-in
//! category list so the selector reflects what the API actually returns.

use crate::api::{OrderBy, SearchBackend, SearchRequest, Volume};
use crate::accumulator::PRINT_TYPE;
use shared::config::DiscoveryConfig;
use shared::{CategoryCount, FinderResult};
use std::collections::HashMap;
use tracing::{error, info};

/// Discovery runner
#[derive(Debug, Clone)]
pub struct CategoryDiscoverer {
    term: String,
    sample_size: u32,
    max_categories: Option<usize>,
}

impl CategoryDiscoverer {
    pub fn new(term: impl Into<String>, sample_size: u32) -> Self {
        Self {
            term: term.into(),
            sample_size,
            max_categories: None,
        }
    }

    pub fn from_config(config: &DiscoveryConfig) -> Self {
        Self {
            term: config.term.clone(),
            sample_size: config.sample_size,
            max_categories: config.max_categories,
        }
    }

    /// The sample request: relevance ordered, no language restriction
    pub fn request(&self) -> SearchRequest {
        SearchRequest {
            term: self.term.clone(),
            print_type: PRINT_TYPE.to_string(),
            order_by: OrderBy::Relevance,
            max_results: self.sample_size,
            start_index: 0,
            lang_restrict: None,
        }
    }

    /// Run discovery against `backend`
    ///
    /// Failures are logged and returned; callers keep their current list.
    pub async fn discover<B>(&self, backend: &B) -> FinderResult<Vec<CategoryCount>>
    where
        B: SearchBackend + ?Sized,
    {
        info!(term = %self.term, sample_size = self.sample_size, "Starting category discovery");

        let volumes = backend.search(&self.request()).await.map_err(|e| {
            error!(error = %e, "Category discovery failed");
            e
        })?;

        let mut ranked = rank_categories(&volumes);
        if let Some(max) = self.max_categories {
            ranked.truncate(max);
        }

        info!(
            sampled = volumes.len(),
            categories = ranked.len(),
            top = ?ranked.first().map(|c| c.label.as_str()),
            "Category discovery complete"
        );

        Ok(ranked)
    }
}

/// Count category labels across `volumes`, most frequent first
///
/// Ties keep the order in which labels were first seen.
pub fn rank_categories(volumes: &[Volume]) -> Vec<CategoryCount> {
    let mut ranked: Vec<CategoryCount> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for label in volumes.iter().flat_map(|v| v.categories()) {
        match positions.get(label.as_str()) {
            Some(&idx) => ranked[idx].count += 1,
            None => {
                positions.insert(label.as_str(), ranked.len());
                ranked.push(CategoryCount {
                    label: label.clone(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable, so equal counts stay in first-seen order
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}
