//! The selectable category list.

use chrono::{DateTime, Utc};
use shared::{default_categories, CategoryCount, CategoryOption};
use tracing::{info, warn};

/// Where the current list came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Defaults,
    Discovered {
        at: DateTime<Utc>,
        /// Label occurrences counted across the sampled books
        sample_labels: u32,
    },
}

/// Category options offered to the user
///
/// The list is only ever swapped as a whole, so a reader never sees a
/// half-updated set.
#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    options: Vec<CategoryOption>,
    source: CatalogSource,
    generation: u64,
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::new(default_categories())
    }
}

impl CategoryCatalog {
    pub fn new(options: Vec<CategoryOption>) -> Self {
        Self {
            options,
            source: CatalogSource::Defaults,
            generation: 0,
        }
    }

    pub fn options(&self) -> &[CategoryOption] {
        &self.options
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    pub fn get(&self, id: &str) -> Option<&CategoryOption> {
        self.options.iter().find(|o| o.id == id)
    }

    /// Look up by id, or by label ignoring case
    pub fn find(&self, key: &str) -> Option<&CategoryOption> {
        self.get(key).or_else(|| {
            self.options
                .iter()
                .find(|o| o.label.to_lowercase() == key.to_lowercase())
        })
    }

    /// Replace the list with a discovery ranking
    ///
    /// Ids are fresh for every replacement, so ids from an older list never
    /// resolve against the new one. An empty ranking leaves the list alone
    /// and returns false.
    pub fn replace_with_discovered(&mut self, ranked: &[CategoryCount]) -> bool {
        if ranked.is_empty() {
            warn!("Discovery returned no categories, keeping current list");
            return false;
        }

        self.generation += 1;
        let options = ranked
            .iter()
            .enumerate()
            .map(|(idx, c)| CategoryOption::new(format!("cat{}-{}", self.generation, idx), c.label.clone()))
            .collect();

        self.options = options;
        self.source = CatalogSource::Discovered {
            at: Utc::now(),
            sample_labels: ranked.iter().map(|c| c.count).sum(),
        };

        info!(
            generation = self.generation,
            categories = self.options.len(),
            "Category list replaced"
        );
        true
    }
}
