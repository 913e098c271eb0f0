//! Search session: the state a host drives.
//!
//! Holds the category catalog, the user's selection and language, and the
//! result accumulator. Toggling categories and changing the language never
//! fetch; only [`SearchSession::start_search`] and the scroll trigger do.

use crate::accumulator::{PageOutcome, PageRequest, Query, ResultAccumulator};
use crate::api::{SearchBackend, Volume};
use crate::catalog::CategoryCatalog;
use crate::discovery::CategoryDiscoverer;
use shared::{BookItem, CategoryCount, Config, FinderResult};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct SearchSession {
    catalog: CategoryCatalog,
    selection: Vec<String>,
    language: String,
    results: ResultAccumulator,
}

impl SearchSession {
    pub fn new(catalog: CategoryCatalog, results: ResultAccumulator, language: impl Into<String>) -> Self {
        Self {
            catalog,
            selection: Vec::new(),
            language: language.into(),
            results,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            CategoryCatalog::default(),
            ResultAccumulator::from_config(&config.search),
            config.search.default_language.clone(),
        )
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    /// Selected category ids, in selection order
    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.iter().any(|s| s == id)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn results(&self) -> &ResultAccumulator {
        &self.results
    }

    pub fn items(&self) -> &[BookItem] {
        self.results.items()
    }

    /// Add or remove a category from the selection
    ///
    /// Returns whether the category is selected afterwards. Unknown ids are
    /// ignored.
    pub fn toggle_category(&mut self, id: &str) -> bool {
        if let Some(pos) = self.selection.iter().position(|s| s == id) {
            self.selection.remove(pos);
            return false;
        }
        if self.catalog.get(id).is_none() {
            warn!(id, "Ignoring toggle of unknown category");
            return false;
        }
        self.selection.push(id.to_string());
        true
    }

    pub fn set_language(&mut self, code: impl Into<String>) {
        self.language = code.into();
    }

    /// Snapshot of the current selection and language
    pub fn current_query(&self) -> Query {
        let categories = self
            .selection
            .iter()
            .filter_map(|id| self.catalog.get(id).cloned())
            .collect();
        Query::new(categories, self.language.clone())
    }

    /// Reset the results for the current selection and dispatch page one
    pub fn start_search(&mut self) -> Option<PageRequest> {
        let query = self.current_query();
        info!(
            language = %query.language,
            categories = ?query.categories.iter().map(|c| c.label.as_str()).collect::<Vec<_>>(),
            "Starting search"
        );
        self.results.reset(query);
        self.results.begin_fetch()
    }

    /// Scroll-proximity trigger
    ///
    /// Dispatches the next page only when `near_bottom` is set and the
    /// accumulator is neither loading nor exhausted. Safe to call as often
    /// as the host likes.
    pub fn on_scroll(&mut self, near_bottom: bool) -> Option<PageRequest> {
        if !near_bottom {
            return None;
        }
        let page = self.results.begin_fetch();
        if page.is_none() {
            debug!(
                loading = self.results.is_loading(),
                exhausted = self.results.is_exhausted(),
                "Scroll signal ignored"
            );
        }
        page
    }

    /// Deliver the response for a dispatched page
    pub fn complete(&mut self, page: &PageRequest, result: FinderResult<Vec<Volume>>) -> PageOutcome {
        self.results.complete_fetch(page, result)
    }

    /// Apply a discovery result to the catalog
    ///
    /// On failure or an empty ranking the current list stays. Selected ids
    /// that are gone after a replacement are dropped.
    pub fn apply_discovery(&mut self, result: FinderResult<Vec<CategoryCount>>) -> bool {
        let ranked = match result {
            Ok(ranked) => ranked,
            Err(e) => {
                warn!(error = %e, "Keeping current categories after failed discovery");
                return false;
            }
        };
        if !self.catalog.replace_with_discovered(&ranked) {
            return false;
        }
        let catalog = &self.catalog;
        self.selection.retain(|id| catalog.get(id).is_some());
        true
    }

    /// Start a search and wait for its first page
    pub async fn search<B>(&mut self, backend: &B) -> Option<PageOutcome>
    where
        B: SearchBackend + ?Sized,
    {
        let page = self.start_search()?;
        let result = backend.search(&page.request).await;
        Some(self.complete(&page, result))
    }

    /// Scroll trigger that also runs the dispatched request
    pub async fn load_more<B>(&mut self, backend: &B, near_bottom: bool) -> Option<PageOutcome>
    where
        B: SearchBackend + ?Sized,
    {
        let page = self.on_scroll(near_bottom)?;
        let result = backend.search(&page.request).await;
        Some(self.complete(&page, result))
    }

    /// Run discovery and apply it
    pub async fn refresh_categories<B>(&mut self, discoverer: &CategoryDiscoverer, backend: &B) -> bool
    where
        B: SearchBackend + ?Sized,
    {
        let result = discoverer.discover(backend).await;
        self.apply_discovery(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{page, volume, ScriptedBackend};
    use shared::FinderError;

    fn session() -> SearchSession {
        SearchSession::from_config(&Config::default())
    }

    #[test]
    fn test_toggle_category() {
        let mut session = session();
        assert!(session.toggle_category("science"));
        assert!(session.toggle_category("history"));
        assert_eq!(session.selection(), ["science", "history"]);

        assert!(!session.toggle_category("science"));
        assert_eq!(session.selection(), ["history"]);

        assert!(!session.toggle_category("cooking"));
        assert_eq!(session.selection(), ["history"]);
    }

    #[test]
    fn test_input_changes_do_not_fetch() {
        let mut session = session();
        session.toggle_category("fiction");
        session.set_language("en");
        assert!(!session.results().is_loading());
        assert!(session.on_scroll(true).is_none());
    }

    #[test]
    fn test_query_uses_selected_labels() {
        let mut session = session();
        session.toggle_category("history");
        session.toggle_category("science");
        session.set_language("fr");

        let page = session.start_search().unwrap();
        assert_eq!(page.request.term, "Historia OR Ciencia");
        assert_eq!(page.request.lang_restrict.as_deref(), Some("fr"));
    }

    #[test]
    fn test_scroll_while_loading_dispatches_once() {
        let mut session = session();
        let first = session.start_search().unwrap();
        session.complete(&first, Ok(page("a", 0..40, "es")));

        let mut dispatched = Vec::new();
        dispatched.extend(session.on_scroll(true));
        dispatched.extend(session.on_scroll(true));
        assert_eq!(dispatched.len(), 1);
        assert_eq!(dispatched[0].request.start_index, 40);
    }

    #[test]
    fn test_scroll_not_near_bottom_is_ignored() {
        let mut session = session();
        let first = session.start_search().unwrap();
        session.complete(&first, Ok(page("a", 0..40, "es")));
        assert!(session.on_scroll(false).is_none());
        assert!(!session.results().is_loading());
    }

    #[test]
    fn test_exhausted_ignores_repeated_scroll() {
        let mut session = session();
        let first = session.start_search().unwrap();
        session.complete(&first, Ok(page("a", 0..12, "es")));

        for _ in 0..5 {
            assert!(session.on_scroll(true).is_none());
        }
        assert_eq!(session.items().len(), 12);
    }

    #[test]
    fn test_new_search_discards_late_response() {
        let mut session = session();
        session.toggle_category("fiction");
        let old = session.start_search().unwrap();

        session.toggle_category("fiction");
        session.toggle_category("science");
        let fresh = session.start_search().unwrap();

        assert_eq!(session.complete(&old, Ok(page("old", 0..40, "es"))), PageOutcome::Stale);
        session.complete(&fresh, Ok(page("new", 0..2, "es")));

        assert_eq!(session.items().len(), 2);
        assert!(session.items().iter().all(|b| b.id.starts_with("new")));
    }

    #[test]
    fn test_discovery_replaces_and_prunes_selection() {
        let mut session = session();
        session.toggle_category("fiction");

        let applied = session.apply_discovery(Ok(vec![CategoryCount {
            label: "Juvenile Fiction".to_string(),
            count: 4,
        }]));

        assert!(applied);
        assert!(session.selection().is_empty());
        assert_eq!(session.catalog().options()[0].label, "Juvenile Fiction");
    }

    #[test]
    fn test_failed_discovery_keeps_categories() {
        let mut session = session();
        session.toggle_category("fiction");

        assert!(!session.apply_discovery(Err(FinderError::transport("offline"))));
        assert_eq!(session.catalog().options().len(), 4);
        assert_eq!(session.selection(), ["fiction"]);
    }

    #[tokio::test]
    async fn test_search_then_load_more() {
        let backend = ScriptedBackend::new(vec![
            Ok(page("a", 0..40, "es")),
            Ok(page("b", 0..7, "es")),
        ]);
        let mut session = session();

        session.search(&backend).await;
        assert_eq!(session.items().len(), 40);

        assert!(session.load_more(&backend, true).await.is_some());
        assert!(session.results().is_exhausted());
        assert!(session.load_more(&backend, true).await.is_none());

        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].term, "books");
    }

    #[tokio::test]
    async fn test_refresh_categories() {
        let backend = ScriptedBackend::new(vec![Ok(vec![
            volume("1", "es", &["Fiction", "Poetry"]),
            volume("2", "en", &["Fiction"]),
        ])]);
        let mut session = session();
        let discoverer = CategoryDiscoverer::new("libros", 40);

        assert!(session.refresh_categories(&discoverer, &backend).await);
        let labels: Vec<_> = session
            .catalog()
            .options()
            .iter()
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(labels, ["Fiction", "Poetry"]);
    }
}
