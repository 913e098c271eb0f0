//! Paginated result accumulation.
//!
//! A [`ResultAccumulator`] owns the result set for one query. Each page is
//! dispatched in two halves so the host can run the request however it
//! likes: [`ResultAccumulator::begin_fetch`] hands out a [`PageRequest`] and
//! [`ResultAccumulator::complete_fetch`] merges the response. The `loading`
//! flag guarantees at most one request in flight, and the epoch stamped on
//! each request lets responses from before a `reset` be dropped.

use crate::api::{OrderBy, SearchBackend, SearchRequest, Volume};
use shared::config::SearchConfig;
use shared::{BookItem, CategoryOption, FinderResult};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Message shown to the user whenever a page fails to load
pub const FETCH_ERROR_MESSAGE: &str = "Could not load more books. Please try again.";

/// Print type requested for every search
pub const PRINT_TYPE: &str = "books";

/// The query one accumulation session runs against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Selected categories, in selection order
    pub categories: Vec<CategoryOption>,
    /// Requested language code
    pub language: String,
}

impl Query {
    pub fn new(categories: Vec<CategoryOption>, language: impl Into<String>) -> Self {
        Self {
            categories,
            language: language.into(),
        }
    }

    /// Search term: selected labels joined with OR, or `fallback` when none
    pub fn search_term(&self, fallback: &str) -> String {
        if self.categories.is_empty() {
            return fallback.to_string();
        }
        self.categories
            .iter()
            .map(|c| c.label.as_str())
            .collect::<Vec<_>>()
            .join(" OR ")
    }
}

/// A dispatched page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Accumulator generation the request belongs to
    pub epoch: u64,
    pub request: SearchRequest,
}

/// What a completed fetch did to the accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// Response merged
    Appended { accepted: usize, exhausted: bool },
    /// Request failed; `last_error` is set and the same offset can be retried
    Failed,
    /// Response belonged to a superseded query, or no fetch was in flight,
    /// and was discarded
    Stale,
}

/// Accumulated, deduplicated results for one query
#[derive(Debug)]
pub struct ResultAccumulator {
    page_size: u32,
    fallback_term: String,
    query: Option<Query>,
    items: Vec<BookItem>,
    seen_ids: HashSet<String>,
    next_offset: u32,
    exhausted: bool,
    loading: bool,
    last_error: Option<String>,
    epoch: u64,
}

impl ResultAccumulator {
    pub fn new(page_size: u32, fallback_term: impl Into<String>) -> Self {
        Self {
            page_size,
            fallback_term: fallback_term.into(),
            query: None,
            items: Vec::new(),
            seen_ids: HashSet::new(),
            next_offset: 0,
            exhausted: false,
            loading: false,
            last_error: None,
            epoch: 0,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.page_size, config.fallback_term.clone())
    }

    /// Start a new accumulation session for `query`
    ///
    /// Does not fetch. Any request still in flight becomes stale.
    pub fn reset(&mut self, query: Query) {
        self.epoch += 1;
        self.items.clear();
        self.seen_ids.clear();
        self.next_offset = 0;
        self.exhausted = false;
        self.loading = false;
        self.last_error = None;

        debug!(
            epoch = self.epoch,
            language = %query.language,
            categories = query.categories.len(),
            "Accumulator reset"
        );
        self.query = Some(query);
    }

    /// True when a call to [`begin_fetch`](Self::begin_fetch) would dispatch
    pub fn can_fetch(&self) -> bool {
        self.query.is_some() && !self.loading && !self.exhausted
    }

    /// Dispatch the next page, or `None` if a fetch is in flight, results are
    /// exhausted, or no query has been set
    pub fn begin_fetch(&mut self) -> Option<PageRequest> {
        if !self.can_fetch() {
            return None;
        }
        let query = self.query.as_ref()?;

        let request = SearchRequest {
            term: query.search_term(&self.fallback_term),
            print_type: PRINT_TYPE.to_string(),
            order_by: OrderBy::Newest,
            max_results: self.page_size,
            start_index: self.next_offset,
            lang_restrict: Some(query.language.clone()),
        };
        self.loading = true;

        debug!(
            epoch = self.epoch,
            offset = self.next_offset,
            term = %request.term,
            "Dispatching page fetch"
        );

        Some(PageRequest {
            epoch: self.epoch,
            request,
        })
    }

    /// Merge the response to a request previously returned by `begin_fetch`
    pub fn complete_fetch(
        &mut self,
        page: &PageRequest,
        result: FinderResult<Vec<Volume>>,
    ) -> PageOutcome {
        if page.epoch != self.epoch {
            debug!(
                request_epoch = page.epoch,
                epoch = self.epoch,
                "Discarding response for superseded query"
            );
            return PageOutcome::Stale;
        }
        if !self.loading {
            debug!(epoch = self.epoch, "Discarding response with no fetch in flight");
            return PageOutcome::Stale;
        }
        self.loading = false;

        let volumes = match result {
            Ok(volumes) => volumes,
            Err(e) => {
                warn!(
                    epoch = self.epoch,
                    offset = self.next_offset,
                    error = %e,
                    "Page fetch failed"
                );
                self.last_error = Some(FETCH_ERROR_MESSAGE.to_string());
                return PageOutcome::Failed;
            }
        };

        let language = self
            .query
            .as_ref()
            .map(|q| q.language.as_str())
            .unwrap_or_default();
        let received = volumes.len();
        let mut accepted = 0usize;

        for volume in volumes {
            if volume.language() != language || self.seen_ids.contains(&volume.id) {
                continue;
            }
            self.seen_ids.insert(volume.id.clone());
            self.items.push(BookItem::from(volume));
            accepted += 1;
        }

        // Offset follows upstream pagination, not the filtered count
        self.next_offset += self.page_size;
        // Under-filled page means end of results, even when the shortfall
        // came from filtering rather than from the API
        self.exhausted = accepted < self.page_size as usize;
        self.last_error = None;

        info!(
            epoch = self.epoch,
            received,
            accepted,
            total = self.items.len(),
            next_offset = self.next_offset,
            exhausted = self.exhausted,
            "Page merged"
        );

        PageOutcome::Appended {
            accepted,
            exhausted: self.exhausted,
        }
    }

    /// Fetch and merge the next page against `backend`
    ///
    /// Returns `None` when nothing was dispatched.
    pub async fn fetch_next_page<B>(&mut self, backend: &B) -> Option<PageOutcome>
    where
        B: SearchBackend + ?Sized,
    {
        let page = self.begin_fetch()?;
        let result = backend.search(&page.request).await;
        Some(self.complete_fetch(&page, result))
    }

    pub fn items(&self) -> &[BookItem] {
        &self.items
    }

    pub fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    pub fn next_offset(&self) -> u32 {
        self.next_offset
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}
