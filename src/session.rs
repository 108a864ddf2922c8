use std::collections::HashSet;

use crate::cache::{ResultCache, StaleInitError};
use crate::models::{Hit, PageResult, SearchResponse};
use crate::sort::{SortController, SortKey};

pub const FAILURE_NOTICE: &str = "Something went wrong.";

/// One page request handed to the fetch worker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchRequest {
    pub term: String,
    pub page: u32,
}

/// Search state shared by the window: what is cached, what is shown, what is
/// still on the wire.
pub struct SearchSession {
    pub cache: ResultCache,
    pub sort: SortController,
    // Contents of the search box, committed on submit
    pub search_input: String,
    pub error: Option<String>,
    in_flight: HashSet<String>,
    // Terms with no further pages upstream
    exhausted: HashSet<String>,
}

impl SearchSession {
    pub fn new(default_query: &str) -> Self {
        let mut cache = ResultCache::new();
        cache.set_active(default_query);

        Self {
            cache,
            sort: SortController::new(),
            search_input: default_query.to_string(),
            error: None,
            in_flight: HashSet::new(),
            exhausted: HashSet::new(),
        }
    }

    pub fn initial_request(&mut self) -> Option<FetchRequest> {
        let term = self.cache.active_term().to_string();
        self.begin(term, 0)
    }

    /// Commit the search box. Cached terms are shown without refetching.
    pub fn submit(&mut self) -> Option<FetchRequest> {
        let term = self.search_input.trim().to_string();
        if term.is_empty() {
            return None;
        }

        self.cache.set_active(&term);
        self.error = None;

        if self.cache.contains(&term) {
            tracing::debug!(%term, "showing cached results");
            return None;
        }
        self.begin(term, 0)
    }

    /// Next page of the active term.
    pub fn more(&mut self) -> Option<FetchRequest> {
        let term = self.cache.active_term().to_string();
        if !self.cache.contains(&term) || self.exhausted.contains(&term) {
            return None;
        }

        let page = self.cache.current_page() + 1;
        self.begin(term, page)
    }

    fn begin(&mut self, term: String, page: u32) -> Option<FetchRequest> {
        // One request per term at a time
        if !self.in_flight.insert(term.clone()) {
            return None;
        }

        tracing::info!(%term, page, "fetching search page");
        Some(FetchRequest { term, page })
    }

    /// Feed a finished request back in. The response is stored under the
    /// request's term even if the user has moved on to another search.
    pub fn complete(
        &mut self,
        request: FetchRequest,
        outcome: anyhow::Result<SearchResponse>,
    ) -> Result<(), StaleInitError> {
        let FetchRequest { term, page } = request;
        self.in_flight.remove(&term);

        match outcome {
            Ok(response) => {
                let SearchResponse { hits, nb_pages, .. } = response;
                tracing::info!(%term, page, pages = nb_pages, hits = hits.len(), "search page arrived");

                if term == self.cache.active_term() {
                    self.error = None;
                }
                if page + 1 >= nb_pages || (page > 0 && hits.is_empty()) {
                    self.exhausted.insert(term.clone());
                } else {
                    self.exhausted.remove(&term);
                }
                self.cache.apply(PageResult { term, page, hits })
            }
            Err(err) => {
                tracing::warn!(%term, page, error = %err, "search request failed");
                self.error = Some(FAILURE_NOTICE.to_string());
                Ok(())
            }
        }
    }

    pub fn dismiss(&mut self, id: &str) {
        let term = self.cache.active_term().to_string();
        self.cache.remove(&term, id);
    }

    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort.toggle(key);
    }

    /// Rows to render: active results, narrowed by the local title filter,
    /// then sorted.
    pub fn visible_hits(&self, filter: &str) -> Vec<Hit> {
        let Some(set) = self.cache.current_result_set() else {
            return Vec::new();
        };

        let matching: Vec<Hit> = set.hits.iter().filter(|hit| hit.matches_title(filter)).cloned().collect();
        self.sort.order(&matching)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.contains(self.cache.active_term())
    }

    pub fn has_more(&self) -> bool {
        let term = self.cache.active_term();
        self.cache.contains(term) && !self.exhausted.contains(term)
    }
}
