use std::collections::HashMap;

use thiserror::Error;

use crate::models::{PageResult, ResultSet};

/// A later page arrived for a term that has no page 0 yet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("page {page} for '{term}' arrived before page 0")]
pub struct StaleInitError {
    pub term: String,
    pub page: u32,
}

/// Per-term paginated results plus the term currently on screen.
///
/// The active term does not need an entry yet: it is set on submit, and the
/// matching page 0 lands later.
#[derive(Debug, Default)]
pub struct ResultCache {
    results: HashMap<String, ResultSet>,
    active_term: String,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one fetched page into the set for its term.
    ///
    /// Page 0 always replaces whatever is cached. Later pages are appended in
    /// arrival order with no deduplication across pages.
    pub fn apply(&mut self, result: PageResult) -> Result<(), StaleInitError> {
        let PageResult { term, page, hits } = result;

        if page == 0 {
            self.results.insert(term, ResultSet { hits, page });
            return Ok(());
        }

        match self.results.get_mut(&term) {
            Some(set) => {
                set.hits.extend(hits);
                set.page = page;
                Ok(())
            }
            None => Err(StaleInitError { term, page }),
        }
    }

    /// Drop every hit with `id` from `term`'s set. Unknown terms are ignored.
    pub fn remove(&mut self, term: &str, id: &str) {
        if let Some(set) = self.results.get_mut(term) {
            set.hits.retain(|hit| hit.id != id);
        }
    }

    pub fn set_active(&mut self, term: &str) {
        self.active_term = term.to_string();
    }

    pub fn active_term(&self) -> &str {
        &self.active_term
    }

    pub fn contains(&self, term: &str) -> bool {
        self.results.contains_key(term)
    }

    pub fn current_result_set(&self) -> Option<&ResultSet> {
        self.results.get(&self.active_term)
    }

    pub fn current_page(&self) -> u32 {
        self.current_result_set().map(|set| set.page).unwrap_or(0)
    }
}
