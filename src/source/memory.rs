//! In-memory page source.
//!
//! Mirrors the observed backend's paging semantics: a page window of
//! `page_size` items over the filtered row set, HTTP-404-equivalent
//! (`FetchFailure::NotFound`) when the window starts past the end. Used
//! by the test suites and as the executable reference for the contract.

use crate::model::FetchFailure;
use crate::query::QuerySnapshot;
use crate::source::{PageRequest, PageResponse, PageSource};
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;

use crate::query::SortState;

type Matcher<Item> = Box<dyn Fn(&Item, &QuerySnapshot) -> bool>;
type Sorter<Item> = Box<dyn Fn(&Item, &Item, &SortState) -> Ordering>;

/// A [`PageSource`] over a vector of rows.
pub struct MemorySource<Item> {
    rows: Vec<Item>,
    matcher: Matcher<Item>,
    sorter: Option<Sorter<Item>>,
    facets: Option<Vec<String>>,
    failures: VecDeque<FetchFailure>,
    fetch_count: usize,
}

impl<Item: Clone> MemorySource<Item> {
    /// Create a source over `rows` that matches every row regardless of
    /// the query. Attach behavior with the builder methods.
    pub fn new(rows: Vec<Item>) -> Self {
        Self {
            rows,
            matcher: Box::new(|_, _| true),
            sorter: None,
            facets: None,
            failures: VecDeque::new(),
            fetch_count: 0,
        }
    }

    /// Filter rows against the request's query snapshot.
    #[must_use]
    pub fn with_matcher(
        mut self,
        matcher: impl Fn(&Item, &QuerySnapshot) -> bool + 'static,
    ) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    /// Order matched rows when the request carries a sort.
    #[must_use]
    pub fn with_sorter(
        mut self,
        sorter: impl Fn(&Item, &Item, &SortState) -> Ordering + 'static,
    ) -> Self {
        self.sorter = Some(Box::new(sorter));
        self
    }

    /// Return `facets` alongside every successful page.
    #[must_use]
    pub fn with_facets(mut self, facets: Vec<String>) -> Self {
        self.facets = Some(facets);
        self
    }

    /// Fail the next fetch with `failure` instead of serving a page.
    /// Queued failures are consumed in order.
    pub fn fail_next(&mut self, failure: FetchFailure) {
        self.failures.push_back(failure);
    }

    /// Replace the underlying rows.
    pub fn set_rows(&mut self, rows: Vec<Item>) {
        self.rows = rows;
    }

    /// Number of fetches served or failed so far.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count
    }
}

impl<Item> fmt::Debug for MemorySource<Item> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySource")
            .field("rows", &self.rows.len())
            .field("queued_failures", &self.failures.len())
            .field("fetch_count", &self.fetch_count)
            .finish()
    }
}

impl<Item: Clone> PageSource<Item> for MemorySource<Item> {
    fn fetch(&mut self, request: &PageRequest) -> Result<PageResponse<Item>, FetchFailure> {
        self.fetch_count += 1;
        if let Some(failure) = self.failures.pop_front() {
            return Err(failure);
        }

        let mut matched: Vec<&Item> = self
            .rows
            .iter()
            .filter(|item| (self.matcher)(item, request.query()))
            .collect();
        if let (Some(sorter), Some(sort)) = (&self.sorter, &request.query().sort) {
            matched.sort_by(|a, b| sorter(a, b, sort));
        }

        let page_size = request.page_size() as usize;
        let start = request.page() as usize * page_size;
        if start >= matched.len() {
            // Past the end of the filtered data, including the empty set.
            return Err(FetchFailure::NotFound);
        }
        let end = (start + page_size).min(matched.len());
        let items = matched[start..end].iter().map(|item| (*item).clone()).collect();

        let mut response = PageResponse::new(items).with_total_count(matched.len() as u64);
        if let Some(facets) = &self.facets {
            response = response.with_facets(facets.clone());
        }
        Ok(response)
    }
}
