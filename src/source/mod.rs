//! The data source contract.
//!
//! The engine's only external boundary. A shell implements [`PageSource`]
//! over whatever transport serves the list (REST/JSON in the observed
//! system); tests use [`MemorySource`]. The engine never calls `fetch`
//! itself — it hands a [`PageRequest`] to the shell and receives the
//! outcome through `apply_response`, keeping the core free of I/O.

use crate::model::{FetchFailure, RequestToken};
use crate::query::QuerySnapshot;
use serde::{Deserialize, Serialize};

pub mod memory;

pub use memory::MemorySource;

/// Conventional number of items per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Immutable description of one page fetch.
///
/// Carries everything a transport needs to build the call (page cursor,
/// page size, query snapshot) plus the [`RequestToken`] that attributes
/// the eventual response back to the query generation that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    token: RequestToken,
    page_size: u32,
    query: QuerySnapshot,
}

impl PageRequest {
    /// Create a request for the page identified by `token`.
    pub fn new(token: RequestToken, page_size: u32, query: QuerySnapshot) -> Self {
        Self {
            token,
            page_size,
            query,
        }
    }

    /// The token to echo back into `apply_response`.
    pub fn token(&self) -> RequestToken {
        self.token
    }

    /// The zero-based page cursor being requested.
    pub fn page(&self) -> u32 {
        self.token.page()
    }

    /// Maximum number of items the response may carry.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// The query this request was issued under.
    pub fn query(&self) -> &QuerySnapshot {
        &self.query
    }
}

/// Successful page fetch result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse<Item> {
    /// The page's items, at most `page_size` of them.
    pub items: Vec<Item>,
    /// Auxiliary facets (e.g. the full category list), when the endpoint
    /// returns them alongside the page.
    pub facets: Option<Vec<String>>,
    /// Total matching items, when the endpoint reports it. Unused by
    /// infinite scroll, carried for count displays.
    pub total_count: Option<u64>,
}

impl<Item> PageResponse<Item> {
    /// A response carrying only items.
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            facets: None,
            total_count: None,
        }
    }

    /// Attach auxiliary facets.
    #[must_use]
    pub fn with_facets(mut self, facets: Vec<String>) -> Self {
        self.facets = Some(facets);
        self
    }

    /// Attach a total count.
    #[must_use]
    pub fn with_total_count(mut self, total: u64) -> Self {
        self.total_count = Some(total);
        self
    }
}

/// A paged, filterable, searchable source of items.
///
/// Stateless from the engine's perspective: no transaction or lock
/// discipline is required beyond the engine's own single-flight guard.
pub trait PageSource<Item> {
    /// Fetch one page. `Err(NotFound)` signals end-of-data, any other
    /// failure is transient.
    fn fetch(&mut self, request: &PageRequest) -> Result<PageResponse<Item>, FetchFailure>;
}
