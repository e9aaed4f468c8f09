//! Query state: free-text search, filter selections, sort, page cursor.
//!
//! Invariant: the page cursor resets to 0 whenever any search, filter, or
//! sort value actually changes. Mutators report whether the query changed
//! so the owning feed knows to reset its accumulation; none of them can
//! fail. Unknown filter keys are a logged no-op (conservative policy,
//! applied uniformly).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;

// ===== Keys and values =====

/// Name of a categorical filter (e.g. `status`, `categories`, `role`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FilterKey(String);

impl FilterKey {
    /// Create a filter key.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the key name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One selectable value of a categorical filter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FilterValue(String);

impl FilterValue {
    /// Create a filter value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Selection behavior of a filter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Mutually exclusive: selecting a value replaces the previous one,
    /// selecting the current value again clears the filter.
    Single,
    /// Toggle membership: each value is independently in or out.
    Multi,
}

/// Current selection under one filter key.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FilterSelection {
    Single(Option<FilterValue>),
    Multi(BTreeSet<FilterValue>),
}

impl FilterSelection {
    fn empty(mode: FilterMode) -> Self {
        match mode {
            FilterMode::Single => FilterSelection::Single(None),
            FilterMode::Multi => FilterSelection::Multi(BTreeSet::new()),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            FilterSelection::Single(v) => v.is_none(),
            FilterSelection::Multi(set) => set.is_empty(),
        }
    }

    fn values(&self) -> Vec<FilterValue> {
        match self {
            FilterSelection::Single(v) => v.iter().cloned().collect(),
            FilterSelection::Multi(set) => set.iter().cloned().collect(),
        }
    }
}

// ===== Sort =====

/// Column a list can be ordered by.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SortKey(String);

impl SortKey {
    /// Create a sort key.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the column name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Ordering direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    #[must_use]
    pub fn flipped(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Active sort: column plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    /// Column the list is ordered by.
    pub key: SortKey,
    /// Current direction.
    pub direction: SortDirection,
}

// ===== Snapshot =====

/// Immutable copy of a query, embedded in every page request.
///
/// Filters are flattened to key → selected values; keys with an empty
/// selection are omitted, matching how the REST shell omits absent query
/// parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySnapshot {
    /// Committed search text (empty string when not searching).
    pub search: String,
    /// Selected filter values per key; empty selections omitted.
    pub filters: BTreeMap<FilterKey, Vec<FilterValue>>,
    /// Active sort, if any.
    pub sort: Option<SortState>,
}

impl QuerySnapshot {
    /// Selected values under `key`, empty when the key is absent.
    pub fn values(&self, key: &FilterKey) -> &[FilterValue] {
        self.filters.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

// ===== QueryState =====

/// The mutable query of one feed instance.
///
/// Constructed with the set of filter keys the entity supports; keys are
/// fixed for the lifetime of the feed, selections change freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    search: String,
    filters: BTreeMap<FilterKey, FilterSelection>,
    modes: BTreeMap<FilterKey, FilterMode>,
    sort: Option<SortState>,
    page: u32,
}

impl QueryState {
    /// Create a query over the given filter keys, all selections empty.
    pub fn new(specs: impl IntoIterator<Item = (FilterKey, FilterMode)>) -> Self {
        let mut filters = BTreeMap::new();
        let mut modes = BTreeMap::new();
        for (key, mode) in specs {
            filters.insert(key.clone(), FilterSelection::empty(mode));
            modes.insert(key, mode);
        }
        Self {
            search: String::new(),
            filters,
            modes,
            sort: None,
            page: 0,
        }
    }

    /// The committed search text.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// The zero-based page cursor.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// The active sort, if any.
    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    /// Selected values under `key`. Empty for unknown keys.
    pub fn selection(&self, key: &FilterKey) -> Vec<FilterValue> {
        self.filters
            .get(key)
            .map(FilterSelection::values)
            .unwrap_or_default()
    }

    /// Whether `value` is currently selected under `key`.
    pub fn is_selected(&self, key: &FilterKey, value: &FilterValue) -> bool {
        match self.filters.get(key) {
            Some(FilterSelection::Single(v)) => v.as_ref() == Some(value),
            Some(FilterSelection::Multi(set)) => set.contains(value),
            None => false,
        }
    }

    /// Replace the search text. Returns `true` if the query changed.
    pub fn set_search(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.search {
            return false;
        }
        self.search = text;
        self.reset_page();
        true
    }

    /// Toggle `value` under `key`.
    ///
    /// Single-select keys set-or-clear: passing the currently selected
    /// value clears the filter, any other value replaces it. Multi-select
    /// keys toggle membership. Unknown keys are a logged no-op.
    ///
    /// Returns `true` if the query changed.
    pub fn set_filter(&mut self, key: &FilterKey, value: FilterValue) -> bool {
        let Some(selection) = self.filters.get_mut(key) else {
            tracing::warn!(key = %key, "ignoring unknown filter key");
            return false;
        };
        match selection {
            FilterSelection::Single(current) => {
                if current.as_ref() == Some(&value) {
                    *current = None;
                } else {
                    *current = Some(value);
                }
            }
            FilterSelection::Multi(set) => {
                if !set.remove(&value) {
                    set.insert(value);
                }
            }
        }
        self.reset_page();
        true
    }

    /// Clear the selection under one key. Unknown keys are a logged no-op.
    ///
    /// Returns `true` if the query changed.
    pub fn clear_filter(&mut self, key: &FilterKey) -> bool {
        let mode = match self.modes.get(key) {
            Some(mode) => *mode,
            None => {
                tracing::warn!(key = %key, "ignoring unknown filter key");
                return false;
            }
        };
        let selection = self
            .filters
            .get_mut(key)
            .expect("modes and filters share keys");
        if selection.is_empty() {
            return false;
        }
        *selection = FilterSelection::empty(mode);
        self.reset_page();
        true
    }

    /// Clear every filter selection. Returns `true` if any was non-empty.
    pub fn clear_all_filters(&mut self) -> bool {
        let mut changed = false;
        for (key, selection) in &mut self.filters {
            if !selection.is_empty() {
                *selection = FilterSelection::empty(self.modes[key]);
                changed = true;
            }
        }
        if changed {
            self.reset_page();
        }
        changed
    }

    /// Order by `key`.
    ///
    /// Selecting the current sort column flips the direction; selecting a
    /// new column forces ascending. Always a change.
    pub fn toggle_sort(&mut self, key: SortKey) -> bool {
        self.sort = match self.sort.take() {
            Some(state) if state.key == key => Some(SortState {
                key,
                direction: state.direction.flipped(),
            }),
            _ => Some(SortState {
                key,
                direction: SortDirection::Ascending,
            }),
        };
        self.reset_page();
        true
    }

    /// Advance to the next page. Returns the new cursor.
    pub(crate) fn advance_page(&mut self) -> u32 {
        self.page += 1;
        self.page
    }

    /// Move the cursor back to page 0.
    pub(crate) fn reset_page(&mut self) {
        self.page = 0;
    }

    /// Restore the cursor after a failed append, so the next request
    /// retries the page that failed.
    pub(crate) fn restore_page(&mut self, page: u32) {
        self.page = page;
    }

    /// Immutable copy of search, filters, and sort for a page request.
    pub fn snapshot(&self) -> QuerySnapshot {
        let filters = self
            .filters
            .iter()
            .filter(|(_, selection)| !selection.is_empty())
            .map(|(key, selection)| (key.clone(), selection.values()))
            .collect();
        QuerySnapshot {
            search: self.search.clone(),
            filters,
            sort: self.sort.clone(),
        }
    }
}
