//! The feed engine state machine.
//!
//! One [`FeedEngine`] instance owns everything one paginated list needs:
//! the query, the accumulated items, the fetch guard, the search
//! debouncer, and the viewport sentinel. The two loading booleans of the
//! source pattern are replaced by the [`FetchPhase`] sum type, so the
//! illegal "both loading flags true" combination is unrepresentable.
//!
//! The engine is sans-IO. Operations that need a page fetch return a
//! [`PageRequest`]; the shell executes it and feeds the outcome back via
//! [`FeedEngine::apply_response`] together with the request's token.
//! Responses whose token no longer matches the in-flight request (a
//! query change superseded them) are discarded, never applied.

use crate::debounce::SearchDebouncer;
use crate::model::{FeedError, FetchFailure, Generation, MarkerId, RequestToken};
use crate::query::{FilterKey, FilterMode, FilterValue, QueryState, SortKey};
use crate::sentinel::{MarkerGeometry, SentinelTuning, ViewportSentinel};
use crate::source::{PageRequest, PageResponse, DEFAULT_PAGE_SIZE};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

/// Engine tunables.
///
/// Defaults reproduce the reference behavior: pages of 10, a 300 ms search
/// quiet period, and a 100 ms delay between applying a page and re-arming
/// the sentinel (giving the rendering surface time to lay out the new
/// marker before its position is read).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedTuning {
    /// Items per page.
    pub page_size: u32,
    /// Search debounce quiet period.
    pub debounce_quiet: Duration,
    /// Delay between a page being applied and the sentinel re-arming.
    pub rearm_delay: Duration,
    /// Sentinel detection zone.
    pub sentinel: SentinelTuning,
}

impl Default for FeedTuning {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            debounce_quiet: crate::debounce::DEFAULT_QUIET_PERIOD,
            rearm_delay: Duration::from_millis(100),
            sentinel: SentinelTuning::default(),
        }
    }
}

/// Fetch guard: at most one page request is outstanding per feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    /// No fetch outstanding.
    Idle,
    /// The first page of a fresh query is being fetched; the list is empty.
    LoadingInitial,
    /// A subsequent page is being appended to a non-empty accumulation.
    LoadingMore,
}

/// What [`FeedEngine::apply_response`] did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// The response belonged to the current in-flight request and was
    /// processed (successfully or as a recorded failure).
    Applied,
    /// The response was superseded by a later query change or teardown
    /// and was discarded without touching the list.
    Stale,
}

#[derive(Debug, Clone, Copy)]
struct Rearm {
    due: Instant,
    marker: MarkerId,
}

/// State machine for one paginated, filterable, searchable list.
///
/// Exclusively owns its [`QueryState`] and accumulation; feeds are never
/// shared. All methods are synchronous; the shell drives [`poll`] from
/// its event loop to deliver due debounce commits and sentinel re-arms.
///
/// [`poll`]: FeedEngine::poll
#[derive(Debug)]
pub struct FeedEngine<Item> {
    tuning: FeedTuning,
    query: QueryState,
    items: Vec<Item>,
    phase: FetchPhase,
    has_more: bool,
    last_error: Option<FeedError>,
    generation: Generation,
    in_flight: Option<RequestToken>,
    debouncer: SearchDebouncer,
    sentinel: ViewportSentinel,
    pending_rearm: Option<Rearm>,
    facets: Vec<String>,
    total_count: Option<u64>,
}

impl<Item> FeedEngine<Item> {
    /// Create an idle engine over the given filter keys.
    ///
    /// No fetch is issued; the shell calls [`reset`](Self::reset) once on
    /// mount to load page 0.
    pub fn new(
        tuning: FeedTuning,
        filters: impl IntoIterator<Item = (FilterKey, FilterMode)>,
    ) -> Self {
        Self {
            query: QueryState::new(filters),
            items: Vec::new(),
            phase: FetchPhase::Idle,
            has_more: true,
            last_error: None,
            generation: Generation::initial(),
            in_flight: None,
            debouncer: SearchDebouncer::new(tuning.debounce_quiet),
            sentinel: ViewportSentinel::new(tuning.sentinel),
            pending_rearm: None,
            facets: Vec::new(),
            total_count: None,
            tuning,
        }
    }

    // ===== Observation =====

    /// The accumulated items, in arrival order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Current fetch guard phase.
    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    /// Whether the very first page of the current query is loading.
    pub fn is_initial_loading(&self) -> bool {
        self.phase == FetchPhase::LoadingInitial
    }

    /// Whether a subsequent page is loading.
    pub fn is_loading_more(&self) -> bool {
        self.phase == FetchPhase::LoadingMore
    }

    /// Whether more pages may exist for the current query.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// The most recent surfaced error, if any.
    pub fn last_error(&self) -> Option<&FeedError> {
        self.last_error.as_ref()
    }

    /// The current query (read-only; mutate through the engine so the
    /// accumulation resets with it).
    pub fn query(&self) -> &QueryState {
        &self.query
    }

    /// The current query/reset generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Latest auxiliary facets reported by the data source.
    pub fn facets(&self) -> &[String] {
        &self.facets
    }

    /// Latest total count reported by the data source, if any.
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    // ===== Query mutation =====

    /// Record a raw search box edit at `now`.
    ///
    /// The commit surfaces from [`poll`](Self::poll) after the quiet
    /// period, deduplicated against the previous committed text.
    pub fn search_input(&mut self, text: impl Into<String>, now: Instant) {
        self.debouncer.input(text, now);
    }

    /// Toggle `value` under `key` and restart from page 0.
    ///
    /// Returns the page-0 request, or `None` when the key is unknown (a
    /// logged no-op).
    pub fn set_filter(&mut self, key: &FilterKey, value: FilterValue) -> Option<PageRequest> {
        self.query.set_filter(key, value).then(|| self.reset())
    }

    /// Clear the selection under `key` and restart from page 0.
    ///
    /// Returns `None` when the key is unknown or the selection was
    /// already empty.
    pub fn clear_filter(&mut self, key: &FilterKey) -> Option<PageRequest> {
        self.query.clear_filter(key).then(|| self.reset())
    }

    /// Clear every filter selection and restart from page 0.
    ///
    /// Returns `None` when no selection was set.
    pub fn clear_all_filters(&mut self) -> Option<PageRequest> {
        self.query.clear_all_filters().then(|| self.reset())
    }

    /// Sort by `key` (flipping direction on repeat) and restart from
    /// page 0.
    pub fn toggle_sort(&mut self, key: SortKey) -> Option<PageRequest> {
        self.query.toggle_sort(key).then(|| self.reset())
    }

    // ===== Fetch lifecycle =====

    /// Clear the accumulation and issue a page-0 request for the current
    /// query.
    ///
    /// Bumps the generation, so any in-flight response is superseded and
    /// will be discarded on arrival.
    pub fn reset(&mut self) -> PageRequest {
        self.items.clear();
        self.query.reset_page();
        self.has_more = true;
        self.generation = self.generation.next();
        self.phase = FetchPhase::LoadingInitial;
        self.pending_rearm = None;
        self.sentinel.disarm();
        let token = RequestToken::new(self.generation, 0);
        self.in_flight = Some(token);
        debug!(generation = %self.generation, "feed reset, issuing page 0");
        self.page_request(token)
    }

    /// Request the next page.
    ///
    /// Silently ignored (`None`, not an error) while a fetch is in flight
    /// or after end-of-data; a later [`reset`](Self::reset) re-enables
    /// fetching.
    pub fn request_more(&mut self) -> Option<PageRequest> {
        if self.phase != FetchPhase::Idle {
            trace!(phase = ?self.phase, "request_more ignored: fetch in flight");
            return None;
        }
        if !self.has_more {
            trace!("request_more ignored: end of data");
            return None;
        }
        let page = self.query.advance_page();
        let token = RequestToken::new(self.generation, page);
        self.phase = FetchPhase::LoadingMore;
        self.in_flight = Some(token);
        debug!(page, "requesting next page");
        Some(self.page_request(token))
    }

    /// Feed back the outcome of the fetch identified by `token`.
    ///
    /// A token that no longer matches the in-flight request — the query
    /// changed after it was issued, or the feed was torn down — is
    /// discarded without touching the accumulation, preventing stale
    /// pages from resurfacing after a filter change raced a fetch.
    pub fn apply_response(
        &mut self,
        token: RequestToken,
        result: Result<PageResponse<Item>, FetchFailure>,
        now: Instant,
    ) -> ResponseOutcome {
        if self.in_flight != Some(token) {
            warn!(
                ?token,
                current = %self.generation,
                "discarding stale page response"
            );
            return ResponseOutcome::Stale;
        }
        self.in_flight = None;
        self.phase = FetchPhase::Idle;

        match result {
            Ok(response) => {
                let appended = response.items.len();
                self.items.extend(response.items);
                self.has_more = appended == self.tuning.page_size as usize;
                if let Some(facets) = response.facets {
                    self.facets = facets;
                }
                if let Some(total) = response.total_count {
                    self.total_count = Some(total);
                }
                self.last_error = None;
                debug!(
                    page = token.page(),
                    appended,
                    total = self.items.len(),
                    has_more = self.has_more,
                    "page applied"
                );
                self.schedule_rearm(now);
            }
            Err(FetchFailure::NotFound) => {
                // The documented "ran out of data" signal, not a fault.
                self.has_more = false;
                self.last_error = None;
                debug!(page = token.page(), "page not found, end of data");
            }
            Err(failure @ FetchFailure::Other { .. }) => {
                warn!(page = token.page(), error = %failure, "page fetch failed");
                self.last_error = FeedError::from_fetch(&failure);
                if token.page() > 0 {
                    // Roll the cursor back so the next visibility event
                    // retries the page that failed. The marker that fired
                    // for this page must be able to fire again.
                    self.query.restore_page(token.page() - 1);
                    self.sentinel.disarm();
                    self.schedule_rearm(now);
                }
            }
        }
        ResponseOutcome::Applied
    }

    // ===== Event loop hooks =====

    /// Deliver due timers: a committed search becomes a reset, a due
    /// sentinel re-arm starts watching the current last item.
    ///
    /// Returns the page-0 request when a search commit changed the query.
    pub fn poll(&mut self, now: Instant) -> Option<PageRequest> {
        if let Some(rearm) = self.pending_rearm.take() {
            if now >= rearm.due {
                self.sentinel.arm(rearm.marker);
            } else {
                self.pending_rearm = Some(rearm);
            }
        }
        if let Some(text) = self.debouncer.poll(now) {
            if self.query.set_search(text) {
                return Some(self.reset());
            }
        }
        None
    }

    /// Route a marker visibility report from the rendering surface.
    ///
    /// Returns the next-page request when this event fires the sentinel
    /// and a fetch is permitted.
    pub fn marker_visible(
        &mut self,
        marker: MarkerId,
        geometry: MarkerGeometry,
    ) -> Option<PageRequest> {
        if self.sentinel.observe(marker, geometry) {
            self.request_more()
        } else {
            None
        }
    }

    // ===== Optimistic mutation =====

    /// Patch the first item matching `find` in place, after a single-item
    /// remote update succeeded. Never re-fetches; ordering and all other
    /// items are unaffected.
    ///
    /// Returns whether a matching item was found.
    pub fn patch_item(
        &mut self,
        find: impl Fn(&Item) -> bool,
        patch: impl FnOnce(&mut Item),
    ) -> bool {
        match self.items.iter().position(|item| find(item)) {
            Some(index) => {
                patch(&mut self.items[index]);
                true
            }
            None => {
                trace!("patch_item: no matching item in the accumulation");
                false
            }
        }
    }

    /// Record a surfaced error without touching the accumulation.
    pub fn record_error(&mut self, error: FeedError) {
        warn!(%error, "recording feed error");
        self.last_error = Some(error);
    }

    /// Record a failed single-item update. The list is left in its
    /// last-known-good state; no automatic retry or revert.
    pub fn record_mutation_error(&mut self, message: impl Into<String>) {
        self.record_error(FeedError::Mutation {
            message: message.into(),
        });
    }

    /// Append `name` to the facet list if not already present (e.g. a
    /// freshly created category).
    pub fn add_facet(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.facets.contains(&name) {
            self.facets.push(name);
        }
    }

    // ===== Teardown =====

    /// Tear the feed down: cancel the pending debounce, disconnect the
    /// sentinel, and mark every in-flight token stale so late responses
    /// are ignored.
    pub fn teardown(&mut self) {
        self.debouncer.cancel();
        self.sentinel.disconnect();
        self.generation = self.generation.next();
        self.in_flight = None;
        self.pending_rearm = None;
        self.phase = FetchPhase::Idle;
        debug!("feed torn down");
    }

    // ===== Internals =====

    fn page_request(&self, token: RequestToken) -> PageRequest {
        PageRequest::new(token, self.tuning.page_size, self.query.snapshot())
    }

    fn schedule_rearm(&mut self, now: Instant) {
        if !self.has_more || self.items.is_empty() {
            return;
        }
        let marker = MarkerId::new(self.items.len() - 1);
        self.pending_rearm = Some(Rearm {
            due: now + self.tuning.rearm_delay,
            marker,
        });
    }
}
