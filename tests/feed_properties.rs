//! Property tests for the feed engine's fetch-guard invariants.
//!
//! A shell is simulated over arbitrary interleavings of resets, filter
//! toggles, page deliveries, failures, and duplicate deliveries. After
//! every step the engine must uphold: at most one request in flight,
//! superseded responses never applied, the accumulation consistent with
//! exactly the applied pages, and `has_more` tracking the short-page
//! heuristic.

use pagefeed::feed::{FeedEngine, FeedTuning, FetchPhase, ResponseOutcome};
use pagefeed::model::FetchFailure;
use pagefeed::query::{FilterKey, FilterMode, FilterValue};
use pagefeed::source::{PageRequest, PageResponse};
use proptest::prelude::*;
use std::time::Instant;

#[derive(Debug, Clone)]
enum Op {
    Reset,
    DeliverPage(u8),
    DeliverFailure,
    DeliverNotFound,
    ToggleFilter(bool),
    RedeliverOld,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => Just(Op::Reset),
        4 => (0u8..=10).prop_map(Op::DeliverPage),
        1 => Just(Op::DeliverFailure),
        1 => Just(Op::DeliverNotFound),
        2 => any::<bool>().prop_map(Op::ToggleFilter),
        2 => Just(Op::RedeliverOld),
    ]
}

/// Take the outstanding request, or issue a new one via `request_more`.
///
/// When neither is possible the engine must be idle with `has_more`
/// false; the caller skips the delivery step.
fn next_request(
    engine: &mut FeedEngine<u32>,
    pending: &mut Option<PageRequest>,
) -> Result<Option<PageRequest>, TestCaseError> {
    if let Some(request) = pending.take() {
        return Ok(Some(request));
    }
    prop_assert_eq!(
        engine.phase(),
        FetchPhase::Idle,
        "No outstanding request implies an idle fetch guard"
    );
    match engine.request_more() {
        Some(request) => Ok(Some(request)),
        None => {
            prop_assert!(
                !engine.has_more(),
                "An idle engine with more data must hand out a request"
            );
            Ok(None)
        }
    }
}

proptest! {
    #[test]
    fn fetch_guard_invariants_hold_under_arbitrary_interleavings(
        ops in proptest::collection::vec(op_strategy(), 1..80),
    ) {
        let now = Instant::now();
        let key = FilterKey::new("flag");
        let mut engine: FeedEngine<u32> =
            FeedEngine::new(FeedTuning::default(), [(key.clone(), FilterMode::Single)]);
        // Requests the simulated shell has executed or abandoned; any
        // delivery for them must be discarded.
        let mut consumed: Vec<PageRequest> = Vec::new();
        let mut pending: Option<PageRequest> = None;
        let mut next_item: u32 = 0;

        for op in ops {
            match op {
                Op::Reset => {
                    if let Some(old) = pending.take() {
                        consumed.push(old);
                    }
                    let request = engine.reset();
                    prop_assert_eq!(request.page(), 0);
                    prop_assert!(engine.items().is_empty());
                    pending = Some(request);
                }
                Op::ToggleFilter(on) => {
                    if let Some(old) = pending.take() {
                        consumed.push(old);
                    }
                    let value = FilterValue::new(if on { "on" } else { "off" });
                    let request = engine
                        .set_filter(&key, value)
                        .expect("a known single-select key always changes the query");
                    prop_assert_eq!(
                        request.page(), 0,
                        "Any filter change restarts from page 0"
                    );
                    pending = Some(request);
                }
                Op::DeliverPage(len) => {
                    let Some(request) = next_request(&mut engine, &mut pending)? else {
                        continue;
                    };
                    let len = usize::from(len);
                    let mut items = Vec::with_capacity(len);
                    for _ in 0..len {
                        next_item += 1;
                        items.push(next_item);
                    }
                    let before = engine.items().len();
                    let outcome =
                        engine.apply_response(request.token(), Ok(PageResponse::new(items)), now);
                    prop_assert_eq!(outcome, ResponseOutcome::Applied);
                    prop_assert_eq!(engine.items().len(), before + len);
                    prop_assert_eq!(
                        engine.has_more(), len == 10,
                        "has_more is exactly the full-page heuristic"
                    );
                    prop_assert_eq!(engine.phase(), FetchPhase::Idle);
                    consumed.push(request);
                }
                Op::DeliverFailure => {
                    let Some(request) = next_request(&mut engine, &mut pending)? else {
                        continue;
                    };
                    let before = engine.items().len();
                    let outcome = engine.apply_response(
                        request.token(),
                        Err(FetchFailure::other("simulated outage")),
                        now,
                    );
                    prop_assert_eq!(outcome, ResponseOutcome::Applied);
                    prop_assert_eq!(
                        engine.items().len(), before,
                        "A transient failure never drops loaded items"
                    );
                    prop_assert!(engine.last_error().is_some());
                    consumed.push(request);
                }
                Op::DeliverNotFound => {
                    let Some(request) = next_request(&mut engine, &mut pending)? else {
                        continue;
                    };
                    let before = engine.items().len();
                    let outcome =
                        engine.apply_response(request.token(), Err(FetchFailure::NotFound), now);
                    prop_assert_eq!(outcome, ResponseOutcome::Applied);
                    prop_assert_eq!(engine.items().len(), before);
                    prop_assert!(!engine.has_more());
                    prop_assert_eq!(
                        engine.last_error().map(|e| e.to_string()), None,
                        "End-of-data is never surfaced as an error"
                    );
                    consumed.push(request);
                }
                Op::RedeliverOld => {
                    let Some(request) = consumed.last().cloned() else {
                        continue;
                    };
                    let items_before: Vec<u32> = engine.items().to_vec();
                    let has_more_before = engine.has_more();
                    let outcome = engine.apply_response(
                        request.token(),
                        Ok(PageResponse::new(vec![9_999_999])),
                        now,
                    );
                    prop_assert_eq!(
                        outcome,
                        ResponseOutcome::Stale,
                        "A consumed or superseded token must never apply again"
                    );
                    prop_assert_eq!(engine.items(), items_before.as_slice());
                    prop_assert_eq!(engine.has_more(), has_more_before);
                }
            }

            // The guard never represents two simultaneous loads.
            if pending.is_none() && engine.phase() != FetchPhase::Idle {
                // phase can only be non-idle right after the engine handed
                // out a request, which the shell always stores in pending.
                prop_assert!(false, "Loading phase without an outstanding request");
            }
        }
    }

    #[test]
    fn applied_pages_are_never_reordered(
        lens in proptest::collection::vec(1u8..=10, 1..10),
    ) {
        let now = Instant::now();
        let mut engine: FeedEngine<u32> = FeedEngine::new(FeedTuning::default(), []);
        let mut expected: Vec<u32> = Vec::new();
        let mut next_item = 0u32;

        let mut request = Some(engine.reset());
        for len in lens {
            let Some(current) = request.take() else {
                break;
            };
            let mut items = Vec::new();
            for _ in 0..len {
                next_item += 1;
                items.push(next_item);
            }
            expected.extend(&items);
            engine.apply_response(current.token(), Ok(PageResponse::new(items)), now);
            request = engine.request_more();
        }

        prop_assert_eq!(
            engine.items(),
            expected.as_slice(),
            "Accumulation preserves arrival order across pages"
        );
    }
}
