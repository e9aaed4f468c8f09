//! The orders list feed.

use crate::feed::{FeedEngine, FeedTuning};
use crate::model::{OrderId, OrderStatus, OrderSummary};
use crate::query::{FilterKey, FilterMode, FilterValue};
use crate::source::PageRequest;

/// Paginated orders list with a single-select status filter.
#[derive(Debug)]
pub struct OrdersFeed {
    engine: FeedEngine<OrderSummary>,
}

impl OrdersFeed {
    /// Filter key for the order status chips.
    pub const STATUS: &'static str = "status";

    /// Create an idle orders feed. The shell calls
    /// [`reset`](FeedEngine::reset) on mount.
    pub fn new(tuning: FeedTuning) -> Self {
        Self {
            engine: FeedEngine::new(
                tuning,
                [(FilterKey::new(Self::STATUS), FilterMode::Single)],
            ),
        }
    }

    /// The underlying engine, read-only.
    pub fn engine(&self) -> &FeedEngine<OrderSummary> {
        &self.engine
    }

    /// The underlying engine, for the generic operations (search input,
    /// polling, response application, marker events, teardown).
    pub fn engine_mut(&mut self) -> &mut FeedEngine<OrderSummary> {
        &mut self.engine
    }

    /// The accumulated order rows.
    pub fn orders(&self) -> &[OrderSummary] {
        self.engine.items()
    }

    /// Toggle the status filter chip.
    ///
    /// Selecting the active status clears the filter; any other status
    /// replaces it. Returns the page-0 request for the new query.
    pub fn toggle_status(&mut self, status: OrderStatus) -> Option<PageRequest> {
        self.engine.set_filter(
            &FilterKey::new(Self::STATUS),
            FilterValue::new(status.as_str()),
        )
    }

    /// The currently selected status chip, if any.
    pub fn selected_status(&self) -> Option<OrderStatus> {
        let selection = self.engine.query().selection(&FilterKey::new(Self::STATUS));
        let value = selection.first()?;
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value.as_str())
    }

    /// Mark the order annulled after the remote cancellation succeeded.
    ///
    /// Patches the one matching row in place; the list is not re-fetched.
    /// Returns whether the order was found in the accumulation.
    pub fn apply_cancel(&mut self, id: &OrderId) -> bool {
        self.engine.patch_item(
            |order| &order.id == id,
            |order| order.status = OrderStatus::Annulled,
        )
    }

    /// Record a failed remote cancellation. The row keeps its previous
    /// status.
    pub fn cancel_failed(&mut self, message: impl Into<String>) {
        self.engine.record_mutation_error(message);
    }
}
