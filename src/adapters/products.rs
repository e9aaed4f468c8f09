//! The products list feed.

use crate::feed::{FeedEngine, FeedTuning};
use crate::model::{FeedError, ProductId, ProductPatch, ProductSummary};
use crate::query::{FilterKey, FilterMode, FilterValue};
use crate::source::PageRequest;

/// Paginated products list with a multi-select category filter.
///
/// The category chip list itself comes from the data source as facets
/// alongside each page, so newly created categories appear without a
/// separate endpoint.
#[derive(Debug)]
pub struct ProductsFeed {
    engine: FeedEngine<ProductSummary>,
}

impl ProductsFeed {
    /// Filter key for the category chips.
    pub const CATEGORIES: &'static str = "categories";

    /// Create an idle products feed. The shell calls
    /// [`reset`](FeedEngine::reset) on mount.
    pub fn new(tuning: FeedTuning) -> Self {
        Self {
            engine: FeedEngine::new(
                tuning,
                [(FilterKey::new(Self::CATEGORIES), FilterMode::Multi)],
            ),
        }
    }

    /// The underlying engine, read-only.
    pub fn engine(&self) -> &FeedEngine<ProductSummary> {
        &self.engine
    }

    /// The underlying engine, for the generic operations.
    pub fn engine_mut(&mut self) -> &mut FeedEngine<ProductSummary> {
        &mut self.engine
    }

    /// The accumulated product rows.
    pub fn products(&self) -> &[ProductSummary] {
        self.engine.items()
    }

    /// All known category names, for rendering the chip list.
    pub fn categories(&self) -> &[String] {
        self.engine.facets()
    }

    /// Toggle one category in or out of the multi-selection.
    ///
    /// Returns the page-0 request for the new query.
    pub fn toggle_category(&mut self, name: impl Into<String>) -> Option<PageRequest> {
        self.engine.set_filter(
            &FilterKey::new(Self::CATEGORIES),
            FilterValue::new(name.into()),
        )
    }

    /// The currently selected categories.
    pub fn selected_categories(&self) -> Vec<String> {
        self.engine
            .query()
            .selection(&FilterKey::new(Self::CATEGORIES))
            .into_iter()
            .map(|value| value.as_str().to_string())
            .collect()
    }

    /// Validate an edit before the shell sends it.
    ///
    /// A rejected patch is recorded as the feed's surfaced error so the
    /// form can display it; no request should be issued.
    pub fn stage_update(&mut self, patch: &ProductPatch) -> Result<(), FeedError> {
        if let Err(error) = patch.validate() {
            self.engine.record_error(error.clone());
            return Err(error);
        }
        Ok(())
    }

    /// Patch the edited fields into the row after the remote update
    /// succeeded. Rating, sold count, and categories are untouched.
    ///
    /// Returns whether the product was found in the accumulation.
    pub fn apply_update(&mut self, id: &ProductId, patch: &ProductPatch) -> bool {
        self.engine.patch_item(
            |product| &product.id == id,
            |product| patch.apply_to(product),
        )
    }

    /// Flip the availability flag after the remote toggle succeeded.
    pub fn apply_availability(&mut self, id: &ProductId, available: bool) -> bool {
        self.engine.patch_item(
            |product| &product.id == id,
            |product| product.available = available,
        )
    }

    /// Record a freshly created category so its chip renders immediately,
    /// without waiting for the next page response.
    pub fn category_added(&mut self, name: impl Into<String>) {
        self.engine.add_facet(name);
    }

    /// Record a failed remote update. The row keeps its previous values.
    pub fn update_failed(&mut self, message: impl Into<String>) {
        self.engine.record_mutation_error(message);
    }
}
