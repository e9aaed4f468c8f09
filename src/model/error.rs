//! Error taxonomy for the feed engine.
//!
//! Two layers, mirroring the engine's boundary:
//!
//! - [`FetchFailure`] is the data-source classification of a failed page
//!   fetch. `NotFound` is the documented "ran out of data" signal — it is
//!   normal pagination termination and never surfaces as an error.
//! - [`FeedError`] is what the feed records in its `last_error` slot for
//!   the presentation layer to display. Fetch and mutation failures are
//!   converted to state at the engine boundary, never propagated as
//!   uncaught failures; callers observe state changes rather than
//!   catching errors.

use thiserror::Error;

/// Classified outcome of a failed page fetch, reported by the data source.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchFailure {
    /// The requested page lies beyond the available data.
    ///
    /// The observed REST backend answers a page past the end with HTTP 404.
    /// The engine treats this identically to a successful empty page:
    /// `has_more` flips false, no error is surfaced.
    #[error("page not found (end of data)")]
    NotFound,

    /// Any other transport or server failure.
    ///
    /// Surfaced as a retryable [`FeedError::Fetch`]; accumulated items are
    /// preserved and `has_more` is left unchanged so the user may scroll
    /// and retry.
    #[error("fetch failed: {message}")]
    Other {
        /// Human-readable description from the transport layer.
        message: String,
    },
}

impl FetchFailure {
    /// Convenience constructor for the transient-failure variant.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// Error state surfaced by a feed for the presentation layer.
///
/// Held in the feed's `last_error` slot. Initial-load failures replace the
/// (empty) list with an error indicator; append failures leave existing
/// items visible; mutation failures leave the affected row unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeedError {
    /// A page fetch failed for a reason other than end-of-data.
    #[error("failed to load items: {message}")]
    Fetch {
        /// Description carried over from [`FetchFailure::Other`].
        message: String,
    },

    /// A single-item remote update failed; the list was left unchanged.
    #[error("failed to update item: {message}")]
    Mutation {
        /// Description from the mutation endpoint.
        message: String,
    },

    /// Locally rejected input; no request was issued.
    #[error("invalid input: {message}")]
    Validation {
        /// What was wrong with the input.
        message: String,
    },
}

impl FeedError {
    /// Build the surfaced form of a transient fetch failure.
    ///
    /// Returns `None` for [`FetchFailure::NotFound`], which is normal
    /// pagination termination rather than an error.
    pub fn from_fetch(failure: &FetchFailure) -> Option<Self> {
        match failure {
            FetchFailure::NotFound => None,
            FetchFailure::Other { message } => Some(Self::Fetch {
                message: message.clone(),
            }),
        }
    }
}
