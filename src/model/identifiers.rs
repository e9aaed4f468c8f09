//! Identifier newtypes with smart constructors, plus request tokens.
//!
//! Entity identifiers validate non-empty strings at construction time.
//! Raw constructors are never exported - use smart constructors only.
//! [`Generation`] and [`RequestToken`] implement the stale-response
//! discard rule: a response is only applied if its token's generation
//! matches the feed's current generation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error for identifier smart constructors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidId {
    /// The identifier string was empty or whitespace-only.
    #[error("{kind} ID cannot be empty")]
    Empty {
        /// Which identifier type rejected the input ("order", "product", "user").
        kind: &'static str,
    },
}

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident, $kind:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Smart constructor: validates a non-empty identifier.
            pub fn new(raw: impl Into<String>) -> Result<Self, InvalidId> {
                let s = raw.into();
                if s.trim().is_empty() {
                    Err(InvalidId::Empty { kind: $kind })
                } else {
                    Ok(Self(s))
                }
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvalidId;

            fn try_from(raw: String) -> Result<Self, Self::Error> {
                Self::new(raw)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }
    };
}

string_id!(
    /// Unique identifier of an order.
    OrderId,
    "order"
);

string_id!(
    /// Unique identifier of a product.
    ProductId,
    "product"
);

string_id!(
    /// Unique identifier of a user account.
    UserId,
    "user"
);

// ===== MarkerId =====

/// Position of the viewport marker within the accumulated list.
///
/// The marker is the last rendered item; as pages are appended the marker
/// moves, and the sentinel must be re-armed on the new position. Indexing
/// by list position (rather than entity ID) keeps the sentinel independent
/// of the item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(usize);

impl MarkerId {
    /// Create a marker for the item at `index` in the accumulated list.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// The list index this marker refers to.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

// ===== Generation / RequestToken =====

/// Monotonically increasing marker for query/reset cycles.
///
/// Every `reset()` (filter change, sort change, committed search) bumps the
/// feed's generation. In-flight requests issued under an older generation
/// become stale and their responses are discarded on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Generation(u64);

impl Generation {
    /// The initial generation of a freshly constructed feed.
    pub fn initial() -> Self {
        Self(0)
    }

    /// The generation following this one.
    #[must_use]
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen{}", self.0)
    }
}

/// Tag attributing a page response back to the request that produced it.
///
/// Carried by [`crate::source::PageRequest`] and echoed back into
/// [`crate::feed::FeedEngine::apply_response`] by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestToken {
    generation: Generation,
    page: u32,
}

impl RequestToken {
    /// Create a token for a request issued under `generation` for `page`.
    pub fn new(generation: Generation, page: u32) -> Self {
        Self { generation, page }
    }

    /// The query/reset cycle this request belongs to.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The zero-based page cursor this request asked for.
    pub fn page(&self) -> u32 {
        self.page
    }
}

// ===== Tests =====
