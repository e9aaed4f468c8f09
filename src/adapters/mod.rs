//! Entity-specific feed facades.
//!
//! Each adapter owns one [`FeedEngine`](crate::feed::FeedEngine) configured
//! with the filter keys its entity supports, and exposes the entity's
//! optimistic mutations as typed operations. Everything generic — search
//! input, polling, response application, sentinel events — goes through
//! [`engine_mut`](orders::OrdersFeed::engine_mut) unchanged; the adapters
//! add only what the entity adds.

pub mod orders;
pub mod products;
pub mod users;

pub use orders::OrdersFeed;
pub use products::ProductsFeed;
pub use users::UsersFeed;
