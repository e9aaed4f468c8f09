//! Incremental list feed engine (pagefeed).
//!
//! One *feed* is a paginated, filterable, searchable list instance: an
//! admin orders table, a product catalog, a user directory. This crate
//! owns the state machinery those lists share — accumulated items,
//! loading phases, end-of-data detection, debounced search, and
//! viewport-driven page requests — behind a narrow data-source contract.
//!
//! The engine follows a Pure Core / Impure Shell architecture: it is
//! sans-IO and poll-driven. Every operation that needs a network round
//! trip returns a [`source::PageRequest`] for the shell to execute; the
//! shell feeds the outcome back via [`feed::FeedEngine::apply_response`].
//! All transitions are synchronous and deterministic, which makes the
//! single-flight and stale-response invariants directly testable.

pub mod adapters;
pub mod config;
pub mod debounce;
pub mod feed;
pub mod logging;
pub mod model;
pub mod query;
pub mod sentinel;
pub mod source;
