//! The list feed engine: fetch guard, accumulation, and orchestration.

pub mod engine;

pub use engine::{FeedEngine, FeedTuning, FetchPhase, ResponseOutcome};
