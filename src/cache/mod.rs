//! Local caching layer between consumers and the remote PokeAPI.
//!
//! This module provides:
//! - A persisted [`Store`] of listing summaries and detail records, behind
//!   the [`StoreBackend`] seam (JSON file slot, or in-memory for tests)
//! - The [`CacheCoordinator`]: merge-on-miss page reads, single-flight
//!   detail fetches, the partial-then-upgrade record lifecycle, and
//!   upgrade notifications

mod coordinator;
mod store;

pub use coordinator::CacheCoordinator;
pub use store::{JsonFileStore, MemoryStore, Store, StoreBackend};
