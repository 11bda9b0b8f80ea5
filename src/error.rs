//! Error taxonomy for cache and fetch operations.
//!
//! Variants carry rendered messages rather than source errors so that a
//! single in-flight fetch result can be cloned out to every waiter.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DexError {
  /// Transport failure or non-success response from the remote API.
  #[error("network error: {0}")]
  Network(String),

  /// The upstream API reports no such pokemon.
  #[error("no pokemon matching '{0}'")]
  NotFound(String),

  /// Durable storage failed. Never propagated out of the store backends;
  /// persistence is best-effort.
  #[error("storage error: {0}")]
  Storage(String),
}

pub type Result<T> = std::result::Result<T, DexError>;
