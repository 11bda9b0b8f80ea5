//! Remote fetcher for the public PokeAPI.
//!
//! `PokeApi` is the seam between the cache coordinator and the network:
//! the real `PokeClient` implements it over HTTP, tests implement it with
//! scripted fakes.

pub mod api_types;
mod client;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;

pub use client::PokeClient;
pub use types::{Lookup, PokemonDetail, PokemonSummary};

/// Async source of pokemon summaries and details.
#[async_trait]
pub trait PokeApi: Send + Sync + 'static {
  /// One page from the listing endpoint, in upstream order.
  async fn fetch_page(&self, offset: u32, limit: u32) -> Result<Vec<PokemonSummary>>;

  /// One full record by numeric id or canonical name.
  async fn fetch_detail(&self, lookup: &Lookup) -> Result<PokemonDetail>;
}
