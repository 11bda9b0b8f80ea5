//! Cache coordinator that sits between consumers and the remote API.
//!
//! Owns the merge semantics for paginated summaries, single-flight
//! deduplication of detail fetches, the partial-then-upgrade record
//! lifecycle, and the notification channel consumers use to learn when an
//! upgrade lands.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::Result;
use crate::pokeapi::{Lookup, PokeApi, PokemonDetail, PokemonSummary};

use super::store::{Store, StoreBackend};

/// An in-progress fetch-and-store operation, shareable between waiters.
type DetailFuture = Shared<BoxFuture<'static, Result<PokemonDetail>>>;

/// Registry slot for one outstanding fetch. The token identifies the slot
/// so a settled waiter never evicts a newer fetch for the same key.
#[derive(Clone)]
struct Flight {
  fut: DetailFuture,
  token: Arc<()>,
}

/// Coordinator for the persisted store and the remote fetcher.
///
/// All consumer reads go through [`get_page`](Self::get_page) and
/// [`get_by_id`](Self::get_by_id); these are the only operations the
/// presentation layer calls.
pub struct CacheCoordinator<A: PokeApi, S: StoreBackend> {
  api: Arc<A>,
  backend: Arc<S>,
  /// Single-flight registry: one outstanding detail fetch per key, entries
  /// removed once the operation settles.
  inflight: Arc<Mutex<HashMap<String, Flight>>>,
  updates: broadcast::Sender<u32>,
  upgrades: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl<A: PokeApi, S: StoreBackend> CacheCoordinator<A, S> {
  pub fn new(api: A, backend: S) -> Self {
    let (updates, _) = broadcast::channel(32);
    Self {
      api: Arc::new(api),
      backend: Arc::new(backend),
      inflight: Arc::new(Mutex::new(HashMap::new())),
      updates,
      upgrades: Arc::new(Mutex::new(Vec::new())),
    }
  }

  /// Subscribe to "detail upgraded" notifications. Each event carries the
  /// id of a record whose partial entry was replaced by the full one.
  pub fn subscribe(&self) -> broadcast::Receiver<u32> {
    self.updates.subscribe()
  }

  /// One page of listing summaries.
  ///
  /// A cache hit returns a slice of the accumulated summary list; a miss
  /// fetches, merges into the store, and returns exactly the freshly
  /// fetched page. The asymmetry matches the two access patterns: replay
  /// of known pages vs. first load of a new one.
  pub async fn get_page(&self, offset: u32, limit: u32) -> Result<Vec<PokemonSummary>> {
    let mut store = self.backend.read();
    let end = offset as usize + limit as usize;

    if store.summaries.len() >= end {
      debug!(offset, limit, "page served from store");
      return Ok(store.summaries[offset as usize..end].to_vec());
    }

    let fetched = self.api.fetch_page(offset, limit).await?;
    // The store read above may be stale if another get_page fetched while
    // this one was suspended; last write wins.
    store.merge_summaries(&fetched);
    self.backend.write(&store);
    debug!(offset, limit, fetched = fetched.len(), "page merged into store");
    Ok(fetched)
  }

  /// One full or partial detail record, by id or name.
  ///
  /// Resolution order: a full record in the store wins; a known summary
  /// yields an immediate partial record plus a background upgrade; a cold
  /// miss awaits the single-flight fetch.
  pub async fn get_by_id(&self, lookup: impl Into<Lookup>) -> Result<PokemonDetail> {
    let lookup = lookup.into();
    let mut store = self.backend.read();

    if let Some(full) = find_full(&store, &lookup) {
      debug!(%lookup, "detail served from store");
      return Ok(full.clone());
    }

    if let Some(summary) = find_summary(&store, &lookup).cloned() {
      let partial = PokemonDetail::from_summary(&summary);
      store.details.insert(partial.id, partial.clone());
      self.backend.write(&store);
      debug!(id = partial.id, "returning partial record, upgrading in background");
      self.spawn_upgrade(partial.id);
      return Ok(partial);
    }

    self.fetch_and_store(&lookup).await
  }

  /// Wait until every background upgrade spawned so far has settled.
  pub async fn wait_for_upgrades(&self) {
    let handles: Vec<JoinHandle<()>> = {
      let mut upgrades = self
        .upgrades
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
      upgrades.drain(..).collect()
    };
    for handle in handles {
      let _ = handle.await;
    }
  }

  /// Fire-and-forget upgrade of a partial record to the full one. Failures
  /// are logged; the partial record stays authoritative until a later
  /// access retries.
  fn spawn_upgrade(&self, id: u32) {
    let this = self.clone();
    let handle = tokio::spawn(async move {
      if let Err(e) = this.fetch_and_store(&Lookup::Id(id)).await {
        warn!(id, error = %e, "background upgrade failed");
      }
    });
    self
      .upgrades
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .push(handle);
  }

  /// Single-flight wrapper around [`fetch_into_store`](Self::fetch_into_store):
  /// concurrent requests for the same key share one in-progress operation.
  async fn fetch_and_store(&self, lookup: &Lookup) -> Result<PokemonDetail> {
    let key = lookup.key();

    let flight = {
      let mut inflight = self
        .inflight
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
      match inflight.get(&key) {
        Some(existing) => {
          debug!(%key, "joining in-flight fetch");
          existing.clone()
        }
        None => {
          let this = self.clone();
          let wanted = lookup.clone();
          let flight = Flight {
            fut: async move { this.fetch_into_store(&wanted).await }.boxed().shared(),
            token: Arc::new(()),
          };
          inflight.insert(key.clone(), flight.clone());
          flight
        }
      }
    };

    let result = flight.fut.clone().await;

    // Remove the settled entry unless a newer fetch for the same key has
    // already replaced it.
    let mut inflight = self
      .inflight
      .lock()
      .unwrap_or_else(PoisonError::into_inner);
    if inflight
      .get(&key)
      .is_some_and(|current| Arc::ptr_eq(&current.token, &flight.token))
    {
      inflight.remove(&key);
    }

    result
  }

  async fn fetch_into_store(&self, lookup: &Lookup) -> Result<PokemonDetail> {
    let detail = self.api.fetch_detail(lookup).await?;

    let mut store = self.backend.read();
    let upgraded = store.details.get(&detail.id).is_some_and(|d| d.partial);
    store.details.insert(detail.id, detail.clone());
    self.backend.write(&store);

    if upgraded {
      // send fails only when nobody is subscribed
      let _ = self.updates.send(detail.id);
      debug!(id = detail.id, "partial record upgraded");
    }

    Ok(detail)
  }
}

impl<A: PokeApi, S: StoreBackend> Clone for CacheCoordinator<A, S> {
  fn clone(&self) -> Self {
    Self {
      api: Arc::clone(&self.api),
      backend: Arc::clone(&self.backend),
      inflight: Arc::clone(&self.inflight),
      updates: self.updates.clone(),
      upgrades: Arc::clone(&self.upgrades),
    }
  }
}

fn find_full<'a>(store: &'a Store, lookup: &Lookup) -> Option<&'a PokemonDetail> {
  match lookup {
    Lookup::Id(id) => store.details.get(id).filter(|d| !d.partial),
    Lookup::Name(name) => store
      .details
      .values()
      .find(|d| !d.partial && d.name.eq_ignore_ascii_case(name)),
  }
}

fn find_summary<'a>(store: &'a Store, lookup: &Lookup) -> Option<&'a PokemonSummary> {
  match lookup {
    Lookup::Id(id) => store.summaries.iter().find(|s| s.id == *id),
    Lookup::Name(name) => store
      .summaries
      .iter()
      .find(|s| s.name.eq_ignore_ascii_case(name)),
  }
}
