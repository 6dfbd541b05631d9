//! Cached suggestion population.

use std::sync::Arc;

use ball_knowledge_rules::Candidate;
use tracing::{debug, info, instrument, warn};

use crate::snapshot::Snapshot;
use crate::store::GameStore;

/// Where the cached population came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolSource {
    /// Read from the store.
    Store,
    /// Taken from the local snapshot.
    Snapshot,
}

/// Suggestion population built on first use and kept until invalidated.
///
/// Owned by whoever serves requests; there is no shared global copy.
#[derive(Debug, Default)]
pub struct SuggestionPool {
    cached: Option<(Arc<Vec<Candidate>>, PoolSource)>,
}

impl SuggestionPool {
    /// An empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a population is cached.
    pub fn is_built(&self) -> bool {
        self.cached.is_some()
    }

    /// Source of the cached population, if any.
    pub fn source(&self) -> Option<PoolSource> {
        self.cached.as_ref().map(|(_, source)| *source)
    }

    /// Returns the cached population, building it first if needed.
    ///
    /// Reads the store when present; a failing or empty store falls back to
    /// the snapshot. A snapshot-built pool is rebuilt from the store on the
    /// next call once the store answers again.
    #[instrument(skip(self, store, snapshot))]
    pub fn get_or_build(
        &mut self,
        store: Option<&dyn GameStore>,
        snapshot: &Snapshot,
    ) -> Arc<Vec<Candidate>> {
        if let Some((population, source)) = &self.cached {
            if *source == PoolSource::Store || store.is_none() {
                debug!(count = population.len(), "Suggestion pool cache hit");
                return Arc::clone(population);
            }
        }

        let from_store = store.and_then(|s| match s.population() {
            Ok(population) if !population.is_empty() => Some(population),
            Ok(_) => {
                debug!("Store population empty, using snapshot");
                None
            }
            Err(e) => {
                warn!(error = %e, "Store population unavailable, using snapshot");
                None
            }
        });

        let (population, source) = match from_store {
            Some(population) => (population, PoolSource::Store),
            None => (snapshot.candidates(), PoolSource::Snapshot),
        };
        info!(count = population.len(), ?source, "Suggestion pool built");

        let population = Arc::new(population);
        self.cached = Some((Arc::clone(&population), source));
        population
    }

    /// Drops the cached population; the next call rebuilds it.
    #[instrument(skip(self))]
    pub fn invalidate(&mut self) {
        if self.cached.take().is_some() {
            debug!("Suggestion pool invalidated");
        }
    }
}
