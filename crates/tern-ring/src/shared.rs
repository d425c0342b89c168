//! Read-copy-update handle for rings shared between threads.

use std::borrow::Borrow;
use std::sync::{Arc, RwLock};

use tracing::info;

use crate::ring::Ring;

/// A ring that many readers can query while membership changes.
///
/// Readers take a cheap [`snapshot`](Self::snapshot) and keep using it for as
/// long as they like. Membership changes build a complete new [`Ring`] off to
/// the side and swap it in, so a reader never sees a half-built ring and a
/// rebuild never waits for in-flight lookups.
pub struct SharedRing {
    current: RwLock<Arc<Ring>>,
}

impl SharedRing {
    /// Wrap an existing ring.
    pub fn new(ring: Ring) -> Self {
        Self {
            current: RwLock::new(Arc::new(ring)),
        }
    }

    /// Return the current ring state.
    pub fn snapshot(&self) -> Arc<Ring> {
        Arc::clone(&self.current.read().expect("lock poisoned"))
    }

    /// Install `ring` as the current state, returning the previous one.
    pub fn replace(&self, ring: Ring) -> Arc<Ring> {
        let points = ring.point_count();
        let nodes = ring.node_count();
        let previous = {
            let mut current = self.current.write().expect("lock poisoned");
            std::mem::replace(&mut *current, Arc::new(ring))
        };
        info!(points, nodes, "ring replaced");
        previous
    }

    /// Build a fresh ring with exactly `weights` and swap it in.
    ///
    /// The new ring keeps the current replica factor and hasher.
    pub fn rebuild<I, K, W>(&self, weights: I) -> Arc<Ring>
    where
        I: IntoIterator<Item = (K, W)>,
        K: AsRef<str>,
        W: Borrow<u32>,
    {
        let mut ring = self.snapshot().empty_like();
        ring.build(weights);
        self.replace(ring)
    }

    /// Return the node owning `key` in the current ring.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<String> {
        self.snapshot().get(key).map(str::to_owned)
    }

    /// Return the fallback list for `key` in the current ring.
    pub fn get_items(&self, key: impl AsRef<[u8]>) -> Vec<String> {
        let ring = self.snapshot();
        ring.get_items(key).into_iter().map(str::to_owned).collect()
    }

    /// Return `true` if the current ring holds no points.
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

impl From<Ring> for SharedRing {
    fn from(ring: Ring) -> Self {
        Self::new(ring)
    }
}
