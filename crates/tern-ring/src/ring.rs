//! Consistent hashing ring implementation.
//!
//! [`Ring`] has no internal locking. `build` and `rebuild` take `&mut self`
//! and lookups take `&self`, so a ring shared between threads must sit behind
//! a lock or be swapped wholesale (see [`SharedRing`](crate::SharedRing)).

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::RingConfig;
use crate::error::RingError;
use crate::hash::{Crc32, RingHasher};

/// A key whose primary owner differs between two ring states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// The key that must move.
    pub key: String,
    /// Owner in the old ring (`None` if the old ring was empty).
    pub from: Option<String>,
    /// Owner in the new ring (`None` if the new ring is empty).
    pub to: Option<String>,
}

/// Weighted consistent hashing ring.
///
/// Each node is mapped to `replicas × weight` virtual points on a u32 ring.
/// A key is owned by the first point at or after its hash, wrapping past
/// `u32::MAX` back to the smallest point. Fallback lists walk clockwise from
/// there, collecting distinct nodes.
#[derive(Clone)]
pub struct Ring {
    /// Virtual points in ring order: position -> owning node.
    vnodes: BTreeMap<u32, Arc<str>>,
    /// Nodes added with a positive weight, and their latest weight.
    nodes: HashMap<Arc<str>, u32>,
    /// Base number of points per unit of weight.
    replicas: u32,
    /// Distinct nodes named by the most recent build.
    target_count: usize,
    hasher: Arc<dyn RingHasher>,
}

impl Ring {
    /// Create an empty ring using the default CRC-32 hasher.
    ///
    /// A replica factor of 0 is accepted and produces a ring that never
    /// gains points.
    pub fn new(replicas: u32) -> Self {
        Self::with_hasher(replicas, Crc32)
    }

    /// Create an empty ring with a custom hasher.
    pub fn with_hasher<H: RingHasher + 'static>(replicas: u32, hasher: H) -> Self {
        Self::with_shared_hasher(replicas, Arc::new(hasher))
    }

    /// Create an empty ring sharing an existing hasher.
    pub fn with_shared_hasher(replicas: u32, hasher: Arc<dyn RingHasher>) -> Self {
        Self {
            vnodes: BTreeMap::new(),
            nodes: HashMap::new(),
            replicas,
            target_count: 0,
            hasher,
        }
    }

    /// Create a ring from configuration, building any nodes it lists.
    pub fn from_config(config: &RingConfig) -> Result<Self, RingError> {
        config.validate()?;
        let mut ring = Self::with_hasher(config.replicas(), config.hash_algorithm());
        if !config.nodes.is_empty() {
            ring.build(&config.nodes);
        }
        Ok(ring)
    }

    /// Create an empty ring with this ring's replica factor and hasher.
    pub fn empty_like(&self) -> Self {
        Self::with_shared_hasher(self.replicas, Arc::clone(&self.hasher))
    }

    /// Add weighted nodes to the ring.
    ///
    /// For every `(node, weight)` pair, `replicas × weight` points are placed
    /// at `hash(decimal(i) ++ node)`. Existing points are kept: this is an
    /// add, not a replace. The fallback target becomes the number of distinct
    /// names in `weights`, replacing whatever the previous build set.
    ///
    /// Weight 0 contributes no points. On a point collision the later node
    /// wins.
    pub fn build<I, K, W>(&mut self, weights: I)
    where
        I: IntoIterator<Item = (K, W)>,
        K: AsRef<str>,
        W: Borrow<u32>,
    {
        let mut named: HashSet<Arc<str>> = HashSet::new();

        for (name, weight) in weights {
            let node = self.intern(name.as_ref());
            let weight = *weight.borrow();
            named.insert(Arc::clone(&node));

            if weight == 0 {
                continue;
            }

            let count = u64::from(self.replicas) * u64::from(weight);
            for i in 0..count {
                let pos = vnode_position(self.hasher.as_ref(), &node, i);
                self.vnodes.insert(pos, Arc::clone(&node));
            }

            debug!(%node, weight, points = count, "added node to ring");
            self.nodes.insert(node, weight);
        }

        self.target_count = named.len();
        debug!(
            target = self.target_count,
            points = self.vnodes.len(),
            nodes = self.nodes.len(),
            "ring built"
        );
    }

    /// Replace the ring's contents with exactly the given weighted nodes.
    pub fn rebuild<I, K, W>(&mut self, weights: I)
    where
        I: IntoIterator<Item = (K, W)>,
        K: AsRef<str>,
        W: Borrow<u32>,
    {
        self.vnodes.clear();
        self.nodes.clear();
        self.build(weights);
    }

    /// Return the node owning `key`, or `None` if the ring is empty.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&str> {
        if self.is_empty() {
            return None;
        }
        self.clockwise(key.as_ref()).next()
    }

    /// Return the distinct nodes in clockwise order starting at `key`'s owner.
    ///
    /// Stops once as many nodes as the last build named have been found, or
    /// after every point was visited. The first element equals
    /// [`get`](Self::get).
    pub fn get_items(&self, key: impl AsRef<[u8]>) -> Vec<&str> {
        if self.is_empty() {
            return Vec::new();
        }
        self.collect_distinct(key.as_ref(), self.target_count)
    }

    /// Like [`get_items`](Self::get_items) but collects at most `n` nodes.
    pub fn get_n(&self, key: impl AsRef<[u8]>, n: usize) -> Vec<&str> {
        if self.is_empty() || n == 0 {
            return Vec::new();
        }
        self.collect_distinct(key.as_ref(), n)
    }

    /// Return `true` if the ring holds no points.
    pub fn is_empty(&self) -> bool {
        self.vnodes.is_empty()
    }

    /// Compute which keys change primary owner between two ring states.
    pub fn diff<I, K>(old: &Ring, new: &Ring, keys: I) -> Vec<Migration>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut migrations = Vec::new();

        for key in keys {
            let key = key.as_ref();
            let from = old.get(key);
            let to = new.get(key);
            if from != to {
                migrations.push(Migration {
                    key: key.to_owned(),
                    from: from.map(str::to_owned),
                    to: to.map(str::to_owned),
                });
            }
        }

        migrations
    }

    /// Return the base number of points per unit of weight.
    pub fn replicas(&self) -> u32 {
        self.replicas
    }

    /// Return the number of distinct nodes named by the most recent build.
    pub fn target_count(&self) -> usize {
        self.target_count
    }

    /// Return the total number of points on the ring.
    pub fn point_count(&self) -> usize {
        self.vnodes.len()
    }

    /// Return the number of nodes added with a positive weight.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Return the latest positive weight given to `node`, if present.
    pub fn node_weight(&self, node: &str) -> Option<u32> {
        self.nodes.get(node).copied()
    }

    /// Return all node names, sorted.
    pub fn nodes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.nodes.keys().map(|n| &**n).collect();
        names.sort_unstable();
        names
    }

    /// Return the number of points owned by `node`.
    pub fn points_of(&self, node: &str) -> usize {
        self.vnodes.values().filter(|n| &***n == node).count()
    }

    /// Iterate over `(position, node)` pairs in ascending ring order.
    pub fn points(&self) -> impl Iterator<Item = (u32, &str)> {
        self.vnodes.iter().map(|(pos, node)| (*pos, &**node))
    }

    /// Walk every point once, clockwise from the first point at or after
    /// `key`'s hash.
    fn clockwise(&self, key: &[u8]) -> impl Iterator<Item = &str> {
        let pos = self.hasher.hash(key);
        let after = self.vnodes.range(pos..);
        let before = self.vnodes.range(..pos);
        after.chain(before).map(|(_, node)| &**node)
    }

    fn collect_distinct(&self, key: &[u8], limit: usize) -> Vec<&str> {
        let limit = limit.min(self.nodes.len());
        let mut seen = HashSet::with_capacity(limit);
        let mut items = Vec::with_capacity(limit);

        for node in self.clockwise(key) {
            if seen.insert(node) {
                items.push(node);
                if items.len() == limit {
                    break;
                }
            }
        }

        items
    }

    /// Reuse the ring's existing allocation for a known node name.
    fn intern(&self, name: &str) -> Arc<str> {
        match self.nodes.get_key_value(name) {
            Some((node, _)) => Arc::clone(node),
            None => Arc::from(name),
        }
    }
}

impl fmt::Debug for Ring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ring")
            .field("replicas", &self.replicas)
            .field("target_count", &self.target_count)
            .field("points", &self.vnodes.len())
            .field("nodes", &self.nodes)
            .finish_non_exhaustive()
    }
}

/// Compute a point's position: hash of the decimal replica index followed by
/// the node name.
fn vnode_position(hasher: &dyn RingHasher, node: &str, replica: u64) -> u32 {
    let mut input = replica.to_string().into_bytes();
    input.extend_from_slice(node.as_bytes());
    hasher.hash(&input)
}
