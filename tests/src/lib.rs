//! Shared test harness for Tern integration tests.
//!
//! Provides [`TestCluster`], a stand-in for the upstream component that
//! discovers node weights and republishes the ring on every membership
//! change, plus helpers for keys and log output.

use std::collections::BTreeMap;
use std::sync::{Arc, Once};

use tern_ring::{Ring, SharedRing};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Replica factor for test rings.
pub const TEST_REPLICAS: u32 = 160;

static TRACING: Once = Once::new();

/// Install a console subscriber once per test binary.
///
/// Honors `RUST_LOG`; defaults to `warn` so test output stays quiet.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// `n` distinct lookup keys.
pub fn test_keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("object/{i:06}")).collect()
}

/// Membership source driving a [`SharedRing`].
///
/// Every mutation republishes a freshly built ring with the full current
/// weight map, the way a discovery service would after a change.
pub struct TestCluster {
    weights: BTreeMap<String, u32>,
    ring: Arc<SharedRing>,
}

impl TestCluster {
    /// Create a cluster of `n` weight-1 nodes named `node-0`..`node-{n-1}`.
    pub fn new(n: usize) -> Self {
        Self::with_ring(n, Ring::new(TEST_REPLICAS))
    }

    /// Create a cluster of `n` weight-1 nodes publishing into `template`'s
    /// parameters.
    pub fn with_ring(n: usize, template: Ring) -> Self {
        init_tracing();
        let mut cluster = Self {
            weights: BTreeMap::new(),
            ring: Arc::new(SharedRing::new(template)),
        };
        for i in 0..n {
            cluster.weights.insert(format!("node-{i}"), 1);
        }
        cluster.publish();
        cluster
    }

    /// The ring readers should query.
    pub fn ring(&self) -> Arc<SharedRing> {
        Arc::clone(&self.ring)
    }

    /// Current membership.
    pub fn weights(&self) -> &BTreeMap<String, u32> {
        &self.weights
    }

    /// Add a node (or change its weight) and republish.
    pub fn join(&mut self, name: &str, weight: u32) -> Arc<Ring> {
        self.weights.insert(name.to_string(), weight);
        info!(node = name, weight, "test node joined");
        self.publish()
    }

    /// Remove a node and republish.
    pub fn leave(&mut self, name: &str) -> Arc<Ring> {
        self.weights.remove(name);
        info!(node = name, "test node left");
        self.publish()
    }

    /// Rebuild the shared ring from the current weights, returning the
    /// previous ring.
    pub fn publish(&self) -> Arc<Ring> {
        self.ring.rebuild(&self.weights)
    }
}
