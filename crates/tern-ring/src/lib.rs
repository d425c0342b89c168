//! Weighted consistent hashing ring.
//!
//! This crate maps arbitrary keys to one of a weighted set of named nodes.
//! Lookups are deterministic for a fixed ring, and adding a node only remaps
//! the keys that fall on the new node's arcs instead of nearly every key as
//! modulo hashing would.
//!
//! Each node gets `replicas × weight` virtual points, placed at
//! `hash(decimal(i) ++ node)` by a pluggable 32-bit [`RingHasher`] (CRC-32 by
//! default). [`Ring::get`] returns a key's primary owner and
//! [`Ring::get_items`] returns an ordered, duplicate-free fallback list for
//! replication or failover.
//!
//! [`Ring`] does no locking of its own. Services that rebuild membership
//! while serving lookups can use [`SharedRing`], which swaps in whole new
//! rings while readers keep their snapshot.

mod config;
mod error;
mod hash;
mod ring;
mod shared;

#[cfg(test)]
mod tests;

pub use config::{DEFAULT_REPLICAS, RingConfig, RingSection};
pub use error::RingError;
pub use hash::{Blake3, Crc32, HashAlgorithm, RingHasher};
pub use ring::{Migration, Ring};
pub use shared::SharedRing;
