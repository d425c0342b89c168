//! Pluggable 32-bit hash functions for ring placement.
//!
//! Every position on the ring comes from a [`RingHasher`]. The ring's balance
//! is only as good as the hasher's uniformity, so the built-ins are
//! general-purpose hashes with good avalanche behavior. Any closure of type
//! `Fn(&[u8]) -> u32` is also a hasher, which lets tests place points by hand.

use std::fmt;

use serde::Deserialize;

/// A total, deterministic mapping from bytes to a ring position.
pub trait RingHasher: Send + Sync {
    /// Hash `data` to a position on `[0, 2^32)`.
    fn hash(&self, data: &[u8]) -> u32;
}

impl<F> RingHasher for F
where
    F: Fn(&[u8]) -> u32 + Send + Sync,
{
    fn hash(&self, data: &[u8]) -> u32 {
        self(data)
    }
}

/// CRC-32 with the IEEE polynomial. The default hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Crc32;

impl RingHasher for Crc32 {
    fn hash(&self, data: &[u8]) -> u32 {
        crc32fast::hash(data)
    }
}

/// First four bytes of the BLAKE3 digest, little-endian.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3;

impl RingHasher for Blake3 {
    fn hash(&self, data: &[u8]) -> u32 {
        let digest = blake3::hash(data);
        let bytes = digest.as_bytes();
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

/// Built-in hashers selectable by name in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// [`Crc32`].
    #[default]
    Crc32,
    /// [`Blake3`].
    Blake3,
}

impl HashAlgorithm {
    /// Hash `data` with the selected algorithm.
    pub fn hash(self, data: &[u8]) -> u32 {
        match self {
            Self::Crc32 => Crc32.hash(data),
            Self::Blake3 => Blake3.hash(data),
        }
    }
}

impl RingHasher for HashAlgorithm {
    fn hash(&self, data: &[u8]) -> u32 {
        HashAlgorithm::hash(*self, data)
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crc32 => f.write_str("crc32"),
            Self::Blake3 => f.write_str("blake3"),
        }
    }
}
