//! TOML configuration for a ring.
//!
//! ```toml
//! [ring]
//! replicas = 160
//! hash = "crc32"
//!
//! [nodes]
//! "cache-a:11211" = 1
//! "cache-b:11211" = 2
//! ```
//!
//! Every section is optional. The `[nodes]` table is the initial membership
//! handed to [`Ring::build`](crate::Ring::build); services that discover
//! members at runtime usually leave it empty.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::RingError;
use crate::hash::HashAlgorithm;

/// Replica factor used when none is configured.
pub const DEFAULT_REPLICAS: u32 = 128;

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RingConfig {
    /// Ring parameters.
    pub ring: RingSection,
    /// Initial membership: node name -> weight.
    pub nodes: BTreeMap<String, u32>,
}

/// `[ring]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RingSection {
    /// Points per unit of weight.
    pub replicas: Option<u32>,
    /// Hash algorithm: `"crc32"` (default) or `"blake3"`.
    pub hash: Option<HashAlgorithm>,
}

impl RingConfig {
    /// Load config from a TOML file, or use defaults if no path given.
    pub fn load(path: Option<&Path>) -> Result<Self, RingError> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)?;
                Self::from_toml(&content)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse and validate config from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, RingError> {
        let config: RingConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot reject on its own.
    pub fn validate(&self) -> Result<(), RingError> {
        match self.ring.replicas {
            Some(0) => Err(RingError::InvalidReplicas(0)),
            _ => Ok(()),
        }
    }

    /// Effective replica factor.
    pub fn replicas(&self) -> u32 {
        self.ring.replicas.unwrap_or(DEFAULT_REPLICAS)
    }

    /// Effective hash algorithm.
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.ring.hash.unwrap_or_default()
    }
}
