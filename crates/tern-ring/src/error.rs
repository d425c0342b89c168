//! Error types for ring configuration.

/// Errors that can occur while configuring a ring.
///
/// Ring lookups and builds are total and never fail; only loading and
/// validating configuration can.
#[derive(Debug, thiserror::Error)]
pub enum RingError {
    /// The replica factor must be at least 1.
    #[error("invalid replica factor {0}: must be at least 1")]
    InvalidReplicas(u32),

    /// The configuration file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML or has unknown values.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}
