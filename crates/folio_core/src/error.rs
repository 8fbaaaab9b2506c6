//! Error types for registry construction and configuration loading
//!
//! Runtime engine operations (resolution, navigation) never fail; only the
//! setup paths that validate host input return these.

use std::path::PathBuf;

use thiserror::Error;

use crate::region::RegionId;

/// Errors raised while building a [`RegionRegistry`](crate::registry::RegionRegistry)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("region id must not be empty (order {order})")]
    EmptyId { order: u32 },

    #[error("duplicate region id `{0}`")]
    DuplicateId(RegionId),

    #[error("regions `{first}` and `{second}` share document order {order}")]
    DuplicateOrder {
        order: u32,
        first: RegionId,
        second: RegionId,
    },
}

/// Errors raised while loading or validating a [`SpyConfig`](crate::config::SpyConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),

    #[error("`{field}` must be a finite, non-negative number (got {value})")]
    InvalidLength { field: &'static str, value: f32 },

    #[error("`activation_margin.viewport_fraction` must be within [0, 1] (got {0})")]
    InvalidFraction(f32),
}
