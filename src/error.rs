//! Error types for the engine's fallible boundaries.
//!
//! Gameplay rejections (unaffordable purchase, locked node, ...) are not
//! errors: they return `false` and leave the session untouched. These types
//! cover startup validation, configuration parsing and storage I/O.

use thiserror::Error;

/// A static catalog that can never be played correctly.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },

    #[error("prestige node `{node}` requires unknown node `{missing}`")]
    UnknownRequirement { node: String, missing: String },

    #[error("prestige requirement cycle through `{0}`")]
    Cycle(String),

    #[error("prestige node `{node}` targets unknown upgrade `{target}`")]
    UnknownTarget { node: String, target: String },

    #[error("{kind} `{id}` references unknown upgrade `{upgrade}`")]
    UnknownUpgrade {
        kind: &'static str,
        id: String,
        upgrade: String,
    },

    #[error("upgrade `{id}` has an invalid cost curve (base {base_cost}, growth {growth})")]
    InvalidCostCurve {
        id: String,
        base_cost: f64,
        growth: f64,
    },

    #[error("upgrade `{id}` belongs to tier {tier}, which is not defined")]
    UnknownTier { id: String, tier: usize },
}

/// Failure talking to the key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable")]
    Unavailable,

    #[error("storage backend rejected `{key}`: {reason}")]
    Backend { key: String, reason: String },

    #[error("failed to serialize save data: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Malformed engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid engine config: {0}")]
    Invalid(String),
}

/// Anything that prevents a session from starting.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
