//! Errors for the fallible edges of the crate: configuration and map loading.
//!
//! The tick itself never fails. Blocked moves, vanished carrots and stale
//! partners are ordinary outcomes handled inside the behavior systems.

/// Errors that can occur while setting up a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Failed to read a file from disk.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that could not be read.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse a JSON configuration file.
    #[error("failed to parse config: {0}")]
    Config(#[from] serde_json::Error),

    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A map text contained no rows.
    #[error("map has no rows")]
    EmptyMap,

    /// The map has no cell a villager could stand on.
    #[error("map has no walkable cells")]
    NoWalkableCells,
}

pub type Result<T> = std::result::Result<T, SimError>;
