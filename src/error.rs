//! Error types shared by discovery and batch generation.
//!
//! Every failure is fatal for the current run. Excluded pools ("empty pool",
//! "fully blacklisted") are not errors and never show up here.

use alloy_primitives::Address;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = MigrationError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum MigrationError {
    /// RPC/network failure, revert or undecodable return on a read
    #[error("chain read failed: {method} on {contract}: {reason}")]
    ChainRead {
        contract: Address,
        method: &'static str,
        reason: String,
    },

    /// Call data could not be built for a transaction
    #[error("failed to encode {method} for {contract}: {reason}")]
    Encode {
        contract: Address,
        method: &'static str,
        reason: String,
    },

    /// Missing or invalid configuration, detected before any chain call
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("artifact {}: {source}", path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact {} is not valid JSON: {source}", path.display())]
    ArtifactFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl MigrationError {
    pub fn config(msg: impl Into<String>) -> Self {
        MigrationError::Configuration(msg.into())
    }

    /// Short tag used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            MigrationError::ChainRead { .. } => "ChainReadFailure",
            MigrationError::Encode { .. } => "EncodeFailure",
            MigrationError::Configuration(_) => "ConfigurationError",
            MigrationError::Artifact { .. } | MigrationError::ArtifactFormat { .. } => {
                "ArtifactError"
            }
        }
    }
}
