//! Strategy migration tooling for the Curve liquid locker.
//!
//! Discovery reads the gauge registry and writes the list of pools to move.
//! Generation turns that list into chunked multisig batches without touching
//! the chain.

pub mod artifact;
pub mod audit;
pub mod batch;
pub mod chain;
pub mod config;
pub mod contracts;
pub mod discovery;
pub mod error;

pub use config::Config;
pub use error::{MigrationError, Result};
