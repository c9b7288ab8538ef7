//! Migration batch generation
//!
//! Turns the persisted pool list into ordered, chunked multisig batches.
//! Everything here is pure: no chain access and no clock.

mod builder;
mod chunker;
mod relay;
mod transaction;

pub use builder::{MigrationBatchBuilder, MigrationContext};
pub use chunker::{chunk, Batch, BatchTemplate};
pub use relay::{GovernanceRelay, LockerAction};
pub use transaction::{encode_call, Transaction};
