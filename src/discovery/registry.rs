//! Registry Reader
//!
//! Walks the gauge controller in ascending index order and resolves each
//! gauge to the reward distributor the old strategy attached to it.

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use crate::chain::{read, ChainReader};
use crate::contracts::{IGaugeController, IOldStrategy};
use crate::error::{MigrationError, Result};

/// A registry entry that has been moved to a multi-gauge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredPool {
    pub index: u64,
    pub gauge: Address,
    pub reward_distributor: Address,
}

/// Result of one full enumeration pass
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    /// `n_gauges` as read at the start of the pass
    pub pool_count: u64,
    /// Entries with a non-zero reward distributor, in index order
    pub pools: Vec<RegisteredPool>,
}

impl RegistrySnapshot {
    /// Indices skipped because their gauge has no multi-gauge yet
    pub fn not_migrated(&self) -> u64 {
        self.pool_count - self.pools.len() as u64
    }
}

pub struct RegistryReader<'a, R: ?Sized> {
    reader: &'a R,
    controller: Address,
    strategy: Address,
    concurrency: usize,
}

impl<'a, R: ChainReader + ?Sized> RegistryReader<'a, R> {
    pub fn new(reader: &'a R, controller: Address, strategy: Address) -> Self {
        Self {
            reader,
            controller,
            strategy,
            concurrency: 1,
        }
    }

    /// Allow up to `concurrency` indices to be resolved at once.
    /// Results are still yielded in index order.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub async fn pool_count(&self) -> Result<u64> {
        let count = read(self.reader, self.controller, IGaugeController::n_gaugesCall {}).await?;

        u64::try_from(count).map_err(|_| MigrationError::ChainRead {
            contract: self.controller,
            method: IGaugeController::n_gaugesCall::SIGNATURE,
            reason: format!("invalid gauge count {}", count),
        })
    }

    /// Enumerate every registry index once. Any failed read aborts the pass.
    pub async fn discover_pools(&self) -> Result<RegistrySnapshot> {
        let pool_count = self.pool_count().await?;
        info!(
            "Registry {} lists {} gauges (concurrency {})",
            self.controller, pool_count, self.concurrency
        );

        // `buffered` keeps output order equal to input order regardless of
        // which call finishes first.
        let resolved: Vec<Option<RegisteredPool>> = stream::iter(0..pool_count)
            .map(|index| self.resolve_index(index))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let pools: Vec<RegisteredPool> = resolved.into_iter().flatten().collect();
        info!(
            "{} of {} gauges have a reward distributor",
            pools.len(),
            pool_count
        );

        Ok(RegistrySnapshot { pool_count, pools })
    }

    async fn resolve_index(&self, index: u64) -> Result<Option<RegisteredPool>> {
        let gauge = read(
            self.reader,
            self.controller,
            IGaugeController::gaugesCall { arg0: U256::from(index) },
        )
        .await?;

        let reward_distributor =
            read(self.reader, self.strategy, IOldStrategy::multiGaugesCall { gauge }).await?;

        if reward_distributor == Address::ZERO {
            debug!("#{} gauge {} not migrated to a multi-gauge, skipping", index, gauge);
            return Ok(None);
        }

        debug!("#{} gauge {} -> distributor {}", index, gauge, reward_distributor);
        Ok(Some(RegisteredPool {
            index,
            gauge,
            reward_distributor,
        }))
    }
}
