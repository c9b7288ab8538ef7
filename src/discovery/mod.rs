//! Pool Discovery
//!
//! Registry Reader -> Eligibility Filter -> Pool Descriptor Builder.
//!
//! The output is the ordered pool list consumed by batch generation in a
//! separate run. Order is registry index order, filtered.

mod descriptor;
mod eligibility;
mod registry;

pub use descriptor::{build_descriptor, PoolDescriptor};
pub use eligibility::{check_eligibility, Blacklist, Eligibility};
pub use registry::{RegisteredPool, RegistryReader, RegistrySnapshot};

use alloy_primitives::Address;
use tracing::{debug, info, warn};

use crate::chain::ChainReader;
use crate::error::Result;

/// Addresses and filter inputs for one discovery run
#[derive(Debug, Clone)]
pub struct DiscoverySettings {
    pub controller: Address,
    /// Strategy whose `multiGauges` mapping links gauges to distributors
    pub strategy: Address,
    pub blacklist: Blacklist,
    pub concurrency: usize,
}

#[derive(Debug, Clone, Default)]
pub struct DiscoveryReport {
    pub registered: u64,
    pub not_migrated: u64,
    pub empty: usize,
    pub blacklisted: usize,
    pub descriptors: Vec<PoolDescriptor>,
}

impl DiscoveryReport {
    pub fn summary(&self) -> String {
        format!(
            "{} registered, {} without multi-gauge, {} empty, {} fully blacklisted, {} to migrate",
            self.registered,
            self.not_migrated,
            self.empty,
            self.blacklisted,
            self.descriptors.len()
        )
    }
}

pub struct PoolDiscovery<'a, R: ?Sized> {
    reader: &'a R,
    settings: DiscoverySettings,
}

impl<'a, R: ChainReader + ?Sized> PoolDiscovery<'a, R> {
    pub fn new(reader: &'a R, settings: DiscoverySettings) -> Self {
        Self { reader, settings }
    }

    pub async fn run(&self) -> Result<DiscoveryReport> {
        let snapshot = RegistryReader::new(self.reader, self.settings.controller, self.settings.strategy)
            .with_concurrency(self.settings.concurrency)
            .discover_pools()
            .await?;

        let mut report = DiscoveryReport {
            registered: snapshot.pool_count,
            not_migrated: snapshot.not_migrated(),
            ..Default::default()
        };

        for pool in &snapshot.pools {
            let verdict =
                check_eligibility(self.reader, pool.reward_distributor, &self.settings.blacklist)
                    .await?;

            match verdict {
                Eligibility::EmptyPool => {
                    debug!("#{} {} skipped: {}", pool.index, pool.reward_distributor, verdict);
                    report.empty += 1;
                }
                Eligibility::FullyBlacklisted { total_supply } => {
                    warn!(
                        "#{} {} excluded: {} (supply {} held by test addresses)",
                        pool.index, pool.reward_distributor, verdict, total_supply
                    );
                    report.blacklisted += 1;
                }
                Eligibility::Eligible { .. } => {
                    let descriptor =
                        build_descriptor(self.reader, pool.gauge, pool.reward_distributor).await?;
                    debug!("#{} vault {} selected", pool.index, descriptor.vault);
                    report.descriptors.push(descriptor);
                }
            }
        }

        info!("Discovery complete: {}", report.summary());
        Ok(report)
    }
}
