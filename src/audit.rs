//! Reward distributor audit
//!
//! After the batches are executed every extra reward token on a migrated
//! gauge should be distributed by the new strategy. This walks the registry
//! through the new strategy's `rewardDistributors` mapping and reports the
//! tokens that still point elsewhere.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::chain::{read, ChainReader};
use crate::contracts::{IGaugeController, INewStrategy, IRewardDistributor};
use crate::discovery::RegistryReader;
use crate::error::Result;

#[derive(Debug, Clone, Copy)]
pub struct AuditSettings {
    pub controller: Address,
    pub new_strategy: Address,
    /// Reward token distributed by its own contract, never by the strategy
    pub governance_token: Option<Address>,
}

/// A reward token whose distributor is not the new strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributorMismatch {
    pub gauge: Address,
    pub reward_distributor: Address,
    pub reward_token: Address,
    pub distributor: Address,
}

pub struct RewardDistributorAudit<'a, R: ?Sized> {
    reader: &'a R,
    settings: AuditSettings,
}

impl<'a, R: ChainReader + ?Sized> RewardDistributorAudit<'a, R> {
    pub fn new(reader: &'a R, settings: AuditSettings) -> Self {
        Self { reader, settings }
    }

    pub async fn run(&self) -> Result<Vec<DistributorMismatch>> {
        let controller = self.settings.controller;
        let pool_count = RegistryReader::new(self.reader, controller, self.settings.new_strategy)
            .pool_count()
            .await?;

        let mut mismatches = Vec::new();
        for index in 0..pool_count {
            let gauge = read(
                self.reader,
                controller,
                IGaugeController::gaugesCall { arg0: U256::from(index) },
            )
            .await?;

            let reward_distributor = read(
                self.reader,
                self.settings.new_strategy,
                INewStrategy::rewardDistributorsCall { gauge },
            )
            .await?;
            if reward_distributor == Address::ZERO {
                continue;
            }

            mismatches.extend(self.audit_pool(gauge, reward_distributor).await?);
        }

        info!(
            "Audited {} gauges: {} reward tokens not distributed by {}",
            pool_count,
            mismatches.len(),
            self.settings.new_strategy
        );
        Ok(mismatches)
    }

    async fn audit_pool(&self, gauge: Address, reward_distributor: Address) -> Result<Vec<DistributorMismatch>> {
        let reward_count =
            read(self.reader, reward_distributor, IRewardDistributor::reward_countCall {}).await?;

        let mut found = Vec::new();
        let mut j = U256::ZERO;
        while j < reward_count {
            let reward_token = read(
                self.reader,
                reward_distributor,
                IRewardDistributor::reward_tokensCall { arg0: j },
            )
            .await?;
            j += U256::from(1u64);

            if Some(reward_token) == self.settings.governance_token {
                continue;
            }

            let data = read(
                self.reader,
                reward_distributor,
                IRewardDistributor::reward_dataCall { arg0: reward_token },
            )
            .await?;

            if data.distributor != self.settings.new_strategy {
                debug!(
                    "{}: reward {} distributed by {}",
                    reward_distributor, reward_token, data.distributor
                );
                found.push(DistributorMismatch {
                    gauge,
                    reward_distributor,
                    reward_token,
                    distributor: data.distributor,
                });
            }
        }
        Ok(found)
    }
}
