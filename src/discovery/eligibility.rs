//! Eligibility Filter
//!
//! A pool is migrated only if its reward distributor has stake, and that
//! stake is not entirely held by blacklisted test depositors.

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

use crate::chain::{read, ChainReader};
use crate::contracts::IRewardDistributor;
use crate::error::{MigrationError, Result};

// ============================================
// BLACKLIST
// ============================================

/// Test depositor addresses, normalized at ingestion.
///
/// Entries are lowercased before parsing so checksum casing in config can
/// never change membership. Duplicates are dropped, first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
    addresses: Vec<Address>,
}

impl Blacklist {
    pub fn new(addresses: impl IntoIterator<Item = Address>) -> Self {
        let mut seen = HashSet::new();
        let addresses = addresses
            .into_iter()
            .filter(|a| seen.insert(*a))
            .collect();
        Self { addresses }
    }

    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        let mut addresses = Vec::with_capacity(entries.len());
        for entry in entries {
            let raw = entry.as_ref().trim();
            if raw.is_empty() {
                continue;
            }
            let address: Address = raw.to_lowercase().parse().map_err(|e| {
                MigrationError::config(format!("invalid blacklist address {:?}: {}", raw, e))
            })?;
            addresses.push(address);
        }
        Ok(Self::new(addresses))
    }

    #[cfg(test)]
    pub fn contains(&self, address: &Address) -> bool {
        self.addresses.contains(address)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.addresses.iter()
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

// ============================================
// VERDICT
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible {
        total_supply: U256,
        blacklist_balance: U256,
    },
    /// Zero total supply
    EmptyPool,
    /// Non-zero supply held entirely by blacklisted addresses
    FullyBlacklisted { total_supply: U256 },
}

impl Eligibility {
    /// Pure verdict from the two sums read on chain
    pub fn classify(total_supply: U256, blacklist_balance: U256) -> Self {
        if total_supply.is_zero() {
            Eligibility::EmptyPool
        } else if !blacklist_balance.is_zero() && blacklist_balance == total_supply {
            Eligibility::FullyBlacklisted { total_supply }
        } else {
            Eligibility::Eligible {
                total_supply,
                blacklist_balance,
            }
        }
    }

    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible { .. })
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Eligibility::Eligible { .. } => "eligible",
            Eligibility::EmptyPool => "empty pool",
            Eligibility::FullyBlacklisted { .. } => "fully blacklisted",
        }
    }
}

impl fmt::Display for Eligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

// ============================================
// FILTER
// ============================================

pub async fn check_eligibility<R>(
    reader: &R,
    reward_distributor: Address,
    blacklist: &Blacklist,
) -> Result<Eligibility>
where
    R: ChainReader + ?Sized,
{
    let total_supply = read(reader, reward_distributor, IRewardDistributor::totalSupplyCall {}).await?;

    // No balance lookups for empty pools
    if total_supply.is_zero() {
        return Ok(Eligibility::EmptyPool);
    }

    let mut blacklist_balance = U256::ZERO;
    for account in blacklist.iter() {
        let balance = read(
            reader,
            reward_distributor,
            IRewardDistributor::balanceOfCall { account: *account },
        )
        .await?;
        blacklist_balance = blacklist_balance.checked_add(balance).ok_or_else(|| {
            MigrationError::ChainRead {
                contract: reward_distributor,
                method: IRewardDistributor::balanceOfCall::SIGNATURE,
                reason: format!("blacklist balances overflow at {}", account),
            }
        })?;
    }

    debug!(
        "{}: totalSupply {}, blacklisted {}",
        reward_distributor, total_supply, blacklist_balance
    );

    Ok(Eligibility::classify(total_supply, blacklist_balance))
}
