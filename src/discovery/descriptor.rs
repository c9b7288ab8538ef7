//! Pool Descriptor Builder

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::chain::{read, ChainReader};
use crate::contracts::IRewardDistributor;
use crate::error::Result;

/// One pool to migrate, as persisted in the pool list.
///
/// The position of a descriptor in the list matters: the first and last
/// entries carry the bootstrap and handover transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolDescriptor {
    pub gauge: Address,
    pub vault: Address,
    pub reward_distributor: Address,
}

/// Resolve the vault staked in `reward_distributor`.
///
/// The vault is not probed further; a vault that cannot be migrated fails
/// later, when its transaction is built.
pub async fn build_descriptor<R>(
    reader: &R,
    gauge: Address,
    reward_distributor: Address,
) -> Result<PoolDescriptor>
where
    R: ChainReader + ?Sized,
{
    let vault = read(reader, reward_distributor, IRewardDistributor::staking_tokenCall {}).await?;

    Ok(PoolDescriptor {
        gauge,
        vault,
        reward_distributor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::mock::MockChain;
    use alloy_primitives::address;

    #[tokio::test]
    async fn test_resolves_vault_from_staking_token() {
        let gauge = address!("00000000000000000000000000000000000000aa");
        let rd = address!("00000000000000000000000000000000000000bb");
        let vault = address!("00000000000000000000000000000000000000cc");

        let mut chain = MockChain::new();
        chain.on(rd, IRewardDistributor::staking_tokenCall {}, vault);

        let descriptor = build_descriptor(&chain, gauge, rd).await.unwrap();
        assert_eq!(
            descriptor,
            PoolDescriptor {
                gauge,
                vault,
                reward_distributor: rd
            }
        );
        assert_eq!(chain.call_count(), 1);
    }

    #[test]
    fn test_json_keys() {
        let descriptor = PoolDescriptor {
            gauge: Address::with_last_byte(1),
            vault: Address::with_last_byte(2),
            reward_distributor: Address::with_last_byte(3),
        };
        let value = serde_json::to_value(descriptor).unwrap();
        let obj = value.as_object().unwrap();

        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["gauge", "rewardDistributor", "vault"]);
    }
}
