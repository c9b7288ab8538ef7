//! Contract Interfaces
//!
//! Solidity interfaces for every contract role touched by the migration.
//! Only the methods the migration reads or encodes are declared.

use alloy_sol_types::sol;

// ============================================
// REGISTRY
// ============================================

sol! {
    /// Gauge controller - the registry enumerated during discovery
    interface IGaugeController {
        function n_gauges() external view returns (int128);
        function gauges(uint256 arg0) external view returns (address);
    }
}

// ============================================
// STRATEGIES
// ============================================

sol! {
    /// Strategy being migrated away from
    interface IOldStrategy {
        function multiGauges(address gauge) external view returns (address);
        function execute(address to, uint256 value, bytes calldata data)
            external returns (bool success, bytes memory result);
    }

    /// Strategy being migrated to
    interface INewStrategy {
        function rewardDistributors(address gauge) external view returns (address);
        function acceptGovernance() external;
        function execute(address to, uint256 value, bytes calldata data)
            external returns (bool success, bytes memory result);
    }
}

// ============================================
// POOL CONTRACTS
// ============================================

sol! {
    /// Multi-reward gauge distributing rewards to a vault's stakers
    interface IRewardDistributor {
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function staking_token() external view returns (address);
        function reward_count() external view returns (uint256);
        function reward_tokens(uint256 arg0) external view returns (address);
        function reward_data(address arg0) external view returns (
            address token,
            address distributor,
            uint256 period_finish,
            uint256 rate,
            uint256 last_update,
            uint256 integral
        );
        function set_reward_distributor(address _reward_token, address _distributor) external;
    }

    /// Vault holding user deposits for a single gauge
    interface IVault {
        function setCurveStrategy(address _newStrat) external;
    }
}

// ============================================
// GOVERNANCE CHAIN
// ============================================

sol! {
    /// Locker holding the protocol's locked position
    interface ILocker {
        function setStrategy(address _strategy) external;
        function setGovernance(address _governance) external;
    }

    /// Voter/executor at the top of the governance indirection chain
    interface IVoterExecutor {
        function execute(address to, uint256 value, bytes calldata data)
            external returns (bool success, bytes memory result);
    }
}
