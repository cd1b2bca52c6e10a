//! # Rebalance State Classification
//!
//! Maps a pool's on-chain status and the market session to the lifecycle
//! state the UI and keeper act on. The result says what should happen next;
//! the transition itself is performed by the contract and LPs.

use serde::Serialize;
use synthpool_types::{Pool, PoolStatus, RebalanceState};
use tracing::warn;

/// Output of [`classify`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceClassification {
    pub rebalance_state: RebalanceState,
}

/// Classify a pool snapshot.
///
/// | status               | market open | state                            |
/// |----------------------|-------------|----------------------------------|
/// | pool/status missing  | any         | `ACTIVE`                         |
/// | ACTIVE               | true        | `READY_FOR_OFFCHAIN_REBALANCE`   |
/// | ACTIVE               | false       | `ACTIVE`                         |
/// | REBALANCING_OFFCHAIN | true        | `OFFCHAIN_REBALANCE_IN_PROGRESS` |
/// | REBALANCING_OFFCHAIN | false       | `READY_FOR_ONCHAIN_REBALANCE`    |
/// | REBALANCING_ONCHAIN  | any         | `ONCHAIN_REBALANCE_IN_PROGRESS`  |
/// | HALTED               | any         | `HALTED`                         |
/// | anything else        | any         | `UNKNOWN`                        |
pub fn classify(pool: Option<&Pool>, is_market_open: bool) -> RebalanceClassification {
    let status = pool.and_then(|p| p.pool_status.as_ref());
    RebalanceClassification {
        rebalance_state: classify_status(status, is_market_open),
    }
}

/// Status-only form of [`classify`]
pub fn classify_status(status: Option<&PoolStatus>, is_market_open: bool) -> RebalanceState {
    match (status, is_market_open) {
        (None, _) => RebalanceState::Active,
        (Some(PoolStatus::Active), true) => RebalanceState::ReadyForOffchainRebalance,
        (Some(PoolStatus::Active), false) => RebalanceState::Active,
        (Some(PoolStatus::RebalancingOffchain), true) => RebalanceState::OffchainRebalanceInProgress,
        (Some(PoolStatus::RebalancingOffchain), false) => RebalanceState::ReadyForOnchainRebalance,
        (Some(PoolStatus::RebalancingOnchain), _) => RebalanceState::OnchainRebalanceInProgress,
        (Some(PoolStatus::Halted), _) => RebalanceState::Halted,
        (Some(PoolStatus::Unrecognized(raw)), _) => {
            warn!(pool_status = %raw, "Unrecognized pool status from indexer, reporting UNKNOWN");
            RebalanceState::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(status: PoolStatus) -> Pool {
        Pool::new("0xpool", status, 5)
    }

    fn state(pool: Option<&Pool>, open: bool) -> RebalanceState {
        classify(pool, open).rebalance_state
    }

    #[test]
    fn test_missing_pool_defaults_to_active() {
        assert_eq!(state(None, true), RebalanceState::Active);
        assert_eq!(state(None, false), RebalanceState::Active);

        let mut p = pool(PoolStatus::Halted);
        p.pool_status = None;
        assert_eq!(state(Some(&p), true), RebalanceState::Active);
    }

    #[test]
    fn test_active_pool() {
        let p = pool(PoolStatus::Active);
        assert_eq!(state(Some(&p), true), RebalanceState::ReadyForOffchainRebalance);
        assert_eq!(state(Some(&p), false), RebalanceState::Active);
    }

    #[test]
    fn test_offchain_rebalancing_pool() {
        let p = pool(PoolStatus::RebalancingOffchain);
        assert_eq!(state(Some(&p), true), RebalanceState::OffchainRebalanceInProgress);
        assert_eq!(state(Some(&p), false), RebalanceState::ReadyForOnchainRebalance);
    }

    #[test]
    fn test_onchain_rebalancing_ignores_market() {
        let p = pool(PoolStatus::RebalancingOnchain);
        assert_eq!(state(Some(&p), true), RebalanceState::OnchainRebalanceInProgress);
        assert_eq!(state(Some(&p), false), RebalanceState::OnchainRebalanceInProgress);
    }

    #[test]
    fn test_halted_pool() {
        let p = pool(PoolStatus::Halted);
        assert_eq!(state(Some(&p), true), RebalanceState::Halted);
        assert_eq!(state(Some(&p), false), RebalanceState::Halted);
    }

    #[test]
    fn test_unrecognized_status_is_unknown_not_active() {
        let p = pool(PoolStatus::from("PAUSED_FOR_UPGRADE"));
        assert_eq!(state(Some(&p), true), RebalanceState::Unknown);
        assert_eq!(state(Some(&p), false), RebalanceState::Unknown);
    }

    #[test]
    fn test_classification_serializes_camel_case() {
        let json = serde_json::to_value(classify(None, false)).unwrap();
        assert_eq!(json["rebalanceState"], "ACTIVE");
    }
}
