/// Pool state and derived lifecycle types for the keeper and UI layers

use serde::{Deserialize, Serialize};
use std::fmt;
use crate::constants::*;

// ============================================================================
// Pool Status
// ============================================================================

/// On-chain pool status as written by the contract and mirrored by the indexer.
///
/// Values the client does not know are kept verbatim in `Unrecognized` so that
/// a newly deployed status surfaces as an explicit unknown state downstream
/// instead of being coerced into a known one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PoolStatus {
    Active,
    RebalancingOffchain,
    RebalancingOnchain,
    Halted,
    Unrecognized(String),
}

impl PoolStatus {
    /// Wire representation used by the contract and the subgraph
    pub fn as_str(&self) -> &str {
        match self {
            PoolStatus::Active => POOL_STATUS_ACTIVE,
            PoolStatus::RebalancingOffchain => POOL_STATUS_REBALANCING_OFFCHAIN,
            PoolStatus::RebalancingOnchain => POOL_STATUS_REBALANCING_ONCHAIN,
            PoolStatus::Halted => POOL_STATUS_HALTED,
            PoolStatus::Unrecognized(raw) => raw,
        }
    }
}

impl From<&str> for PoolStatus {
    fn from(raw: &str) -> Self {
        match raw {
            POOL_STATUS_ACTIVE => PoolStatus::Active,
            POOL_STATUS_REBALANCING_OFFCHAIN => PoolStatus::RebalancingOffchain,
            POOL_STATUS_REBALANCING_ONCHAIN => PoolStatus::RebalancingOnchain,
            POOL_STATUS_HALTED => PoolStatus::Halted,
            other => PoolStatus::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for PoolStatus {
    fn from(raw: String) -> Self {
        PoolStatus::from(raw.as_str())
    }
}

impl From<PoolStatus> for String {
    fn from(status: PoolStatus) -> Self {
        match status {
            PoolStatus::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PoolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Pool
// ============================================================================

/// Pool snapshot as read from the subgraph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    /// Subgraph entity id (pool contract address)
    pub id: String,

    /// Current on-chain status; the indexer may omit it
    #[serde(default)]
    pub pool_status: Option<PoolStatus>,

    /// Rebalance cycle counter, advanced once per cycle by the contract
    #[serde(with = "crate::cycle_serde")]
    pub current_cycle: u64,
}

impl Pool {
    pub fn new(id: impl Into<String>, pool_status: PoolStatus, current_cycle: u64) -> Self {
        Self {
            id: id.into(),
            pool_status: Some(pool_status),
            current_cycle,
        }
    }
}

// ============================================================================
// Rebalance State
// ============================================================================

/// Lifecycle state derived from pool status and market hours.
///
/// Never persisted; recomputed from a fresh snapshot on every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RebalanceState {
    Active,
    ReadyForOffchainRebalance,
    OffchainRebalanceInProgress,
    ReadyForOnchainRebalance,
    OnchainRebalanceInProgress,
    Halted,
    Unknown,
}

impl RebalanceState {
    /// Whether the pool is taking new user and LP requests in this state
    pub fn accepts_requests(&self) -> bool {
        matches!(self, RebalanceState::Active | RebalanceState::ReadyForOffchainRebalance)
    }
}

impl fmt::Display for RebalanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RebalanceState::Active => "ACTIVE",
            RebalanceState::ReadyForOffchainRebalance => "READY_FOR_OFFCHAIN_REBALANCE",
            RebalanceState::OffchainRebalanceInProgress => "OFFCHAIN_REBALANCE_IN_PROGRESS",
            RebalanceState::ReadyForOnchainRebalance => "READY_FOR_ONCHAIN_REBALANCE",
            RebalanceState::OnchainRebalanceInProgress => "ONCHAIN_REBALANCE_IN_PROGRESS",
            RebalanceState::Halted => "HALTED",
            RebalanceState::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_status_parsing() {
        assert_eq!(PoolStatus::from("ACTIVE"), PoolStatus::Active);
        assert_eq!(PoolStatus::from("REBALANCING_OFFCHAIN"), PoolStatus::RebalancingOffchain);
        assert_eq!(PoolStatus::from("REBALANCING_ONCHAIN"), PoolStatus::RebalancingOnchain);
        assert_eq!(PoolStatus::from("HALTED"), PoolStatus::Halted);

        // Case matters: the contract emits upper-case values only
        let status = PoolStatus::from("active");
        assert_eq!(status, PoolStatus::Unrecognized("active".to_string()));
    }

    #[test]
    fn test_pool_from_subgraph_json() {
        let json = r#"{"id":"0xabc","poolStatus":"REBALANCING_ONCHAIN","currentCycle":"12"}"#;
        let pool: Pool = serde_json::from_str(json).unwrap();
        assert_eq!(pool.id, "0xabc");
        assert_eq!(pool.pool_status, Some(PoolStatus::RebalancingOnchain));
        assert_eq!(pool.current_cycle, 12);

        let json = r#"{"id":"0xabc","poolStatus":null,"currentCycle":3}"#;
        let pool: Pool = serde_json::from_str(json).unwrap();
        assert_eq!(pool.pool_status, None);
        assert_eq!(pool.current_cycle, 3);

        let json = r#"{"id":"0xabc","poolStatus":"MIGRATING","currentCycle":"1"}"#;
        let pool: Pool = serde_json::from_str(json).unwrap();
        assert_eq!(pool.pool_status, Some(PoolStatus::Unrecognized("MIGRATING".to_string())));
    }

    #[test]
    fn test_invalid_cycle_rejected() {
        let json = r#"{"id":"0xabc","poolStatus":"ACTIVE","currentCycle":"-1"}"#;
        assert!(serde_json::from_str::<Pool>(json).is_err());
    }

    #[test]
    fn test_unrecognized_status_serializes_verbatim() {
        let pool = Pool::new("0x1", PoolStatus::Unrecognized("MIGRATING".to_string()), 4);
        let json = serde_json::to_value(&pool).unwrap();
        assert_eq!(json["poolStatus"], "MIGRATING");
        assert_eq!(json["currentCycle"], 4);
    }

    #[test]
    fn test_rebalance_state_display_matches_serde() {
        let state = RebalanceState::ReadyForOnchainRebalance;
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, format!("\"{}\"", state));
    }
}
