//! Action availability and banner copy for user and LP views

use serde::Serialize;
use synthpool_types::{
    RebalanceState, MSG_AWAITING_ONCHAIN_REBALANCE, MSG_OFFCHAIN_REBALANCE_IN_PROGRESS,
    MSG_ONCHAIN_REBALANCE_IN_PROGRESS, MSG_POOL_HALTED, MSG_POOL_STATE_UNKNOWN,
};

use crate::request_gate::GateDecision;

/// Banner for a pool state that restricts actions, if any
pub fn state_banner(state: RebalanceState) -> Option<&'static str> {
    match state {
        RebalanceState::Active | RebalanceState::ReadyForOffchainRebalance => None,
        RebalanceState::OffchainRebalanceInProgress => Some(MSG_OFFCHAIN_REBALANCE_IN_PROGRESS),
        RebalanceState::ReadyForOnchainRebalance => Some(MSG_AWAITING_ONCHAIN_REBALANCE),
        RebalanceState::OnchainRebalanceInProgress => Some(MSG_ONCHAIN_REBALANCE_IN_PROGRESS),
        RebalanceState::Halted => Some(MSG_POOL_HALTED),
        RebalanceState::Unknown => Some(MSG_POOL_STATE_UNKNOWN),
    }
}

// Gate copy wins over pool copy: it tells the actor what to do next.
fn banner(state: RebalanceState, gate: &GateDecision) -> Option<&'static str> {
    gate.reason.message().or_else(|| state_banner(state))
}

fn can_submit(state: RebalanceState, gate: &GateDecision) -> bool {
    !gate.is_blocked && state.accepts_requests()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActions {
    pub can_deposit: bool,
    pub can_redeem: bool,
    pub can_claim: bool,
    pub banner: Option<&'static str>,
}

impl UserActions {
    pub fn derive(state: RebalanceState, gate: &GateDecision) -> Self {
        let submit = can_submit(state, gate);
        Self {
            can_deposit: submit,
            can_redeem: submit,
            can_claim: gate.is_claimable(),
            banner: banner(state, gate),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LpActions {
    pub can_add_liquidity: bool,
    pub can_reduce_liquidity: bool,
    pub can_claim: bool,
    pub can_start_offchain_rebalance: bool,
    pub can_start_onchain_rebalance: bool,
    pub banner: Option<&'static str>,
}

impl LpActions {
    pub fn derive(state: RebalanceState, gate: &GateDecision) -> Self {
        let submit = can_submit(state, gate);
        Self {
            can_add_liquidity: submit,
            can_reduce_liquidity: submit,
            can_claim: gate.is_claimable(),
            can_start_offchain_rebalance: state == RebalanceState::ReadyForOffchainRebalance,
            can_start_onchain_rebalance: state == RebalanceState::ReadyForOnchainRebalance,
            banner: banner(state, gate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request_gate::GateReason;

    const PENDING: GateDecision = GateDecision {
        is_blocked: true,
        reason: GateReason::PendingCurrentCycle,
    };

    const CLAIMABLE: GateDecision = GateDecision {
        is_blocked: true,
        reason: GateReason::ClaimablePastCycle,
    };

    #[test]
    fn test_open_gate_on_active_pool() {
        let actions = UserActions::derive(RebalanceState::Active, &GateDecision::OPEN);
        assert!(actions.can_deposit && actions.can_redeem);
        assert!(!actions.can_claim);
        assert_eq!(actions.banner, None);
    }

    #[test]
    fn test_blocked_gate_disables_new_requests() {
        let actions = UserActions::derive(RebalanceState::Active, &PENDING);
        assert!(!actions.can_deposit && !actions.can_redeem && !actions.can_claim);
        assert_eq!(actions.banner, Some("You have an active request"));

        let actions = UserActions::derive(RebalanceState::Active, &CLAIMABLE);
        assert!(!actions.can_deposit);
        assert!(actions.can_claim);
        assert_eq!(actions.banner, Some("Please claim your processed request"));
    }

    #[test]
    fn test_rebalancing_pool_refuses_requests() {
        for state in [
            RebalanceState::OffchainRebalanceInProgress,
            RebalanceState::ReadyForOnchainRebalance,
            RebalanceState::OnchainRebalanceInProgress,
            RebalanceState::Halted,
            RebalanceState::Unknown,
        ] {
            let actions = UserActions::derive(state, &GateDecision::OPEN);
            assert!(!actions.can_deposit, "{} should refuse deposits", state);
            assert_eq!(actions.banner, state_banner(state));
            assert!(actions.banner.is_some());
        }
    }

    #[test]
    fn test_claim_allowed_while_rebalancing() {
        let actions = UserActions::derive(RebalanceState::OnchainRebalanceInProgress, &CLAIMABLE);
        assert!(actions.can_claim);
    }

    #[test]
    fn test_lp_rebalance_actions() {
        let ready_off = LpActions::derive(RebalanceState::ReadyForOffchainRebalance, &GateDecision::OPEN);
        assert!(ready_off.can_start_offchain_rebalance);
        assert!(!ready_off.can_start_onchain_rebalance);
        assert!(ready_off.can_add_liquidity && ready_off.can_reduce_liquidity);

        let ready_on = LpActions::derive(RebalanceState::ReadyForOnchainRebalance, &PENDING);
        assert!(!ready_on.can_start_offchain_rebalance);
        assert!(ready_on.can_start_onchain_rebalance);
        assert!(!ready_on.can_add_liquidity);

        let unknown = LpActions::derive(RebalanceState::Unknown, &GateDecision::OPEN);
        assert!(!unknown.can_start_offchain_rebalance && !unknown.can_start_onchain_rebalance);
        assert_eq!(unknown.banner, Some(MSG_POOL_STATE_UNKNOWN));
    }
}
