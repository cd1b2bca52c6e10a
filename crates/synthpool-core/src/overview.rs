//! One-shot evaluation of a pool snapshot: market session, lifecycle state,
//! request gates and the resulting actions for a user and an LP.

use chrono::{DateTime, Utc};
use serde::Serialize;
use synthpool_types::{Pool, PoolRequest, RebalanceState};

use crate::actions::{LpActions, UserActions};
use crate::market_clock::{MarketHours, MarketSession};
use crate::rebalance::classify;
use crate::request_gate::{evaluate, GateDecision};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolOverview {
    pub pool_id: Option<String>,
    /// Cycle the gates were evaluated against; 0 when the pool is missing
    pub current_cycle: u64,
    pub evaluated_at: DateTime<Utc>,
    pub market_session: MarketSession,
    pub rebalance_state: RebalanceState,
    pub user_gate: GateDecision,
    pub lp_gate: GateDecision,
    pub user_actions: UserActions,
    pub lp_actions: LpActions,
}

impl PoolOverview {
    pub fn evaluate(
        pool: Option<&Pool>,
        user_request: Option<&PoolRequest>,
        lp_request: Option<&PoolRequest>,
        hours: &MarketHours,
        now: DateTime<Utc>,
    ) -> Self {
        let market_session = hours.session(now);
        let rebalance_state = classify(pool, market_session.is_open()).rebalance_state;

        let current_cycle = pool.map(|p| p.current_cycle).unwrap_or_default();
        let user_gate = evaluate(user_request, current_cycle);
        let lp_gate = evaluate(lp_request, current_cycle);

        Self {
            pool_id: pool.map(|p| p.id.clone()),
            current_cycle,
            evaluated_at: now,
            market_session,
            rebalance_state,
            user_gate,
            lp_gate,
            user_actions: UserActions::derive(rebalance_state, &user_gate),
            lp_actions: LpActions::derive(rebalance_state, &lp_gate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use synthpool_types::{PoolStatus, RequestType};

    #[test]
    fn test_overview_during_offchain_rebalance() {
        // Tuesday 2024-07-16 11:00 EDT
        let now = Utc.with_ymd_and_hms(2024, 7, 16, 15, 0, 0).unwrap();
        let pool = Pool::new("0xpool", PoolStatus::RebalancingOffchain, 8);
        let lp_request = PoolRequest::new(RequestType::AddLiquidity, 7);

        let overview = PoolOverview::evaluate(Some(&pool), None, Some(&lp_request), &MarketHours::nyse(), now);

        assert_eq!(overview.pool_id.as_deref(), Some("0xpool"));
        assert_eq!(overview.market_session, MarketSession::Open);
        assert_eq!(overview.rebalance_state, RebalanceState::OffchainRebalanceInProgress);
        assert!(!overview.user_gate.is_blocked);
        assert!(!overview.user_actions.can_deposit);
        assert!(overview.lp_actions.can_claim);
        assert!(!overview.lp_actions.can_start_onchain_rebalance);
    }

    #[test]
    fn test_overview_without_pool() {
        let now = Utc.with_ymd_and_hms(2024, 7, 13, 15, 0, 0).unwrap();
        let overview = PoolOverview::evaluate(None, None, None, &MarketHours::nyse(), now);

        assert_eq!(overview.pool_id, None);
        assert_eq!(overview.current_cycle, 0);
        assert_eq!(overview.rebalance_state, RebalanceState::Active);
        assert!(overview.user_actions.can_deposit);
    }
}
