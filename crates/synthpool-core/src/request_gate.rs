//! # Request Gate
//!
//! An actor may hold one outstanding request per pool. A request submitted in
//! the current cycle is still pending; one from an earlier cycle has been
//! processed and must be claimed. Either way no new request is allowed.

use serde::Serialize;
use synthpool_types::{
    PoolRequest, SynthPoolError, SynthPoolResult, MSG_CLAIMABLE_REQUEST, MSG_PENDING_REQUEST,
};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateReason {
    None,
    PendingCurrentCycle,
    ClaimablePastCycle,
}

impl GateReason {
    /// Banner copy for a blocked actor
    pub fn message(&self) -> Option<&'static str> {
        match self {
            GateReason::None => None,
            GateReason::PendingCurrentCycle => Some(MSG_PENDING_REQUEST),
            GateReason::ClaimablePastCycle => Some(MSG_CLAIMABLE_REQUEST),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateDecision {
    pub is_blocked: bool,
    pub reason: GateReason,
}

impl GateDecision {
    pub const OPEN: GateDecision = GateDecision {
        is_blocked: false,
        reason: GateReason::None,
    };

    fn blocked(reason: GateReason) -> Self {
        Self { is_blocked: true, reason }
    }

    pub fn is_claimable(&self) -> bool {
        self.reason == GateReason::ClaimablePastCycle
    }
}

/// Strict gate: a request from a cycle the pool has not reached is an error
pub fn check(request: Option<&PoolRequest>, current_cycle: u64) -> SynthPoolResult<GateDecision> {
    let request = match request {
        Some(r) if !r.request_type.is_none() => r,
        _ => return Ok(GateDecision::OPEN),
    };

    if request.request_cycle == current_cycle {
        Ok(GateDecision::blocked(GateReason::PendingCurrentCycle))
    } else if request.request_cycle < current_cycle {
        Ok(GateDecision::blocked(GateReason::ClaimablePastCycle))
    } else {
        Err(SynthPoolError::future_request_cycle(request.request_cycle, current_cycle))
    }
}

/// Gate with the fail-open policy: an inconsistent snapshot (request ahead of
/// the pool cycle, usually a stale pool read) is logged and never blocks.
pub fn evaluate(request: Option<&PoolRequest>, current_cycle: u64) -> GateDecision {
    match check(request, current_cycle) {
        Ok(decision) => decision,
        Err(err) => {
            warn!(
                request_type = ?request.map(|r| r.request_type.as_str()),
                error = %err,
                "Inconsistent request snapshot, not blocking"
            );
            GateDecision::OPEN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthpool_types::RequestType;

    fn deposit(cycle: u64) -> PoolRequest {
        PoolRequest::new(RequestType::Deposit, cycle)
    }

    #[test]
    fn test_no_request_is_open() {
        assert_eq!(evaluate(None, 5), GateDecision::OPEN);
        assert!(!evaluate(None, 0).is_blocked);
    }

    #[test]
    fn test_none_request_type_is_open() {
        // NONE with any cycle, even a future one, is not a request
        let none = PoolRequest::new(RequestType::None, 9);
        assert_eq!(check(Some(&none), 5), Ok(GateDecision::OPEN));
    }

    #[test]
    fn test_pending_current_cycle() {
        let decision = evaluate(Some(&deposit(5)), 5);
        assert!(decision.is_blocked);
        assert_eq!(decision.reason, GateReason::PendingCurrentCycle);
        assert_eq!(decision.reason.message(), Some("You have an active request"));
    }

    #[test]
    fn test_claimable_past_cycle() {
        let decision = evaluate(Some(&deposit(4)), 5);
        assert!(decision.is_blocked);
        assert_eq!(decision.reason, GateReason::ClaimablePastCycle);
        assert!(decision.is_claimable());
    }

    #[test]
    fn test_all_request_kinds_gate_the_same() {
        for kind in [
            RequestType::Deposit,
            RequestType::Redeem,
            RequestType::AddLiquidity,
            RequestType::ReduceLiquidity,
            RequestType::Liquidate,
            RequestType::Unrecognized("MIGRATE".to_string()),
        ] {
            let request = PoolRequest::new(kind, 2);
            assert_eq!(evaluate(Some(&request), 2).reason, GateReason::PendingCurrentCycle);
            assert_eq!(evaluate(Some(&request), 3).reason, GateReason::ClaimablePastCycle);
        }
    }

    #[test]
    fn test_future_cycle_fails_open() {
        let request = deposit(6);
        assert_eq!(check(Some(&request), 5), Err(SynthPoolError::future_request_cycle(6, 5)));
        assert_eq!(evaluate(Some(&request), 5), GateDecision::OPEN);
    }

    #[test]
    fn test_decision_serializes_like_ui_contract() {
        let json = serde_json::to_value(evaluate(Some(&deposit(4)), 5)).unwrap();
        assert_eq!(json["isBlocked"], true);
        assert_eq!(json["reason"], "CLAIMABLE_PAST_CYCLE");
    }
}
