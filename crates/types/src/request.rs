/// User and LP request snapshots

use serde::{Deserialize, Serialize};
use std::fmt;
use crate::constants::*;

// ============================================================================
// Request Type
// ============================================================================

/// Kind of the last request an actor submitted to a pool
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestType {
    None,
    Deposit,
    Redeem,
    AddLiquidity,
    ReduceLiquidity,
    Liquidate,
    Unrecognized(String),
}

impl RequestType {
    pub fn as_str(&self) -> &str {
        match self {
            RequestType::None => REQUEST_TYPE_NONE,
            RequestType::Deposit => REQUEST_TYPE_DEPOSIT,
            RequestType::Redeem => REQUEST_TYPE_REDEEM,
            RequestType::AddLiquidity => REQUEST_TYPE_ADD_LIQUIDITY,
            RequestType::ReduceLiquidity => REQUEST_TYPE_REDUCE_LIQUIDITY,
            RequestType::Liquidate => REQUEST_TYPE_LIQUIDATE,
            RequestType::Unrecognized(raw) => raw,
        }
    }

    /// `NONE` is the indexer's marker for "no outstanding request"
    pub fn is_none(&self) -> bool {
        matches!(self, RequestType::None)
    }
}

impl From<&str> for RequestType {
    fn from(raw: &str) -> Self {
        match raw {
            REQUEST_TYPE_NONE => RequestType::None,
            REQUEST_TYPE_DEPOSIT => RequestType::Deposit,
            REQUEST_TYPE_REDEEM => RequestType::Redeem,
            REQUEST_TYPE_ADD_LIQUIDITY => RequestType::AddLiquidity,
            REQUEST_TYPE_REDUCE_LIQUIDITY => RequestType::ReduceLiquidity,
            REQUEST_TYPE_LIQUIDATE => RequestType::Liquidate,
            other => RequestType::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for RequestType {
    fn from(raw: String) -> Self {
        RequestType::from(raw.as_str())
    }
}

impl From<RequestType> for String {
    fn from(kind: RequestType) -> Self {
        match kind {
            RequestType::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Request Snapshot
// ============================================================================

/// Who submitted a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestActor {
    User,
    LiquidityProvider,
}

impl fmt::Display for RequestActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestActor::User => f.write_str("user"),
            RequestActor::LiquidityProvider => f.write_str("lp"),
        }
    }
}

/// Last request an actor submitted to a pool (`UserRequest` / `LPRequest`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolRequest {
    pub request_type: RequestType,

    /// Pool cycle at submission time
    #[serde(with = "crate::cycle_serde")]
    pub request_cycle: u64,
}

impl PoolRequest {
    pub fn new(request_type: RequestType, request_cycle: u64) -> Self {
        Self { request_type, request_cycle }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_subgraph_json() {
        let json = r#"{"requestType":"REDUCE_LIQUIDITY","requestCycle":"9"}"#;
        let request: PoolRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.request_type, RequestType::ReduceLiquidity);
        assert_eq!(request.request_cycle, 9);
    }

    #[test]
    fn test_none_marker() {
        assert!(RequestType::from("NONE").is_none());
        assert!(!RequestType::from("DEPOSIT").is_none());
        assert!(!RequestType::from("SWAP").is_none());
    }

    #[test]
    fn test_request_type_wire_values() {
        for raw in ["NONE", "DEPOSIT", "REDEEM", "ADD_LIQUIDITY", "REDUCE_LIQUIDITY", "LIQUIDATE"] {
            let kind = RequestType::from(raw);
            assert!(!matches!(kind, RequestType::Unrecognized(_)), "{} should be known", raw);
            assert_eq!(String::from(kind), raw);
        }
    }
}
