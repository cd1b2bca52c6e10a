/// Protocol and market constants used across the SynthPool client

// ============================================================================
// Reference Market Hours
// ============================================================================

/// IANA timezone of the reference equities market (NYSE/NASDAQ)
pub const MARKET_TIMEZONE: &str = "America/New_York";

/// Market open, local time (09:30:00 inclusive)
pub const MARKET_OPEN_HOUR: u32 = 9;
pub const MARKET_OPEN_MINUTE: u32 = 30;

/// Market close, local time (16:00:00 exclusive)
pub const MARKET_CLOSE_HOUR: u32 = 16;
pub const MARKET_CLOSE_MINUTE: u32 = 0;

// ============================================================================
// Pool Status Wire Values
// ============================================================================

pub const POOL_STATUS_ACTIVE: &str = "ACTIVE";
pub const POOL_STATUS_REBALANCING_OFFCHAIN: &str = "REBALANCING_OFFCHAIN";
pub const POOL_STATUS_REBALANCING_ONCHAIN: &str = "REBALANCING_ONCHAIN";
pub const POOL_STATUS_HALTED: &str = "HALTED";

// ============================================================================
// Request Type Wire Values
// ============================================================================

pub const REQUEST_TYPE_NONE: &str = "NONE";
pub const REQUEST_TYPE_DEPOSIT: &str = "DEPOSIT";
pub const REQUEST_TYPE_REDEEM: &str = "REDEEM";
pub const REQUEST_TYPE_ADD_LIQUIDITY: &str = "ADD_LIQUIDITY";
pub const REQUEST_TYPE_REDUCE_LIQUIDITY: &str = "REDUCE_LIQUIDITY";
pub const REQUEST_TYPE_LIQUIDATE: &str = "LIQUIDATE";

// ============================================================================
// Call-To-Action Copy
// ============================================================================

/// Shown while a request submitted in the current cycle is still pending
pub const MSG_PENDING_REQUEST: &str = "You have an active request";

/// Shown when a request from a past cycle has been processed and awaits claiming
pub const MSG_CLAIMABLE_REQUEST: &str = "Please claim your processed request";

pub const MSG_POOL_HALTED: &str = "Pool is halted";
pub const MSG_POOL_STATE_UNKNOWN: &str = "Pool state is unavailable";
pub const MSG_OFFCHAIN_REBALANCE_IN_PROGRESS: &str = "Off-chain rebalance in progress";
pub const MSG_ONCHAIN_REBALANCE_IN_PROGRESS: &str = "On-chain rebalance in progress";
pub const MSG_AWAITING_ONCHAIN_REBALANCE: &str = "Waiting for on-chain rebalance";
