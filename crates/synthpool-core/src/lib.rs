//! # SynthPool Core - Pool Lifecycle Logic
//!
//! Pure, synchronous logic shared by the keeper service and any UI host:
//!
//! - [`market_clock`]: is the reference equities market open
//! - [`rebalance`]: pool status + market session → lifecycle state
//! - [`request_gate`]: may an actor submit a new request this cycle
//! - [`actions`]: which buttons and banners follow from the above
//! - [`overview`]: everything at once for a single snapshot
//!
//! Nothing here performs I/O. Time is always passed in or read through an
//! injected [`market_clock::Clock`].

pub mod actions;
pub mod market_clock;
pub mod overview;
pub mod rebalance;
pub mod request_gate;

// Re-export commonly used items
pub use actions::{LpActions, UserActions};
pub use market_clock::{
    is_market_open, is_market_open_at, Clock, ClosedReason, FixedClock, MarketClock, MarketHours,
    MarketSession, SystemClock,
};
pub use overview::PoolOverview;
pub use rebalance::{classify, RebalanceClassification};
pub use request_gate::{GateDecision, GateReason};
