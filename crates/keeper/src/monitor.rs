use std::collections::HashMap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use synthpool_core::request_gate::{self, GateDecision};
use synthpool_core::{
    classify, Clock, LpActions, MarketClock, MarketSession, SystemClock, UserActions,
};
use synthpool_types::{PoolRequest, RebalanceState, RequestActor};
use tracing::{debug, error, info, warn};

use crate::config::{KeeperConfig, PoolConfig};
use crate::error::KeeperResult;
use crate::source::PoolDataSource;

/// Actions available to one watched address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ActorActions {
    User(UserActions),
    LiquidityProvider(LpActions),
}

impl ActorActions {
    pub fn banner(&self) -> Option<&'static str> {
        match self {
            ActorActions::User(a) => a.banner,
            ActorActions::LiquidityProvider(a) => a.banner,
        }
    }
}

/// Gate outcome for one watched address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorStatus {
    pub actor: RequestActor,
    pub address: String,
    pub request: Option<PoolRequest>,
    pub gate: GateDecision,
    pub actions: ActorActions,
}

/// Result of polling one pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolReport {
    pub name: String,
    pub pool_id: String,
    pub found: bool,
    pub current_cycle: u64,
    pub evaluated_at: DateTime<Utc>,
    pub market_session: MarketSession,
    pub rebalance_state: RebalanceState,
    /// State seen on the previous poll, if any
    pub previous_state: Option<RebalanceState>,
    pub actors: Vec<ActorStatus>,
}

impl PoolReport {
    /// Whether the lifecycle state moved since the previous poll
    pub fn state_changed(&self) -> bool {
        matches!(self.previous_state, Some(prev) if prev != self.rebalance_state)
    }
}

/// Main keeper service: polls pools and classifies their lifecycle
pub struct Monitor<S: PoolDataSource, C: Clock = SystemClock> {
    /// Indexed protocol state
    source: S,

    /// Market hours bound to the keeper's clock
    market_clock: MarketClock<C>,

    /// Pools to watch
    pools: Vec<PoolConfig>,

    /// Last observed state per pool id
    last_states: HashMap<String, RebalanceState>,
}

impl<S: PoolDataSource, C: Clock> Monitor<S, C> {
    /// Create a new monitor over the config's enabled pools
    pub fn new(source: S, clock: C, config: &KeeperConfig) -> KeeperResult<Self> {
        let hours = config.market.to_market_hours()?;
        Ok(Self {
            source,
            market_clock: MarketClock::new(clock, hours),
            pools: config.enabled_pools().into_iter().cloned().collect(),
            last_states: HashMap::new(),
        })
    }

    pub fn pools(&self) -> &[PoolConfig] {
        &self.pools
    }

    /// Poll every watched pool; failures are logged and skipped
    pub async fn poll_all_pools(&mut self) -> Vec<PoolReport> {
        let mut reports = Vec::with_capacity(self.pools.len());

        let pools = self.pools.clone();
        for pool_config in &pools {
            match self.poll_pool(pool_config).await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    error!("Failed to poll pool {} ({}): {}", pool_config.name, pool_config.pool_id, e);
                    // Continue with other pools
                }
            }
        }

        reports
    }

    /// Fetch one pool and its watched requests, then classify
    pub async fn poll_pool(&mut self, pool_config: &PoolConfig) -> KeeperResult<PoolReport> {
        let now = self.market_clock.now();
        let market_session = self.market_clock.hours().session(now);

        let pool = self.source.fetch_pool(&pool_config.pool_id).await?;
        if pool.is_none() {
            warn!("Pool {} ({}) not found in subgraph", pool_config.name, pool_config.pool_id);
        }

        let rebalance_state = classify(pool.as_ref(), market_session.is_open()).rebalance_state;
        let current_cycle = pool.as_ref().map(|p| p.current_cycle).unwrap_or_default();

        let watched = pool_config
            .users
            .iter()
            .map(|a| (RequestActor::User, a))
            .chain(pool_config.lps.iter().map(|a| (RequestActor::LiquidityProvider, a)));

        let mut actors = Vec::new();
        for (actor, address) in watched {
            let request = self.source.fetch_request(&pool_config.pool_id, actor, address).await?;
            let gate = request_gate::evaluate(request.as_ref(), current_cycle);
            let actions = match actor {
                RequestActor::User => ActorActions::User(UserActions::derive(rebalance_state, &gate)),
                RequestActor::LiquidityProvider => {
                    ActorActions::LiquidityProvider(LpActions::derive(rebalance_state, &gate))
                }
            };

            debug!(
                pool = %pool_config.name,
                %actor,
                %address,
                blocked = gate.is_blocked,
                reason = ?gate.reason,
                "Evaluated request gate"
            );

            actors.push(ActorStatus {
                actor,
                address: address.clone(),
                request,
                gate,
                actions,
            });
        }

        let previous_state = self.last_states.insert(pool_config.pool_id.clone(), rebalance_state);

        let report = PoolReport {
            name: pool_config.name.clone(),
            pool_id: pool_config.pool_id.clone(),
            found: pool.is_some(),
            current_cycle,
            evaluated_at: now,
            market_session,
            rebalance_state,
            previous_state,
            actors,
        };

        if report.state_changed() {
            info!(
                "Pool {} moved {} -> {} at cycle {}",
                report.name,
                previous_state.map(|s| s.to_string()).unwrap_or_default(),
                report.rebalance_state,
                report.current_cycle
            );
        } else {
            debug!("Pool {} is {} at cycle {}", report.name, report.rebalance_state, report.current_cycle);
        }

        Ok(report)
    }

    /// Health check for the data source
    pub async fn health_check(&self) -> KeeperResult<u64> {
        let block = self.source.health_check().await?;
        debug!("Health check passed - indexed block: {}", block);
        Ok(block)
    }
}
