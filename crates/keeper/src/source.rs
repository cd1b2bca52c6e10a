//! Where pool and request snapshots come from

use std::collections::HashMap;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use synthpool_types::{Pool, PoolRequest, RequestActor};

use crate::error::KeeperResult;

/// Read-only access to indexed protocol state
#[async_trait]
pub trait PoolDataSource: Send + Sync {
    /// Current pool snapshot, `None` if the indexer has no such pool
    async fn fetch_pool(&self, pool_id: &str) -> KeeperResult<Option<Pool>>;

    /// Last request `address` submitted to `pool_id`, `None` if it never submitted one
    async fn fetch_request(
        &self,
        pool_id: &str,
        actor: RequestActor,
        address: &str,
    ) -> KeeperResult<Option<PoolRequest>>;

    /// Latest indexed block, used as a liveness probe
    async fn health_check(&self) -> KeeperResult<u64>;
}

/// Subgraph entity id of an actor's request on a pool
pub fn request_entity_id(pool_id: &str, address: &str) -> String {
    format!("{}-{}", pool_id, address).to_lowercase()
}

/// Fixed snapshot, loadable from JSON for offline evaluation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticSource {
    #[serde(default)]
    pub pools: Vec<Pool>,

    /// Keyed by [`request_entity_id`]
    #[serde(default)]
    pub user_requests: HashMap<String, PoolRequest>,

    /// Keyed by [`request_entity_id`]
    #[serde(default)]
    pub lp_requests: HashMap<String, PoolRequest>,

    #[serde(default)]
    pub block_number: u64,
}

impl StaticSource {
    pub fn from_json(json: &str) -> KeeperResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_pool(mut self, pool: Pool) -> Self {
        self.pools.retain(|p| p.id != pool.id);
        self.pools.push(pool);
        self
    }

    pub fn with_request(
        mut self,
        pool_id: &str,
        actor: RequestActor,
        address: &str,
        request: PoolRequest,
    ) -> Self {
        let key = request_entity_id(pool_id, address);
        match actor {
            RequestActor::User => self.user_requests.insert(key, request),
            RequestActor::LiquidityProvider => self.lp_requests.insert(key, request),
        };
        self
    }
}

#[async_trait]
impl PoolDataSource for StaticSource {
    async fn fetch_pool(&self, pool_id: &str) -> KeeperResult<Option<Pool>> {
        Ok(self.pools.iter().find(|p| p.id.eq_ignore_ascii_case(pool_id)).cloned())
    }

    async fn fetch_request(
        &self,
        pool_id: &str,
        actor: RequestActor,
        address: &str,
    ) -> KeeperResult<Option<PoolRequest>> {
        let key = request_entity_id(pool_id, address);
        let requests = match actor {
            RequestActor::User => &self.user_requests,
            RequestActor::LiquidityProvider => &self.lp_requests,
        };
        Ok(requests.get(&key).cloned())
    }

    async fn health_check(&self) -> KeeperResult<u64> {
        Ok(self.block_number)
    }
}
