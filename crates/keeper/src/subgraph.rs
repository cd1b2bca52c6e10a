//! GraphQL client for the protocol subgraph

use std::time::Duration;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use synthpool_types::{Pool, PoolRequest, RequestActor};
use tracing::{debug, warn};

use crate::config::{KeeperConfig, RetryConfig};
use crate::error::{KeeperError, KeeperResult};
use crate::source::{request_entity_id, PoolDataSource};

const POOL_QUERY: &str = r#"query Pool($id: ID!) {
  pool(id: $id) { id poolStatus currentCycle }
}"#;

const USER_REQUEST_QUERY: &str = r#"query UserRequest($id: ID!) {
  userRequest(id: $id) { requestType requestCycle }
}"#;

const LP_REQUEST_QUERY: &str = r#"query LpRequest($id: ID!) {
  lpRequest(id: $id) { requestType requestCycle }
}"#;

const META_QUERY: &str = "{ _meta { block { number } } }";

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl<T> GraphQlResponse<T> {
    fn into_data(self) -> KeeperResult<T> {
        if let Some(errors) = self.errors.filter(|e| !e.is_empty()) {
            let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
            return Err(KeeperError::Subgraph(messages.join("; ")));
        }
        self.data
            .ok_or_else(|| KeeperError::Subgraph("response carried neither data nor errors".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct PoolData {
    pool: Option<Pool>,
}

#[derive(Debug, Deserialize)]
struct UserRequestData {
    #[serde(rename = "userRequest")]
    request: Option<PoolRequest>,
}

#[derive(Debug, Deserialize)]
struct LpRequestData {
    #[serde(rename = "lpRequest")]
    request: Option<PoolRequest>,
}

#[derive(Debug, Deserialize)]
struct MetaData {
    #[serde(rename = "_meta")]
    meta: Meta,
}

#[derive(Debug, Deserialize)]
struct Meta {
    block: MetaBlock,
}

#[derive(Debug, Deserialize)]
struct MetaBlock {
    number: u64,
}

// ============================================================================
// Client
// ============================================================================

/// Subgraph client with retry on transport failures
#[derive(Debug, Clone)]
pub struct SubgraphClient {
    http: reqwest::Client,
    endpoint: String,
    retry: RetryConfig,
}

impl SubgraphClient {
    pub fn new(endpoint: &str, timeout: Duration, retry: RetryConfig) -> KeeperResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            retry,
        })
    }

    pub fn from_config(config: &KeeperConfig) -> KeeperResult<Self> {
        Self::new(
            &config.subgraph_url,
            Duration::from_secs(config.request_timeout_secs),
            config.retry.clone(),
        )
    }

    async fn query<T: DeserializeOwned>(&self, query: &str, variables: serde_json::Value) -> KeeperResult<T> {
        let mut attempt = 0;
        loop {
            match self.query_once(query, &variables).await {
                Ok(data) => return Ok(data),
                Err(e) if e.is_retryable() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    warn!("Subgraph query failed (attempt {}), retrying in {}ms: {}", attempt + 1, delay, e);
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn query_once<T: DeserializeOwned>(&self, query: &str, variables: &serde_json::Value) -> KeeperResult<T> {
        let body = GraphQlRequest {
            query,
            variables: variables.clone(),
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let parsed: GraphQlResponse<T> = response.json().await?;
        parsed.into_data()
    }
}

#[async_trait]
impl PoolDataSource for SubgraphClient {
    async fn fetch_pool(&self, pool_id: &str) -> KeeperResult<Option<Pool>> {
        debug!("Fetching pool {}", pool_id);
        let data: PoolData = self.query(POOL_QUERY, json!({ "id": pool_id.to_lowercase() })).await?;
        Ok(data.pool)
    }

    async fn fetch_request(
        &self,
        pool_id: &str,
        actor: RequestActor,
        address: &str,
    ) -> KeeperResult<Option<PoolRequest>> {
        let variables = json!({ "id": request_entity_id(pool_id, address) });
        match actor {
            RequestActor::User => {
                let data: UserRequestData = self.query(USER_REQUEST_QUERY, variables).await?;
                Ok(data.request)
            }
            RequestActor::LiquidityProvider => {
                let data: LpRequestData = self.query(LP_REQUEST_QUERY, variables).await?;
                Ok(data.request)
            }
        }
    }

    async fn health_check(&self) -> KeeperResult<u64> {
        let data: MetaData = self.query(META_QUERY, json!({})).await?;
        Ok(data.meta.block.number)
    }
}
