pub mod config;
pub mod error;
pub mod monitor;
pub mod source;
pub mod subgraph;

pub use config::{KeeperConfig, MarketHoursConfig, MonitoringConfig, PoolConfig, RetryConfig};
pub use error::{KeeperError, KeeperResult};
pub use monitor::{ActorActions, ActorStatus, Monitor, PoolReport};
pub use source::{PoolDataSource, StaticSource};
pub use subgraph::SubgraphClient;
