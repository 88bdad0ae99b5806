pub mod file;

use {
    crate::domain::eth,
    std::{collections::HashMap, time::Duration},
};

pub use file::load;

/// Fully parsed and validated application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// How often each connection polls its node for the current block
    /// height.
    pub poll_interval: Duration,
    /// The node endpoints, keyed by the networks this deployment serves.
    pub networks: HashMap<eth::NetworkId, Network>,
}

#[derive(Clone, Debug)]
pub struct Network {
    /// The URL of the network's JSON-RPC node.
    pub node_url: reqwest::Url,
}
