//! Integration tests against a mock JSON-RPC node and a mock transaction
//! relay.

mod mock;

use {
    crate::{
        domain::eth,
        infra::{blockchain::Connection, config},
    },
    std::{
        collections::HashMap,
        sync::Arc,
        time::{Duration, Instant},
    },
};

/// Polls `condition` until it holds or a generous deadline passes.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(
            Instant::now() < deadline,
            "condition not reached before deadline",
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// A configuration pointing the given networks at the given node URLs. The
/// poll interval is long enough that only the initial baseline poll happens
/// within a test run.
pub fn config(networks: &[(eth::NetworkId, &str)]) -> config::Config {
    config::Config {
        poll_interval: Duration::from_secs(3600),
        networks: networks
            .iter()
            .map(|(network, url)| {
                (
                    *network,
                    config::Network {
                        node_url: url.parse().unwrap(),
                    },
                )
            })
            .collect::<HashMap<_, _>>(),
    }
}

/// Connects to a mock node and waits for the baseline block height, so that
/// later expectations observe a deterministic request order.
pub async fn connect(node: &mock::node::ServerHandle, network: eth::NetworkId) -> Arc<Connection> {
    let config = config(&[(network, &node.url())]);
    let connection = Arc::new(Connection::connect(&config, network).unwrap());
    wait_until(|| connection.block_number().is_some()).await;
    connection
}
