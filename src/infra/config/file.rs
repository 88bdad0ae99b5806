use {
    super::{Config, Network},
    crate::domain::eth,
    serde::Deserialize,
    std::{collections::HashMap, path::Path, time::Duration},
};

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ConfigFile {
    /// How often to poll the node for the current block height.
    #[serde(with = "humantime_serde", default = "default_poll_interval")]
    poll_interval: Duration,

    /// The served networks, keyed by canonical network name.
    networks: HashMap<String, NetworkFile>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct NetworkFile {
    /// The URL of the network's JSON-RPC node.
    node_url: String,
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(5)
}

/// Loads the configuration from a TOML file.
///
/// # Panics
///
/// Panics if the file cannot be read, does not parse, or names an
/// unsupported network.
pub async fn load(path: &Path) -> Config {
    let data = tokio::fs::read_to_string(path)
        .await
        .unwrap_or_else(|e| panic!("I/O error while reading {path:?}: {e:?}"));
    let config: ConfigFile = toml::de::from_str(&data)
        .unwrap_or_else(|e| panic!("TOML syntax error while reading {path:?}: {e:?}"));
    Config {
        poll_interval: config.poll_interval,
        networks: config
            .networks
            .into_iter()
            .map(|(name, network)| {
                let id = eth::NetworkId::from_name(&name)
                    .unwrap_or_else(|e| panic!("error in {path:?}: {e}"));
                let node_url = network
                    .node_url
                    .parse()
                    .unwrap_or_else(|e| panic!("invalid node-url in {path:?}: {e}"));
                (id, Network { node_url })
            })
            .collect(),
    }
}
