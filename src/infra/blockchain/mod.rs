//! Chain connection lifecycle: the page readiness gate, the per-network
//! connection and the manager that swaps connections on network switches.

pub mod blocks;
pub mod contracts;
pub mod state;

use {
    crate::{
        domain::eth,
        infra::{config, metrics},
    },
    std::{
        fmt::{self, Debug, Display, Formatter},
        sync::{
            Arc, OnceLock,
            atomic::{AtomicU64, Ordering},
        },
    },
    tokio::sync::watch,
    web3::{
        contract::{Contract, Options},
        transports::Http,
    },
};

/// Creates a linked readiness signal and gate. Connection attempts started
/// through the gate stay pending until [`ReadinessSignal::mark_ready`] fires.
/// Firing is idempotent and permanent.
pub fn readiness() -> (ReadinessSignal, ReadinessGate) {
    let (sender, receiver) = watch::channel(false);
    (ReadinessSignal(sender), ReadinessGate(receiver))
}

/// Fired by the host once the page has fully loaded.
pub struct ReadinessSignal(watch::Sender<bool>);

impl ReadinessSignal {
    pub fn mark_ready(&self) {
        self.0.send_replace(true);
    }
}

/// Awaitable view of the page load state.
#[derive(Clone)]
pub struct ReadinessGate(watch::Receiver<bool>);

impl ReadinessGate {
    /// A gate that is already open, for hosts that attach after the page
    /// finished loading.
    pub fn already_ready() -> Self {
        let (_sender, receiver) = watch::channel(true);
        Self(receiver)
    }

    /// Resolves once readiness has been signalled. Pends forever if the
    /// signal is dropped unfired.
    pub async fn ready(&self) {
        let mut receiver = self.0.clone();
        loop {
            if *receiver.borrow_and_update() {
                return;
            }
            if receiver.changed().await.is_err() {
                futures::future::pending::<()>().await;
            }
        }
    }
}

/// A unique tag for each connection attempt, used to discard results of
/// attempts that a later network switch has overtaken.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ConnectionId(u64);

impl ConnectionId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl Display for ConnectionId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// A live connection to one network's node, scoped to that network's
/// wrapped-native token. Owns the block polling task; shutting the
/// connection down stops the task and closes all block watchers derived
/// from it.
pub struct Connection {
    id: ConnectionId,
    network: eth::NetworkId,
    token: eth::TokenAddress,
    contract: Contract<Http>,
    blocks: blocks::CurrentBlockWatcher,
    tracker: tokio::task::JoinHandle<()>,
    decimals: OnceLock<u8>,
}

impl Connection {
    /// Connects to the configured node for a network and starts tracking
    /// its block height.
    pub fn connect(config: &config::Config, network: eth::NetworkId) -> Result<Self, Error> {
        let node = config
            .networks
            .get(&network)
            .ok_or(Error::UnconfiguredNetwork(network))?;
        let id = ConnectionId::next();
        let web3 = web3::Web3::new(Http::new(node.node_url.as_str())?);
        let token = network.wrapped_native_token();
        let contract = Contract::new(web3.eth(), token.0, contracts::weth9().clone());
        let (blocks, tracker) =
            blocks::current_block_stream(Arc::new(web3), config.poll_interval);
        metrics::connection_established();
        tracing::info!(%id, %network, "connected");
        Ok(Self {
            id,
            network,
            token,
            contract,
            blocks,
            tracker,
            decimals: OnceLock::new(),
        })
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn network(&self) -> eth::NetworkId {
        self.network
    }

    /// The wrapped-native-token contract this connection is scoped to.
    pub fn token(&self) -> eth::TokenAddress {
        self.token
    }

    /// The token's decimal count. Read from the contract once per connection
    /// and cached on success; a failed read falls back to
    /// [`eth::DEFAULT_TOKEN_DECIMALS`] without caching, so a later call may
    /// still recover the real value.
    pub async fn token_decimals(&self) -> u8 {
        if let Some(decimals) = self.decimals.get() {
            return *decimals;
        }
        let query: Result<eth::U256, _> = self
            .contract
            .query("decimals", (), None, Options::default(), None)
            .await;
        match query {
            Ok(raw) if raw <= eth::U256::from(u8::MAX) => {
                let decimals = raw.low_u64() as u8;
                *self.decimals.get_or_init(|| decimals)
            }
            Ok(raw) => {
                tracing::warn!(%raw, "token reports implausible decimal count, assuming default");
                eth::DEFAULT_TOKEN_DECIMALS
            }
            Err(err) => {
                tracing::warn!(?err, "failed to read token decimals, assuming default");
                metrics::chain_read_error("decimals");
                eth::DEFAULT_TOKEN_DECIMALS
            }
        }
    }

    /// Reads the wrapped-token balance of `holder` as of the latest block.
    pub async fn token_balance(&self, holder: eth::Address) -> Result<eth::TokenAmount, Error> {
        let amount: eth::U256 = self
            .contract
            .query("balanceOf", (holder,), None, Options::default(), None)
            .await?;
        Ok(eth::TokenAmount::new(amount, self.token_decimals().await))
    }

    /// Reads the wrapped-token allowance granted by `owner` to `spender`.
    pub async fn token_allowance(
        &self,
        owner: eth::Address,
        spender: eth::Address,
    ) -> Result<eth::TokenAmount, Error> {
        let amount: eth::U256 = self
            .contract
            .query("allowance", (owner, spender), None, Options::default(), None)
            .await?;
        Ok(eth::TokenAmount::new(amount, self.token_decimals().await))
    }

    /// The most recently observed block height, if any yet.
    pub fn block_number(&self) -> Option<eth::BlockNumber> {
        *self.blocks.borrow()
    }

    /// A fresh watcher over this connection's block height.
    pub fn blocks(&self) -> blocks::CurrentBlockWatcher {
        self.blocks.clone()
    }

    /// Stops the block tracker. Watchers derived from this connection
    /// observe closure.
    pub fn shutdown(&self) {
        self.tracker.abort();
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.tracker.abort();
    }
}

impl Debug for Connection {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("network", &self.network)
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

/// Owns the current connection and swaps it out when the host switches
/// networks. Connection attempts wait for page readiness; each attempt is
/// tagged with a generation so an attempt overtaken by a later switch
/// publishes nothing.
pub struct ConnectionManager {
    config: config::Config,
    gate: ReadinessGate,
    generation: Arc<AtomicU64>,
    current: Arc<watch::Sender<Option<Arc<Connection>>>>,
}

impl ConnectionManager {
    pub fn new(config: config::Config, gate: ReadinessGate) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            config,
            gate,
            generation: Arc::new(AtomicU64::new(0)),
            current: Arc::new(sender),
        }
    }

    /// Switches the active network. The replacement happens asynchronously
    /// once the readiness gate is open; the previous connection is shut down
    /// before the replacement is even constructed, so its block tracker never
    /// runs alongside the new one. A failed attempt for the latest requested
    /// network leaves the connection unavailable rather than keeping the
    /// outdated one.
    pub fn set_network(&self, network: eth::NetworkId) -> tokio::task::JoinHandle<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let config = self.config.clone();
        let gate = self.gate.clone();
        let latest = Arc::clone(&self.generation);
        let current = Arc::clone(&self.current);
        tokio::spawn(async move {
            gate.ready().await;
            // Retire the current connection first. Connecting starts the
            // replacement's block tracker, so the old one must be gone by
            // then. The watch sender's internal lock serializes publications,
            // making each generation check atomic with respect to competing
            // attempts.
            let mut overtaken = false;
            current.send_if_modified(|slot| {
                if latest.load(Ordering::SeqCst) != generation {
                    overtaken = true;
                    return false;
                }
                match slot.take() {
                    Some(old) => {
                        old.shutdown();
                        true
                    }
                    None => false,
                }
            });
            if overtaken {
                return;
            }
            let connection = match Connection::connect(&config, network) {
                Ok(connection) => Arc::new(connection),
                Err(err) => {
                    // The slot was already cleared above, so the failed
                    // network shows up as unavailable.
                    tracing::warn!(%network, ?err, "connection attempt failed");
                    return;
                }
            };
            let published = current.send_if_modified(|slot| {
                if latest.load(Ordering::SeqCst) != generation {
                    return false;
                }
                // Competing attempts bump the generation before touching the
                // slot, so a passing check means the slot is still the empty
                // one this attempt left behind.
                *slot = Some(Arc::clone(&connection));
                true
            });
            if !published {
                tracing::debug!(id = %connection.id(), "discarding stale connection");
                connection.shutdown();
            }
        })
    }

    /// The currently published connection, if any.
    pub fn connection(&self) -> Option<Arc<Connection>> {
        self.current.borrow().clone()
    }

    /// Watches connection replacements. Yields `None` entries while no
    /// connection is available.
    pub fn watch(&self) -> watch::Receiver<Option<Arc<Connection>>> {
        self.current.subscribe()
    }

    /// Tears down the current connection and invalidates in-flight attempts.
    pub fn shutdown(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.current.send_if_modified(|slot| match slot.take() {
            Some(old) => {
                old.shutdown();
                true
            }
            None => false,
        });
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no node configured for network {0}")]
    UnconfiguredNetwork(eth::NetworkId),
    #[error("node transport error: {0}")]
    Transport(#[from] web3::Error),
    #[error("contract call failed: {0}")]
    Contract(#[from] web3::contract::Error),
}
