//! Block height tracking over a polled node connection.

use {
    crate::{domain::eth, infra::metrics},
    async_trait::async_trait,
    std::{sync::Arc, time::Duration},
    tokio::sync::watch,
};

/// A shared watcher over the most recently observed block height. Holds
/// `None` until the first successful fetch, and closes when the owning
/// tracker stops.
pub type CurrentBlockWatcher = watch::Receiver<Option<eth::BlockNumber>>;

/// Source of the chain's current block height.
#[async_trait]
pub trait BlockNumberRetrieving: Send + Sync + 'static {
    async fn current_block_number(&self) -> Result<eth::BlockNumber, web3::Error>;
}

#[async_trait]
impl BlockNumberRetrieving for web3::Web3<web3::transports::Http> {
    async fn current_block_number(&self) -> Result<eth::BlockNumber, web3::Error> {
        let number = self.eth().block_number().await?;
        Ok(eth::BlockNumber(number.as_u64()))
    }
}

/// Spawns a task polling the current block height at a fixed interval and
/// publishing observations into the returned watcher. The first poll happens
/// immediately, so a fresh connection gets a baseline height without waiting
/// a full interval.
///
/// Last write wins: a lower height arriving after a higher one is applied
/// as-is, since the height serves as a change signal and not as a trusted
/// ledger position. Equal heights are not re-published. Failed polls are
/// logged and leave the tracked height untouched.
pub fn current_block_stream(
    retriever: Arc<dyn BlockNumberRetrieving>,
    poll_interval: Duration,
) -> (CurrentBlockWatcher, tokio::task::JoinHandle<()>) {
    let (sender, receiver) = watch::channel(None);
    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(poll_interval);
        loop {
            interval.tick().await;
            if sender.is_closed() {
                break;
            }
            let observed = match retriever.current_block_number().await {
                Ok(block) => block,
                Err(err) => {
                    tracing::warn!(?err, "failed to fetch current block height");
                    metrics::chain_read_error("block-number");
                    continue;
                }
            };
            let updated = sender.send_if_modified(|current| {
                if *current == Some(observed) {
                    return false;
                }
                if (*current).is_some_and(|last| last > observed) {
                    tracing::debug!(%observed, "block height moved backwards");
                }
                *current = Some(observed);
                true
            });
            if updated {
                tracing::debug!(block = %observed, "new block height");
                metrics::block_update();
            }
        }
    });
    (receiver, handle)
}
