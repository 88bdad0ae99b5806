//! Derivation of the wallet's on-chain state, re-run on every block height
//! change.

use {
    super::{Connection, blocks},
    crate::{
        domain::{account, eth},
        infra::metrics,
    },
    std::sync::Arc,
    tokio::sync::watch,
};

/// Spawns a reader that re-derives the wallet's account state whenever the
/// connection observes a new block height. The returned watcher starts from
/// the empty state; fields stay unset until their first successful read.
///
/// The reader stops when the connection's block watcher closes or when the
/// last state watcher is dropped.
pub fn account_states(
    connection: Arc<Connection>,
    wallet: account::WalletInfo,
    spender: eth::Address,
) -> watch::Receiver<account::AccountState> {
    let blocks = connection.blocks();
    spawn_reader(blocks, connection, wallet, spender)
}

pub(crate) fn spawn_reader(
    mut blocks: blocks::CurrentBlockWatcher,
    connection: Arc<Connection>,
    wallet: account::WalletInfo,
    spender: eth::Address,
) -> watch::Receiver<account::AccountState> {
    let (sender, receiver) = watch::channel(account::AccountState::default());
    tokio::spawn(async move {
        loop {
            // Coalesce to the latest pending height; intermediate heights
            // that arrived during a derivation are skipped.
            let block = *blocks.borrow_and_update();
            if let Some(block) = block {
                let state = derive(&connection, &wallet, spender).await;
                tracing::debug!(%block, ?state, "account state derived");
                if sender.send(state).is_err() {
                    break;
                }
            }
            tokio::select! {
                changed = blocks.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                // Noticing the drop here, not at the next height change,
                // keeps abandoned readers from idling until one arrives.
                () = sender.closed() => break,
            }
        }
    });
    receiver
}

/// One full re-derivation. The balance and allowance reads are independent;
/// a failed read renders as an unset field rather than zero, so "not loaded"
/// stays distinguishable from "confirmed zero".
async fn derive(
    connection: &Connection,
    wallet: &account::WalletInfo,
    spender: eth::Address,
) -> account::AccountState {
    let token_balance = match connection.token_balance(wallet.address).await {
        Ok(balance) => Some(balance),
        Err(err) => {
            tracing::warn!(?err, "failed to read token balance");
            metrics::chain_read_error("balance");
            None
        }
    };
    let allowance = match connection.token_allowance(wallet.address, spender).await {
        Ok(allowance) => Some(allowance),
        Err(err) => {
            tracing::warn!(?err, "failed to read token allowance");
            metrics::chain_read_error("allowance");
            None
        }
    };
    account::AccountState {
        native_balance: Some(wallet.native_balance.clone()),
        token_balance,
        allowance,
    }
}
