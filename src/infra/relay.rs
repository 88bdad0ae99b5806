//! The host wallet's transaction relay, which collects signatures and
//! broadcasts submitted batches on this application's behalf.

use {
    crate::{
        domain::{account, eth},
        infra::metrics,
    },
    async_trait::async_trait,
    std::sync::Arc,
    tokio::sync::watch,
};

/// An opaque identifier the relay assigns to a submitted batch.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct BatchId(pub String);

/// The relay's record of a submitted batch.
#[derive(Clone, Debug)]
pub struct RelayedTransaction {
    pub id: BatchId,
    pub record: serde_json::Value,
}

/// Access to the host wallet's relay. Both calls are black-box asynchronous
/// operations that may fail or time out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionRelay: Send + Sync + 'static {
    /// Hands a batch of intents over for signature collection. Returns the
    /// identifier assigned to the batch.
    async fn send_transactions(
        &self,
        intents: Vec<eth::TransactionIntent>,
    ) -> Result<BatchId, Error>;

    /// Loads the relay's record for a previously submitted batch.
    async fn transaction(&self, id: &BatchId) -> Result<serde_json::Value, Error>;
}

/// Forwards built intents to the relay and tracks whether a batch is in
/// flight.
pub struct Submitter {
    relay: Arc<dyn TransactionRelay>,
    state: watch::Sender<account::SubmissionState>,
}

impl Submitter {
    pub fn new(relay: Arc<dyn TransactionRelay>) -> Self {
        let (state, _) = watch::channel(account::SubmissionState::default());
        Self { relay, state }
    }

    /// Watches the in-flight state.
    pub fn state(&self) -> watch::Receiver<account::SubmissionState> {
        self.state.subscribe()
    }

    /// Submits a single intent.
    pub async fn submit(
        &self,
        intent: eth::TransactionIntent,
    ) -> Result<RelayedTransaction, Error> {
        self.submit_all(vec![intent]).await
    }

    /// Submits a batch of intents and loads the relay's record for it. The
    /// submission state reads `Submitting` for the duration of the call and
    /// returns to `Idle` on every exit path, including errors and
    /// cancellation.
    pub async fn submit_all(
        &self,
        intents: Vec<eth::TransactionIntent>,
    ) -> Result<RelayedTransaction, Error> {
        self.state.send_replace(account::SubmissionState::Submitting);
        let _reset = ResetToIdle(&self.state);

        let id = self.relay.send_transactions(intents).await.map_err(|err| {
            tracing::warn!(?err, "relay rejected transaction batch");
            metrics::submission("rejected");
            err
        })?;
        let record = self.relay.transaction(&id).await.map_err(|err| {
            tracing::warn!(id = %id.0, ?err, "failed to load submitted transaction");
            metrics::submission("record-load-failed");
            err
        })?;
        tracing::info!(id = %id.0, "transaction batch submitted");
        metrics::submission("submitted");
        Ok(RelayedTransaction { id, record })
    }
}

/// Resets the submission state when dropped.
struct ResetToIdle<'a>(&'a watch::Sender<account::SubmissionState>);

impl Drop for ResetToIdle<'_> {
    fn drop(&mut self) {
        self.0.send_replace(account::SubmissionState::Idle);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("relay rejected the batch: {0}")]
    Rejected(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
