use crate::domain::eth;

/// Static facts about the connected wallet, established once at page load and
/// immutable for the session.
#[derive(Clone, Debug)]
pub struct WalletInfo {
    pub network: eth::NetworkId,
    pub address: eth::Address,
    /// The wallet's native balance as reported by the host, already formatted
    /// for display.
    pub native_balance: String,
}

/// The wallet's on-chain state as of the last observed block. Every field is
/// independently optional: a `None` means "not read yet or last read failed"
/// and is distinct from a zero amount.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AccountState {
    pub native_balance: Option<String>,
    pub token_balance: Option<eth::TokenAmount>,
    pub allowance: Option<eth::TokenAmount>,
}

/// Whether a transaction batch is currently in flight to the relay.
///
/// At most one batch is in flight at a time; the UI disables the submit
/// affordances while `Submitting`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
}
