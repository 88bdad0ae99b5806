//! Chain-connection lifecycle and on-chain-state synchronization core for a
//! custodial multi-signature wrapped-token app.
//!
//! The crate establishes a provider connection once the host environment is
//! ready, tracks the chain's block height as a refresh signal, derives token
//! balance and allowance state from it, builds decimal-scaled approve /
//! deposit / withdraw transaction intents and forwards them to the host
//! wallet's transaction relay. Signing, broadcasting and confirmation belong
//! to the relay and are out of scope.

pub mod domain;
pub mod infra;
#[cfg(test)]
mod tests;
pub mod util;
