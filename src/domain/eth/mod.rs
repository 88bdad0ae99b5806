mod chain;

use {
    crate::util::{self, serialize},
    bigdecimal::BigDecimal,
    serde::{Deserialize, Serialize},
    serde_with::serde_as,
    std::fmt::{self, Debug, Formatter},
};

pub use {
    self::chain::{NetworkId, UnsupportedNetwork},
    ethereum_types::{H160, H256, U256},
};

/// An externally-owned or contract account address.
pub type Address = H160;

/// The decimal count assumed for a wrapped-native token when the on-chain
/// `decimals()` read fails.
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

/// A contract address.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct ContractAddress(pub Address);

/// An ERC20 token address.
///
/// https://eips.ethereum.org/EIPS/eip-20
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TokenAddress(pub Address);

impl From<Address> for TokenAddress {
    fn from(inner: Address) -> Self {
        Self(inner)
    }
}

impl From<TokenAddress> for ContractAddress {
    fn from(token: TokenAddress) -> Self {
        Self(token.0)
    }
}

/// An Ether amount in wei.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Ether(pub U256);

impl From<U256> for Ether {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

/// A chain block height.
///
/// Tracked as a change signal for re-deriving on-chain state, not as a
/// trusted ledger position; consumers react to changes, not magnitude.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct BlockNumber(pub u64);

impl From<u64> for BlockNumber {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A token amount as a base-unit integer paired with the token's decimal
/// count. Two amounts are comparable or addable only after normalizing to
/// the same decimal count.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TokenAmount {
    pub amount: U256,
    pub decimals: u8,
}

impl TokenAmount {
    pub fn new(amount: U256, decimals: u8) -> Self {
        Self { amount, decimals }
    }

    /// The human-readable decimal representation of this amount.
    pub fn to_decimal(&self) -> BigDecimal {
        util::conv::u256_to_decimal(&self.amount, self.decimals)
    }

    /// Rescales the amount to a different decimal count. Returns `None` if
    /// the rescale would lose precision or overflow.
    pub fn normalize_to(&self, decimals: u8) -> Option<Self> {
        let amount = match decimals.cmp(&self.decimals) {
            std::cmp::Ordering::Equal => self.amount,
            std::cmp::Ordering::Greater => {
                let factor =
                    U256::from(10).checked_pow(U256::from(decimals - self.decimals))?;
                self.amount.checked_mul(factor)?
            }
            std::cmp::Ordering::Less => {
                let factor =
                    U256::from(10).checked_pow(U256::from(self.decimals - decimals))?;
                if !(self.amount % factor).is_zero() {
                    return None;
                }
                self.amount / factor
            }
        };
        Some(Self { amount, decimals })
    }
}

/// An immutable transaction intent handed over to the host wallet's relay.
///
/// Serializes as the relay's wire shape: hex address, decimal wei value,
/// `0x`-prefixed calldata.
#[serde_as]
#[derive(Clone, Deserialize, Eq, PartialEq, Serialize)]
pub struct TransactionIntent {
    /// The contract the call targets.
    pub to: ContractAddress,
    /// The native value carried by the call, in wei.
    #[serde_as(as = "serialize::U256")]
    pub value: Ether,
    /// The ABI-encoded call.
    #[serde_as(as = "serialize::Hex")]
    pub data: Vec<u8>,
}

impl Debug for TransactionIntent {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("TransactionIntent")
            .field("to", &self.to)
            .field("value", &self.value)
            .field("data", &util::fmt::Hex(&self.data))
            .finish()
    }
}
