//! User-entered wrap and unwrap amounts and the transaction intents built
//! from them.

use {
    crate::{
        domain::eth,
        infra::blockchain::{Connection, contracts},
        util,
    },
    bigdecimal::{BigDecimal, num_bigint::BigInt},
};

/// A user-entered token amount, validated to be a non-negative decimal
/// number. Scaling into base units is deferred until the token's decimal
/// count is known.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Amount(BigDecimal);

impl Amount {
    /// Validates raw user input. Fails without touching the chain.
    pub fn new(input: &str) -> Result<Self, InvalidAmount> {
        let value: BigDecimal = input
            .trim()
            .parse()
            .map_err(|_| InvalidAmount::NotNumeric)?;
        if value < BigDecimal::from(0) {
            return Err(InvalidAmount::Negative);
        }
        Ok(Self(value))
    }

    /// Scales the amount into base units of a token with the given decimal
    /// count.
    pub fn to_base_units(&self, decimals: u8) -> Result<eth::U256, InvalidAmount> {
        let (digits, exponent) = self.0.normalized().as_bigint_and_exponent();
        if digits == BigInt::from(0) {
            return Ok(eth::U256::zero());
        }
        let shift = i64::from(decimals) - exponent;
        if shift < 0 {
            // The normalized digits carry no trailing zeros, so a negative
            // shift always truncates.
            return Err(InvalidAmount::TooPrecise { decimals });
        }
        // A uint256 holds fewer than 78 decimal digits. Rejecting larger
        // shifts up front keeps huge exponents from materializing an
        // astronomically large integer just to fail the conversion.
        if shift > 77 {
            return Err(InvalidAmount::Overflow);
        }
        let scaled = digits * BigInt::from(10).pow(shift as u32);
        util::conv::bigint_to_u256(&scaled).ok_or(InvalidAmount::Overflow)
    }
}

/// Builds an ERC20 `approve` call granting `spender` the given allowance of
/// the connection's wrapped token. Syntactically invalid input fails before
/// any chain interaction.
pub async fn approve(
    connection: &Connection,
    spender: eth::Address,
    amount: &str,
) -> Result<eth::TransactionIntent, InvalidAmount> {
    let amount = Amount::new(amount)?;
    let allowance = amount.to_base_units(connection.token_decimals().await)?;
    Ok(eth::TransactionIntent {
        to: connection.token().into(),
        value: eth::Ether::default(),
        data: contracts::encode_approve(spender, allowance),
    })
}

/// Builds a wrap: a `deposit` call carrying the native value to wrap as the
/// transaction value, with no arguments.
pub async fn wrap(
    connection: &Connection,
    amount: &str,
) -> Result<eth::TransactionIntent, InvalidAmount> {
    let amount = Amount::new(amount)?;
    let value = amount.to_base_units(connection.token_decimals().await)?;
    Ok(eth::TransactionIntent {
        to: connection.token().into(),
        value: eth::Ether(value),
        data: contracts::encode_deposit(),
    })
}

/// Builds an unwrap: a `withdraw` call burning wrapped tokens in exchange
/// for native currency.
pub async fn unwrap(
    connection: &Connection,
    amount: &str,
) -> Result<eth::TransactionIntent, InvalidAmount> {
    let amount = Amount::new(amount)?;
    let burned = amount.to_base_units(connection.token_decimals().await)?;
    Ok(eth::TransactionIntent {
        to: connection.token().into(),
        value: eth::Ether::default(),
        data: contracts::encode_withdraw(burned),
    })
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum InvalidAmount {
    #[error("amount is not a number")]
    NotNumeric,
    #[error("amount is negative")]
    Negative,
    #[error("amount has more decimal places than the token's {decimals}")]
    TooPrecise { decimals: u8 },
    #[error("amount does not fit a uint256")]
    Overflow,
}
