//! Conversion utilities between big-number representations.

use {
    bigdecimal::{
        BigDecimal,
        num_bigint::{BigInt, Sign},
    },
    ethereum_types::U256,
    num::BigUint,
};

pub fn biguint_to_u256(i: &BigUint) -> Option<U256> {
    let bytes = i.to_bytes_be();
    if bytes.len() > 32 {
        return None;
    }
    Some(U256::from_big_endian(&bytes))
}

pub fn u256_to_biguint(i: &U256) -> BigUint {
    let mut bytes = [0_u8; 32];
    i.to_big_endian(&mut bytes);
    BigUint::from_bytes_be(&bytes)
}

pub fn bigint_to_u256(i: &BigInt) -> Option<U256> {
    if i.sign() == Sign::Minus {
        return None;
    }
    biguint_to_u256(i.magnitude())
}

/// Converts a base-unit integer into its human-readable decimal
/// representation for a token with the specified decimal count.
pub fn u256_to_decimal(i: &U256, decimals: u8) -> BigDecimal {
    BigDecimal::new(BigInt::from(u256_to_biguint(i)), i64::from(decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u256_biguint_round_trips() {
        for value in [
            U256::zero(),
            U256::one(),
            U256::from(1_500_000_000_000_000_000_u128),
            U256::MAX,
        ] {
            assert_eq!(biguint_to_u256(&u256_to_biguint(&value)).unwrap(), value);
        }
    }

    #[test]
    fn oversized_biguint_does_not_convert() {
        let too_big = BigUint::from(2_u8).pow(256);
        assert!(biguint_to_u256(&too_big).is_none());
    }

    #[test]
    fn negative_bigint_does_not_convert() {
        assert!(bigint_to_u256(&BigInt::from(-42)).is_none());
    }

    #[test]
    fn base_units_to_decimal() {
        for (raw, decimals, expected) in [
            (U256::from(1_500_000_000_000_000_000_u128), 18, "1.5"),
            (U256::from(42_u8), 0, "42"),
            (U256::from(1_u8), 6, "0.000001"),
            (U256::zero(), 18, "0"),
        ] {
            assert_eq!(
                u256_to_decimal(&raw, decimals).normalized(),
                expected.parse::<BigDecimal>().unwrap(),
            );
        }
    }
}
