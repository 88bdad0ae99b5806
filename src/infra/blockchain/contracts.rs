//! Static bindings to the canonical wrapped-native-token (WETH9) interface.

use {crate::domain::eth, std::sync::OnceLock, web3::ethabi};

/// The subset of the WETH9 interface this application touches. The same
/// interface is deployed on every supported network.
const WETH9_ABI: &str = r#"[
    {
        "name": "deposit",
        "type": "function",
        "stateMutability": "payable",
        "inputs": [],
        "outputs": []
    },
    {
        "name": "withdraw",
        "type": "function",
        "stateMutability": "nonpayable",
        "inputs": [{"name": "wad", "type": "uint256"}],
        "outputs": []
    },
    {
        "name": "approve",
        "type": "function",
        "stateMutability": "nonpayable",
        "inputs": [
            {"name": "guy", "type": "address"},
            {"name": "wad", "type": "uint256"}
        ],
        "outputs": [{"name": "", "type": "bool"}]
    },
    {
        "name": "balanceOf",
        "type": "function",
        "stateMutability": "view",
        "inputs": [{"name": "", "type": "address"}],
        "outputs": [{"name": "", "type": "uint256"}]
    },
    {
        "name": "allowance",
        "type": "function",
        "stateMutability": "view",
        "inputs": [
            {"name": "", "type": "address"},
            {"name": "", "type": "address"}
        ],
        "outputs": [{"name": "", "type": "uint256"}]
    },
    {
        "name": "decimals",
        "type": "function",
        "stateMutability": "view",
        "inputs": [],
        "outputs": [{"name": "", "type": "uint8"}]
    }
]"#;

/// The shared WETH9 interface descriptor.
pub fn weth9() -> &'static ethabi::Contract {
    static CONTRACT: OnceLock<ethabi::Contract> = OnceLock::new();
    CONTRACT.get_or_init(|| {
        ethabi::Contract::load(WETH9_ABI.as_bytes()).expect("valid embedded WETH9 ABI")
    })
}

/// Encodes an `approve(address,uint256)` call.
pub fn encode_approve(spender: eth::Address, amount: eth::U256) -> Vec<u8> {
    weth9()
        .function("approve")
        .expect("approve in WETH9 ABI")
        .encode_input(&[ethabi::Token::Address(spender), ethabi::Token::Uint(amount)])
        .expect("approve arguments match WETH9 ABI")
}

/// Encodes a `deposit()` call. The deposited amount travels as the
/// transaction value, not as call data.
pub fn encode_deposit() -> Vec<u8> {
    weth9()
        .function("deposit")
        .expect("deposit in WETH9 ABI")
        .encode_input(&[])
        .expect("deposit takes no arguments")
}

/// Encodes a `withdraw(uint256)` call.
pub fn encode_withdraw(amount: eth::U256) -> Vec<u8> {
    weth9()
        .function("withdraw")
        .expect("withdraw in WETH9 ABI")
        .encode_input(&[ethabi::Token::Uint(amount)])
        .expect("withdraw arguments match WETH9 ABI")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_selectors() {
        for (function, selector) in [
            ("deposit", [0xd0, 0xe3, 0x0d, 0xb0]),
            ("withdraw", [0x2e, 0x1a, 0x7d, 0x4d]),
            ("approve", [0x09, 0x5e, 0xa7, 0xb3]),
            ("balanceOf", [0x70, 0xa0, 0x82, 0x31]),
            ("allowance", [0xdd, 0x62, 0xed, 0x3e]),
            ("decimals", [0x31, 0x3c, 0xe5, 0x67]),
        ] {
            assert_eq!(
                weth9().function(function).unwrap().short_signature(),
                selector,
                "{function}",
            );
        }
    }

    #[test]
    fn encodes_calls() {
        let spender: eth::Address =
            "00000000000000000000000000000000000000aa".parse().unwrap();

        let approve = encode_approve(spender, eth::U256::from(7));
        assert_eq!(approve.len(), 4 + 32 + 32);
        assert_eq!(&approve[..4], [0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(approve[35], 0xaa);
        assert_eq!(approve[67], 7);

        assert_eq!(encode_deposit(), [0xd0, 0xe3, 0x0d, 0xb0]);

        let withdraw = encode_withdraw(eth::U256::from(42));
        assert_eq!(withdraw.len(), 4 + 32);
        assert_eq!(&withdraw[..4], [0x2e, 0x1a, 0x7d, 0x4d]);
        assert_eq!(withdraw[35], 42);
    }
}
