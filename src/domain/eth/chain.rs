use {
    super::TokenAddress,
    std::fmt::{self, Display, Formatter},
};

/// A supported network, identified by its canonical name as reported by the
/// host wallet.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NetworkId {
    Mainnet,
    Rinkeby,
    Gnosis,
}

impl NetworkId {
    /// Parses a network from the name the host wallet reports.
    pub fn from_name(name: &str) -> Result<Self, UnsupportedNetwork> {
        match name {
            "mainnet" => Ok(Self::Mainnet),
            "rinkeby" => Ok(Self::Rinkeby),
            "gnosis" => Ok(Self::Gnosis),
            _ => Err(UnsupportedNetwork(name.to_owned())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Rinkeby => "rinkeby",
            Self::Gnosis => "gnosis",
        }
    }

    /// The canonical wrapped-native-token contract deployed on this network.
    pub fn wrapped_native_token(&self) -> TokenAddress {
        let address = match self {
            Self::Mainnet => "c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
            Self::Rinkeby => "c778417e063141139fce010982780140aa0cd5ab",
            Self::Gnosis => "e91d153e0b41518a2ce8dd3d7944fa863463a97d",
        };
        TokenAddress(
            address
                .parse()
                .expect("wrapped token address for all supported networks"),
        )
    }
}

impl Display for NetworkId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for NetworkId {
    type Err = UnsupportedNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// A network name the application does not support.
#[derive(Clone, Debug, thiserror::Error)]
#[error("unsupported network {0:?}")]
pub struct UnsupportedNetwork(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_names_round_trip() {
        for network in [NetworkId::Mainnet, NetworkId::Rinkeby, NetworkId::Gnosis] {
            assert_eq!(NetworkId::from_name(network.name()).unwrap(), network);
            // The wrapped token table covers every variant.
            let _ = network.wrapped_native_token();
        }
        assert!(NetworkId::from_name("ropsten").is_err());
    }
}
