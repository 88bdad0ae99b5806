use {
    crate::domain::eth,
    serde::{Deserialize, Deserializer, Serializer, de},
    serde_with::{DeserializeAs, SerializeAs},
};

/// Serialize and deserialize [`ethereum_types::U256`] as a decimal string.
#[derive(Debug)]
pub struct U256;

impl<'de> DeserializeAs<'de, ethereum_types::U256> for U256 {
    fn deserialize_as<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<ethereum_types::U256, D::Error> {
        let s = std::borrow::Cow::<str>::deserialize(deserializer)?;
        ethereum_types::U256::from_dec_str(&s).map_err(de::Error::custom)
    }
}

impl SerializeAs<ethereum_types::U256> for U256 {
    fn serialize_as<S: Serializer>(
        value: &ethereum_types::U256,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }
}

impl<'de> DeserializeAs<'de, eth::Ether> for U256 {
    fn deserialize_as<D: Deserializer<'de>>(deserializer: D) -> Result<eth::Ether, D::Error> {
        Self::deserialize_as(deserializer).map(eth::Ether)
    }
}

impl SerializeAs<eth::Ether> for U256 {
    fn serialize_as<S: Serializer>(
        value: &eth::Ether,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        Self::serialize_as(&value.0, serializer)
    }
}
