use {
    serde::{Deserialize, Deserializer, Serializer, de},
    serde_with::{DeserializeAs, SerializeAs},
};

/// Serialize and deserialize binary data as a `0x`-prefixed hex string.
#[derive(Debug)]
pub struct Hex;

impl<'de> DeserializeAs<'de, Vec<u8>> for Hex {
    fn deserialize_as<D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = std::borrow::Cow::<str>::deserialize(deserializer)?;
        let data = s
            .strip_prefix("0x")
            .ok_or_else(|| de::Error::custom("hex string missing \"0x\" prefix"))?;
        hex::decode(data).map_err(de::Error::custom)
    }
}

impl SerializeAs<Vec<u8>> for Hex {
    fn serialize_as<S: Serializer>(value: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(value)))
    }
}
