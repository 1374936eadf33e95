use {
    primitive_types::U256,
    serde::{Deserialize, Deserializer, Serializer, de},
    serde_with::{DeserializeAs, SerializeAs},
    std::borrow::Cow,
};

/// Serializes a `U256` as a decimal string and accepts either a decimal
/// string, a `0x`-prefixed hex string or a plain integer when deserializing.
pub struct DecimalU256;

impl SerializeAs<U256> for DecimalU256 {
    fn serialize_as<S>(source: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(source)
    }
}

impl<'de> DeserializeAs<'de, U256> for DecimalU256 {
    fn deserialize_as<D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw<'a> {
            Integer(u64),
            #[serde(borrow)]
            String(Cow<'a, str>),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Integer(value) => Ok(U256::from(value)),
            Raw::String(value) => match value.strip_prefix("0x") {
                Some(hex) => U256::from_str_radix(hex, 16).map_err(de::Error::custom),
                None => U256::from_dec_str(&value).map_err(de::Error::custom),
            },
        }
    }
}
