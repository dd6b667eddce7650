//! Serde support for arkworks values.
//!
//! Field elements do not implement serde themselves. Annotate fields (or
//! containers of them) with `#[serde_as(as = "arith_utils::serialization::SerdeAs")]`
//! and they are written as the byte string of their compressed canonical
//! encoding.

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde_with::{Bytes, DeserializeAs, SerializeAs};

/// Adapter for any [CanonicalSerialize] + [CanonicalDeserialize] type.
pub struct SerdeAs;

impl<T: CanonicalSerialize> SerializeAs<T> for SerdeAs {
    fn serialize_as<S: serde::Serializer>(val: &T, serializer: S) -> Result<S::Ok, S::Error> {
        let mut bytes = Vec::with_capacity(val.compressed_size());
        val.serialize_compressed(&mut bytes)
            .map_err(serde::ser::Error::custom)?;
        Bytes::serialize_as(&bytes, serializer)
    }
}

impl<'de, T: CanonicalDeserialize> DeserializeAs<'de, T> for SerdeAs {
    fn deserialize_as<D: serde::Deserializer<'de>>(deserializer: D) -> Result<T, D::Error> {
        let bytes: Vec<u8> = Bytes::deserialize_as(deserializer)?;
        T::deserialize_compressed(&mut &bytes[..]).map_err(serde::de::Error::custom)
    }
}
