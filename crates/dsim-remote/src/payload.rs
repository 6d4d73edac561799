//! `Payload` — an opaque serialized value.
//!
//! Remote-call arguments and results cross the wire as bincode bytes.  The
//! protocol never looks inside; only the caller and the handler agree on
//! the concrete type.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::RemoteResult;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Payload(Vec<u8>);

impl Payload {
    /// Serialize `value`.
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> RemoteResult<Self> {
        Ok(Payload(bincode::serialize(value)?))
    }

    /// Deserialize the carried value as `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> RemoteResult<T> {
        Ok(bincode::deserialize(&self.0)?)
    }

    /// Wrap bytes that are already serialized.
    #[inline]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Payload(bytes)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
