//! Remote-invocation error type.

use thiserror::Error;

use crate::transport::TransportError;

/// Errors produced by `dsim-remote`.
///
/// `DuplicateName`, `UnknownName` and `NotReady` are returned at call time.
/// `DeliveryFailed` and `Abandoned` are what a settled [`Promise`][crate::Promise]
/// reports from `get`; the failure itself happens asynchronously.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("name {0:?} is already registered on this process")]
    DuplicateName(String),

    #[error("name {0:?} could not be resolved")]
    UnknownName(String),

    #[error("call {tag} to {target:?} has not completed")]
    NotReady { target: String, tag: u32 },

    #[error("call {tag} to {target:?} failed: {reason}")]
    DeliveryFailed { target: String, tag: u32, reason: String },

    #[error("call {tag} to {target:?} was abandoned")]
    Abandoned { target: String, tag: u32 },

    #[error("codec error: {0}")]
    Codec(String),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

pub type RemoteResult<T> = Result<T, RemoteError>;

impl From<bincode::Error> for RemoteError {
    fn from(e: bincode::Error) -> Self {
        RemoteError::Codec(e.to_string())
    }
}
