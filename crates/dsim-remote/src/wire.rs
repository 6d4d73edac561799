//! Wire messages exchanged between endpoints.
//!
//! ```text
//! caller                                   owner
//!   │  Request { correlation, target, tag, argument }
//!   │ ───────────────────────────────────────▶ │ fill_remote_promise(tag, argument)
//!   │  Reply { correlation, outcome }          │
//!   │ ◀─────────────────────────────────────── │
//! ```
//!
//! `Announce`/`Withdraw` keep replicated name directories current, and
//! `Migrate` carries a serialized agent envelope to its new owner.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dsim_core::{CorrelationId, ProcessorId};

use crate::{Payload, RemoteResult};

/// Why a request produced no value.  Carried back in `Reply::outcome`.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Fault {
    #[error("no object named {0:?} on the target process")]
    NoSuchObject(String),

    #[error("handler failed: {0}")]
    Handler(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WireMessage {
    Request {
        correlation: CorrelationId,
        target:      String,
        tag:         u32,
        argument:    Payload,
    },
    Reply {
        correlation: CorrelationId,
        outcome:     Result<Payload, Fault>,
    },
    Announce {
        name:  String,
        owner: ProcessorId,
    },
    Withdraw {
        name:  String,
        owner: ProcessorId,
    },
    Migrate {
        envelope: Payload,
    },
}

impl WireMessage {
    pub fn encode(&self) -> RemoteResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> RemoteResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            WireMessage::Request { .. }  => "request",
            WireMessage::Reply { .. }    => "reply",
            WireMessage::Announce { .. } => "announce",
            WireMessage::Withdraw { .. } => "withdraw",
            WireMessage::Migrate { .. }  => "migrate",
        }
    }
}
