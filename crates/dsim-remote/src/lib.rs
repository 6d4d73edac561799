//! `dsim-remote` — call distinguished objects by name across processes.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`registry`]  | `Distinguished` trait, `RemoteObjectRegistry`              |
//! | [`directory`] | `NameDirectory` trait, `SharedDirectory`, `LocalDirectory` |
//! | [`promise`]   | `Promise`, `PromiseState`                                  |
//! | [`endpoint`]  | `RemoteEndpoint` (register / invoke / pump), `PumpReport`  |
//! | [`wire`]      | `WireMessage`, `Fault` — bincode-encoded protocol messages |
//! | [`payload`]   | `Payload` — opaque serialized argument/result              |
//! | [`transport`] | `Transport` trait, `LoopbackNetwork` in-memory transport   |
//! | [`error`]     | `RemoteError`, `RemoteResult<T>`                           |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let net = LoopbackNetwork::new(2);
//! let dir = SharedDirectory::new();
//! let mut p0 = RemoteEndpoint::new(net.endpoint(ProcessorId(0))?, dir.clone());
//! let mut p1 = RemoteEndpoint::new(net.endpoint(ProcessorId(1))?, dir.clone());
//!
//! p1.register("A", Box::new(|_tag, _arg: &Payload| Payload::encode(&42u32)))?;
//! let promise = p0.invoke("A", 0, &())?;
//! p1.pump(Tick(0));   // serves the request
//! p0.pump(Tick(0));   // settles the promise
//! assert_eq!(promise.get::<u32>()?, 42);
//! ```

pub mod directory;
pub mod endpoint;
pub mod error;
pub mod payload;
pub mod promise;
pub mod registry;
pub mod transport;
pub mod wire;


pub use directory::{LocalDirectory, NameDirectory, SharedDirectory};
pub use endpoint::{PumpReport, RemoteEndpoint};
pub use error::{RemoteError, RemoteResult};
pub use payload::Payload;
pub use promise::{Promise, PromiseState};
pub use registry::{Distinguished, RemoteObjectRegistry};
pub use transport::{LoopbackNetwork, LoopbackTransport, Transport, TransportError, TransportEvent};
pub use wire::{Fault, WireMessage};
