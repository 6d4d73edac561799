//! Cross-process name → owning process directory.
//!
//! The endpoint calls into a [`NameDirectory`] but does not own its
//! consistency protocol.  Two implementations cover the usual strategies:
//!
//! | Type              | Strategy                                              |
//! |-------------------|-------------------------------------------------------|
//! | `SharedDirectory` | one coordinator table; every process holds a handle   |
//! | `LocalDirectory`  | per-process replica fed by `Announce`/`Withdraw` broadcasts |
//!
//! The endpoint broadcasts `Announce`/`Withdraw` only when its directory
//! reports itself as a replica; a shared table is already current.

use std::sync::{Arc, PoisonError, RwLock};

use rustc_hash::FxHashMap;

use dsim_core::ProcessorId;

pub trait NameDirectory {
    /// Record that `name` now lives on `owner`.
    fn publish(&mut self, name: &str, owner: ProcessorId);

    /// Forget `name`, but only if it is still recorded as living on `owner`.
    /// A stale withdraw arriving after the name moved is ignored.
    fn withdraw(&mut self, name: &str, owner: ProcessorId);

    /// The process currently hosting `name`.
    fn resolve(&self, name: &str) -> Option<ProcessorId>;

    /// `true` if this is a per-process copy that must be fed peer
    /// broadcasts.
    fn is_replica(&self) -> bool {
        false
    }
}

/// Per-process replica.
#[derive(Debug, Default, Clone)]
pub struct LocalDirectory {
    entries: FxHashMap<String, ProcessorId>,
}

impl LocalDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl NameDirectory for LocalDirectory {
    fn publish(&mut self, name: &str, owner: ProcessorId) {
        self.entries.insert(name.to_owned(), owner);
    }

    fn withdraw(&mut self, name: &str, owner: ProcessorId) {
        if self.entries.get(name) == Some(&owner) {
            self.entries.remove(name);
        }
    }

    fn resolve(&self, name: &str) -> Option<ProcessorId> {
        self.entries.get(name).copied()
    }

    fn is_replica(&self) -> bool {
        true
    }
}

/// Coordinator table shared by every process in the address space.
/// Cloning yields another handle onto the same table.
#[derive(Debug, Default, Clone)]
pub struct SharedDirectory {
    inner: Arc<RwLock<LocalDirectory>>,
}

impl SharedDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NameDirectory for SharedDirectory {
    fn publish(&mut self, name: &str, owner: ProcessorId) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .publish(name, owner);
    }

    fn withdraw(&mut self, name: &str, owner: ProcessorId) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .withdraw(name, owner);
    }

    fn resolve(&self, name: &str) -> Option<ProcessorId> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .resolve(name)
    }
}
