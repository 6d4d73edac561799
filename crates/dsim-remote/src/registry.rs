//! `Distinguished` objects and the per-process registry that hosts them.

use rustc_hash::FxHashMap;

use crate::{Payload, RemoteError, RemoteResult};

/// An object reachable by a stable logical name from any process.
///
/// The handler is the only extension point: given the `tag` the caller chose
/// and its serialized `argument`, produce a serialized result.  What a tag
/// means is a contract between the caller and the implementor.
///
/// # Example
///
/// ```rust,ignore
/// struct WhereAmI(ProcessorId);
///
/// impl Distinguished for WhereAmI {
///     fn fill_remote_promise(&mut self, tag: u32, _arg: &Payload) -> RemoteResult<Payload> {
///         match tag {
///             0 => Payload::encode(&self.0),
///             _ => Payload::encode(&()),
///         }
///     }
/// }
/// ```
pub trait Distinguished: Send + 'static {
    fn fill_remote_promise(&mut self, tag: u32, argument: &Payload) -> RemoteResult<Payload>;
}

impl<F> Distinguished for F
where
    F: FnMut(u32, &Payload) -> RemoteResult<Payload> + Send + 'static,
{
    fn fill_remote_promise(&mut self, tag: u32, argument: &Payload) -> RemoteResult<Payload> {
        self(tag, argument)
    }
}

/// Name → locally resident object.  At most one object per name.
#[derive(Default)]
pub struct RemoteObjectRegistry {
    objects: FxHashMap<String, Box<dyn Distinguished>>,
}

impl RemoteObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `object`.  Fails if `name` is already bound here.
    pub fn insert(&mut self, name: &str, object: Box<dyn Distinguished>) -> RemoteResult<()> {
        if self.objects.contains_key(name) {
            return Err(RemoteError::DuplicateName(name.to_owned()));
        }
        self.objects.insert(name.to_owned(), object);
        Ok(())
    }

    /// Unbind `name`, handing back its object.
    pub fn remove(&mut self, name: &str) -> RemoteResult<Box<dyn Distinguished>> {
        self.objects
            .remove(name)
            .ok_or_else(|| RemoteError::UnknownName(name.to_owned()))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn Distinguished + 'static)> {
        self.objects.get_mut(name).map(|b| b.as_mut())
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.objects.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
