//! Document-owned object store.
//!
//! Every canonical object, and every auxiliary object it needs (font
//! descriptors, font programs, soft masks), lives here. Everything else in
//! the graph holds an [`ObjectRef`] into the store instead of owning the
//! object.

use crate::error::{Error, Result};
use crate::object::{Object, ObjectRef};

/// Maximum number of references followed by [`ObjectStore::resolve`]
const MAX_REFERENCE_CHAIN: usize = 32;

/// Arena of indirect objects, numbered sequentially from 1.
#[derive(Debug, Clone, Default)]
pub struct ObjectStore {
    /// Object bodies; object number `n` lives at index `n - 1`
    objects: Vec<Object>,
}

/// Position in the store captured by [`ObjectStore::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreMark(usize);

impl ObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object and return its indirect reference.
    pub fn insert(&mut self, obj: Object) -> ObjectRef {
        self.objects.push(obj);
        ObjectRef::new(self.objects.len() as u32, 0)
    }

    /// Reserve a reference now and fill the body in later with [`replace`](Self::replace).
    pub fn reserve(&mut self) -> ObjectRef {
        self.insert(Object::Null)
    }

    fn index_of(&self, r: ObjectRef) -> Result<usize> {
        let idx = (r.id as usize).wrapping_sub(1);
        if r.gen != 0 || idx >= self.objects.len() {
            return Err(Error::ObjectNotFound(r.id, r.gen));
        }
        Ok(idx)
    }

    /// Dereference an indirect reference.
    pub fn get(&self, r: ObjectRef) -> Result<&Object> {
        let idx = self.index_of(r)?;
        Ok(&self.objects[idx])
    }

    /// Follow references until a direct object is reached.
    ///
    /// Direct objects are returned as-is.
    pub fn resolve<'a>(&'a self, mut obj: &'a Object) -> Result<&'a Object> {
        let mut hops = 0;
        while let Object::Reference(r) = obj {
            if hops == MAX_REFERENCE_CHAIN {
                log::warn!("Giving up on reference chain at {}", r);
                return Err(Error::CircularReference(r.id, r.gen));
            }
            obj = self.get(*r)?;
            hops += 1;
        }
        Ok(obj)
    }

    /// Mutable dereference.
    pub fn get_mut(&mut self, r: ObjectRef) -> Result<&mut Object> {
        let idx = self.index_of(r)?;
        Ok(&mut self.objects[idx])
    }

    /// Replace the body of an existing object, returning the old body.
    pub fn replace(&mut self, r: ObjectRef, obj: Object) -> Result<Object> {
        let idx = self.index_of(r)?;
        Ok(std::mem::replace(&mut self.objects[idx], obj))
    }

    /// Capture the current end of the store.
    pub fn mark(&self) -> StoreMark {
        StoreMark(self.objects.len())
    }

    /// Drop every object inserted after `mark`.
    ///
    /// Used to discard auxiliary objects of a materialization that failed
    /// part-way, so no orphaned objects reach the serialized graph.
    pub fn rollback(&mut self, mark: StoreMark) {
        if mark.0 < self.objects.len() {
            log::trace!(
                "Rolling back {} object(s) to mark {}",
                self.objects.len() - mark.0,
                mark.0
            );
            self.objects.truncate(mark.0);
        }
    }

    /// Number of objects in the store.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate over all objects in object-number order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectRef, &Object)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(idx, obj)| (ObjectRef::new(idx as u32 + 1, 0), obj))
    }
}
