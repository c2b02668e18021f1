//! Bounded free-list pools for inactive instances
//!
//! Pools hold handles to deactivated instances so they can be reused on the
//! next spawn instead of instantiating fresh ones. A pool never owns the
//! instances themselves (the [`Store`](crate::store::Store) does); it is just
//! a bounded list of handles. When a pool is full, `release` refuses the
//! handle and the caller destroys the instance for good.

use crate::store::Handle;

/// Bounded free list of inactive instance handles for one category
///
/// No ordering guarantee on which handle `acquire` returns: all instances of
/// a category are interchangeable once reset.
pub struct InstancePool<T> {
    handles: Vec<Handle<T>>,
    max_size: usize,
}

impl<T> InstancePool<T> {
    /// Create an empty pool holding at most `max_size` handles
    pub fn new(max_size: usize) -> Self {
        Self {
            handles: Vec::with_capacity(max_size),
            max_size,
        }
    }

    /// Take any available handle, or `None` if the pool is empty
    ///
    /// An empty pool is not an error: the caller instantiates a fresh
    /// instance from the catalog instead, so acquisition as a whole never
    /// fails for a non-empty catalog.
    pub fn acquire(&mut self) -> Option<Handle<T>> {
        self.handles.pop()
    }

    /// Park a handle for reuse
    ///
    /// Returns `false` when the pool is already at capacity; the caller must
    /// then destroy the instance instead of leaking it.
    pub fn release(&mut self, handle: Handle<T>) -> bool {
        if self.handles.len() >= self.max_size {
            return false;
        }
        self.handles.push(handle);
        true
    }

    /// Number of parked handles
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Check if the pool holds no handles
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Per-template pools for prop instances
///
/// Props keep their template identity across reuse, so each template gets its
/// own bounded pool and a released prop is routed back by template index. The
/// tile pool is a single shared [`InstancePool`] instead, because a cold tile
/// instantiation re-randomizes the variant anyway.
pub struct TemplatePools<T> {
    pools: Vec<InstancePool<T>>,
}

impl<T> TemplatePools<T> {
    /// Create one pool per template, each bounded by `max_each`
    pub fn new(template_count: usize, max_each: usize) -> Self {
        Self {
            pools: (0..template_count)
                .map(|_| InstancePool::new(max_each))
                .collect(),
        }
    }

    /// Take a parked handle for the given template, if any
    pub fn acquire(&mut self, template: usize) -> Option<Handle<T>> {
        self.pools.get_mut(template)?.acquire()
    }

    /// Park a handle under its template
    ///
    /// Returns `false` if the template's pool is full or the template index
    /// is out of range; the caller destroys the instance in either case.
    pub fn release(&mut self, template: usize, handle: Handle<T>) -> bool {
        match self.pools.get_mut(template) {
            Some(pool) => pool.release(handle),
            None => false,
        }
    }

    /// Total parked handles across all templates
    pub fn total_len(&self) -> usize {
        self.pools.iter().map(InstancePool::len).sum()
    }
}
