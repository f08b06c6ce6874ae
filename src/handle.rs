//! Opaque context handles for callers that cannot hold a [`Context`] directly.
//!
//! A [`ContextRegistry`] owns every context it hands out. Each handle is released exactly once;
//! ids are never reused, so operating on a released handle is reported as
//! [`PolygonIndexError::HandleMisuse`] rather than reaching another context.

use std::collections::HashMap;

use log::trace;

use crate::context::{Context, ContextOptions};
use crate::error::{PolygonIndexError, Result};

/// An opaque reference to a context owned by a [`ContextRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextHandle(u64);

impl ContextHandle {
    /// The raw id, e.g. to pass across a language boundary.
    pub fn id(&self) -> u64 {
        self.0
    }

    /// Rebuild a handle from a raw id. Ids not issued by the registry are rejected on use.
    pub fn from_id(id: u64) -> Self {
        Self(id)
    }
}

/// Owner of all contexts created through handles.
///
/// ```
/// use polygon_bvh::{ContextRegistry, Point2D, PolygonIndexError};
///
/// let mut registry = ContextRegistry::new();
/// let handle = registry.create();
/// registry
///     .get_mut(handle)
///     .unwrap()
///     .add_polygon_interleaved(&[0., 0., 1., 0., 1., 1.], None)
///     .unwrap();
/// let context = registry.get(handle).unwrap();
/// assert_eq!(context.nearest_vertex_index(&[Point2D::new(0.9, 0.)]).unwrap(), vec![1]);
///
/// registry.release(handle).unwrap();
/// assert!(matches!(registry.get(handle), Err(PolygonIndexError::HandleMisuse(_))));
/// ```
#[derive(Debug, Default)]
pub struct ContextRegistry {
    contexts: HashMap<u64, Context>,
    next_id: u64,
}

impl ContextRegistry {
    /// Create a registry without any contexts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty context with default options.
    pub fn create(&mut self) -> ContextHandle {
        self.insert(Context::new())
    }

    /// Create an empty context with the given options.
    pub fn create_with_options(&mut self, options: ContextOptions) -> Result<ContextHandle> {
        Ok(self.insert(Context::try_with_options(options)?))
    }

    fn insert(&mut self, context: Context) -> ContextHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.contexts.insert(id, context);
        trace!("created context {}", id);
        ContextHandle(id)
    }

    /// Drop the context behind `handle`. Releasing twice is an error.
    pub fn release(&mut self, handle: ContextHandle) -> Result<()> {
        match self.contexts.remove(&handle.0) {
            Some(_) => {
                trace!("released context {}", handle.0);
                Ok(())
            }
            None => Err(self.misuse(handle)),
        }
    }

    /// Borrow the context behind `handle` for queries.
    pub fn get(&self, handle: ContextHandle) -> Result<&Context> {
        self.contexts
            .get(&handle.0)
            .ok_or_else(|| self.misuse(handle))
    }

    /// Borrow the context behind `handle` to add polygons.
    pub fn get_mut(&mut self, handle: ContextHandle) -> Result<&mut Context> {
        let misuse = self.misuse(handle);
        self.contexts.get_mut(&handle.0).ok_or(misuse)
    }

    /// The number of live contexts.
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Returns `true` if no context is live.
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    fn misuse(&self, handle: ContextHandle) -> PolygonIndexError {
        if handle.0 < self.next_id {
            PolygonIndexError::HandleMisuse(format!("Context {} was already released.", handle.0))
        } else {
            PolygonIndexError::HandleMisuse(format!("Context {} was never created.", handle.0))
        }
    }
}
