//! Ordered composite of components.

use crate::buffer::RenderBuffer;
use crate::component::{Component, ComponentId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Child = (ComponentId, Arc<dyn Component>);

/// Renders its children top to bottom in insertion order.
#[derive(Default)]
pub struct Container {
    children: Mutex<Vec<Child>>,
}

impl Container {
    /// Create an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Child>> {
        self.children.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a child; the returned id removes it again.
    pub fn add(&self, component: Arc<dyn Component>) -> ComponentId {
        let id = ComponentId::next();
        self.lock().push((id, component));
        id
    }

    /// Insert a child at `index` (clamped to the current length).
    pub fn insert(&self, index: usize, component: Arc<dyn Component>) -> ComponentId {
        let id = ComponentId::next();
        let mut children = self.lock();
        let index = index.min(children.len());
        children.insert(index, (id, component));
        id
    }

    /// Remove the child with `id`.
    pub fn remove(&self, id: ComponentId) -> Option<Arc<dyn Component>> {
        let mut children = self.lock();
        let index = children.iter().position(|(child, _)| *child == id)?;
        Some(children.remove(index).1)
    }

    /// Remove every child.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Child ids in paint order.
    #[must_use]
    pub fn ids(&self) -> Vec<ComponentId> {
        self.lock().iter().map(|(id, _)| *id).collect()
    }

    fn snapshot(&self) -> Vec<Arc<dyn Component>> {
        self.lock().iter().map(|(_, c)| Arc::clone(c)).collect()
    }
}

impl Component for Container {
    fn render(&self, buf: &mut RenderBuffer, width: usize) {
        // Children render without the list lock held so they may mutate the
        // container (or be mutated) concurrently.
        for child in self.snapshot() {
            child.render(buf, width);
        }
    }

    fn invalidate(&self) {
        for child in self.snapshot() {
            child.invalidate();
        }
    }
}
