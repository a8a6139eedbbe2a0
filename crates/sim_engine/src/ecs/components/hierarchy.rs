//! Parent/child hierarchy components
//!
//! `ParentComponent` and `ChildrenComponent` are kept symmetric by
//! [`crate::scene::TransformHierarchy`]. Writing them directly bypasses that
//! bookkeeping.

use crate::ecs::{Component, Entity};
use crate::foundation::math::Mat4;

/// Link from an entity to its parent; [`Entity::NULL`] for roots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentComponent {
    /// Parent entity or the null sentinel
    pub parent: Entity,
}

impl Component for ParentComponent {}

impl Default for ParentComponent {
    fn default() -> Self {
        Self { parent: Entity::NULL }
    }
}

impl ParentComponent {
    /// Parent if one is set
    pub fn get(&self) -> Option<Entity> {
        (!self.parent.is_null()).then_some(self.parent)
    }
}

/// Immediate children of an entity, in attach order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildrenComponent {
    children: Vec<Entity>,
}

impl Component for ChildrenComponent {}

impl ChildrenComponent {
    /// Add `child`; returns false if it was already present
    pub fn insert(&mut self, child: Entity) -> bool {
        if self.contains(child) {
            return false;
        }
        self.children.push(child);
        true
    }
    
    /// Remove `child`; returns false if it was absent
    pub fn remove(&mut self, child: Entity) -> bool {
        let before = self.children.len();
        self.children.retain(|&c| c != child);
        self.children.len() != before
    }
    
    /// Whether `child` is an immediate child
    pub fn contains(&self, child: Entity) -> bool {
        self.children.contains(&child)
    }
    
    /// Children in attach order
    pub fn as_slice(&self) -> &[Entity] {
        &self.children
    }
    
    /// Number of immediate children
    pub fn len(&self) -> usize {
        self.children.len()
    }
    
    /// Whether there are no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Cached local-to-world matrix
///
/// `dirty` is set whenever the entity's local transform or any ancestor
/// changes, and cleared when the matrix is recomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalToWorld {
    /// Last computed world matrix
    pub matrix: Mat4,
    /// Whether `matrix` is stale
    pub dirty: bool,
}

impl Component for LocalToWorld {}

impl Default for LocalToWorld {
    fn default() -> Self {
        Self {
            matrix: Mat4::identity(),
            dirty: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_children_set_semantics() {
        let mut children = ChildrenComponent::default();
        let a = Entity::from_raw(4);
        let b = Entity::from_raw(2);
        
        assert!(children.insert(a));
        assert!(children.insert(b));
        assert!(!children.insert(a));
        assert_eq!(children.as_slice(), &[a, b]);
        
        assert!(children.remove(a));
        assert!(!children.remove(a));
        assert_eq!(children.len(), 1);
    }
    
    #[test]
    fn test_default_parent_is_root() {
        assert_eq!(ParentComponent::default().get(), None);
        assert_eq!(ParentComponent { parent: Entity::from_raw(9) }.get(), Some(Entity::from_raw(9)));
        assert!(LocalToWorld::default().dirty);
    }
}
