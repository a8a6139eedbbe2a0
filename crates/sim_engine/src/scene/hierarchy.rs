//! Transform hierarchy
//!
//! Parent/child links stored as two symmetric components plus a cached
//! world matrix per entity.
//!
//! Cache policy: [`LocalToWorld::dirty`] is cleared on every recompute and set
//! again by [`TransformHierarchy::set_local_transform`],
//! [`TransformHierarchy::set_parent`] and [`TransformHierarchy::mark_dirty`],
//! each of which dirties the whole subtree. Adding or removing a
//! [`TransformComponent`] or [`ParentComponent`] through the [`Scene`] does the
//! same. Code that edits a [`TransformComponent`] in place must call
//! `mark_dirty` itself.
//!
//! Destroying an entity through [`Scene::destroy_entity`] turns its children
//! into roots.
//!
//! Cycles are rejected when a parent is assigned. A cycle written through raw
//! component access is reported as [`EcsError::HierarchyCycle`] by
//! [`TransformHierarchy::compute_world_matrix`].

use std::collections::HashSet;

use log::{trace, warn};

use super::Scene;
use crate::ecs::components::{ChildrenComponent, LocalToWorld, ParentComponent, TransformComponent};
use crate::ecs::systems::TransformSystem;
use crate::ecs::{EcsError, EcsResult, Entity};
use crate::foundation::math::Mat4;

/// Parent/child bookkeeping and world-matrix composition over a [`Scene`]
pub struct TransformHierarchy;

impl TransformHierarchy {
    /// Register the transform system so world matrices are refreshed every frame
    ///
    /// Every entity with a [`TransformComponent`] gets a [`LocalToWorld`] on
    /// its first update. Call before registering systems that read it.
    pub fn register_systems(scene: &mut Scene) -> EcsResult<()> {
        let signature = scene.components().signature_of::<TransformComponent>()?;
        scene.register_system(TransformSystem::new(), signature)
    }
    
    /// Make `new_parent` the parent of `child`, or detach it when `new_parent`
    /// is [`Entity::NULL`]
    pub fn set_parent(scene: &mut Scene, child: Entity, new_parent: Entity) -> EcsResult<()> {
        scene.entities().live_index(child)?;
        if !new_parent.is_null() {
            scene.entities().live_index(new_parent)?;
            if Self::is_ancestor_or_self(scene, child, new_parent) {
                warn!("TransformHierarchy: rejected {} as parent of {}", new_parent, child);
                return Err(EcsError::HierarchyCycle { child, parent: new_parent });
            }
        }
        
        if let Some(old_parent) = Self::parent_of(scene, child) {
            if let Ok(children) = scene.get_component_mut::<ChildrenComponent>(old_parent) {
                children.remove(child);
            }
        }
        
        if scene.has_component::<ParentComponent>(child) {
            scene.get_component_mut::<ParentComponent>(child)?.parent = new_parent;
        } else {
            scene.add_component(child, ParentComponent { parent: new_parent })?;
        }
        
        if !new_parent.is_null() {
            if !scene.has_component::<ChildrenComponent>(new_parent) {
                scene.add_component(new_parent, ChildrenComponent::default())?;
            }
            scene.get_component_mut::<ChildrenComponent>(new_parent)?.insert(child);
        }
        
        trace!("TransformHierarchy: parent of {} is now {}", child, new_parent);
        Self::mark_dirty(scene, child)
    }
    
    /// Attach `child` under `parent`
    pub fn add_child(scene: &mut Scene, parent: Entity, child: Entity) -> EcsResult<()> {
        if parent.is_null() {
            return Err(EcsError::InvalidEntity(parent));
        }
        Self::set_parent(scene, child, parent)
    }
    
    /// Turn `child` into a root
    pub fn detach(scene: &mut Scene, child: Entity) -> EcsResult<()> {
        Self::set_parent(scene, child, Entity::NULL)
    }
    
    /// Parent of `entity`, if any
    pub fn parent_of(scene: &Scene, entity: Entity) -> Option<Entity> {
        scene
            .get_component::<ParentComponent>(entity)
            .ok()
            .and_then(ParentComponent::get)
    }
    
    /// Immediate children of `entity` in attach order
    pub fn children_of(scene: &Scene, entity: Entity) -> &[Entity] {
        scene
            .get_component::<ChildrenComponent>(entity)
            .map(ChildrenComponent::as_slice)
            .unwrap_or(&[])
    }
    
    /// Replace the local transform of `entity` and dirty its subtree
    pub fn set_local_transform(scene: &mut Scene, entity: Entity, transform: TransformComponent) -> EcsResult<()> {
        if scene.has_component::<TransformComponent>(entity) {
            *scene.get_component_mut::<TransformComponent>(entity)? = transform;
        } else {
            scene.add_component(entity, transform)?;
        }
        Self::mark_dirty(scene, entity)
    }
    
    /// Flag the cached world matrix of `entity` and all its descendants as stale
    pub fn mark_dirty(scene: &mut Scene, entity: Entity) -> EcsResult<()> {
        scene.entities().live_index(entity)?;
        
        let mut visited = HashSet::new();
        let mut pending = vec![entity];
        while let Some(current) = pending.pop() {
            if !visited.insert(current) {
                continue;
            }
            if let Ok(cache) = scene.get_component_mut::<LocalToWorld>(current) {
                cache.dirty = true;
            }
            pending.extend_from_slice(Self::children_of(scene, current));
        }
        Ok(())
    }
    
    /// World matrix of `entity`: its local matrix left-multiplied by the
    /// parent's world matrix, recursively
    ///
    /// Clean cached matrices are returned as is. Every recomputed matrix is
    /// stored in the entity's [`LocalToWorld`], which is added if missing.
    /// Entities without a [`TransformComponent`] contribute the identity.
    pub fn compute_world_matrix(scene: &mut Scene, entity: Entity) -> EcsResult<Mat4> {
        // A parent chain longer than the live population must revisit an entity
        let depth_budget = scene.entities().len();
        Self::compute_recursive(scene, entity, depth_budget)
    }
    
    /// Destroy `root` and every descendant, unlinking `root` from its parent
    ///
    /// Returns the number of destroyed entities.
    pub fn destroy_subtree(scene: &mut Scene, root: Entity) -> EcsResult<usize> {
        scene.entities().live_index(root)?;
        Self::detach(scene, root)?;
        
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        let mut pending = vec![root];
        while let Some(current) = pending.pop() {
            if !visited.insert(current) {
                continue;
            }
            order.push(current);
            pending.extend_from_slice(Self::children_of(scene, current));
        }
        
        for &entity in order.iter().rev() {
            scene.destroy_entity(entity)?;
        }
        Ok(order.len())
    }
    
    /// Cut every hierarchy link of `entity` ahead of its destruction
    ///
    /// Its children become dirty roots and its parent forgets it.
    pub(super) fn unlink(scene: &mut Scene, entity: Entity) -> EcsResult<()> {
        if let Some(parent) = Self::parent_of(scene, entity) {
            if let Ok(children) = scene.get_component_mut::<ChildrenComponent>(parent) {
                children.remove(entity);
            }
        }
        
        let orphans = Self::children_of(scene, entity).to_vec();
        for child in orphans {
            if let Ok(link) = scene.get_component_mut::<ParentComponent>(child) {
                if link.parent == entity {
                    link.parent = Entity::NULL;
                }
            }
            if scene.entities().is_alive(child) {
                Self::mark_dirty(scene, child)?;
            }
        }
        Ok(())
    }
    
    fn compute_recursive(scene: &mut Scene, entity: Entity, depth_budget: usize) -> EcsResult<Mat4> {
        scene.entities().live_index(entity)?;
        
        if let Ok(cache) = scene.get_component::<LocalToWorld>(entity) {
            if !cache.dirty {
                return Ok(cache.matrix);
            }
        }
        
        let local = scene
            .get_component::<TransformComponent>(entity)
            .map_or_else(|_| Mat4::identity(), TransformComponent::to_matrix);
        
        let world = match Self::parent_of(scene, entity) {
            Some(parent) => {
                if depth_budget == 0 {
                    return Err(EcsError::HierarchyCycle { child: entity, parent });
                }
                Self::compute_recursive(scene, parent, depth_budget - 1)? * local
            }
            None => local,
        };
        
        if scene.has_component::<LocalToWorld>(entity) {
            let cache = scene.get_component_mut::<LocalToWorld>(entity)?;
            cache.matrix = world;
            cache.dirty = false;
        } else {
            scene.add_component(entity, LocalToWorld { matrix: world, dirty: false })?;
        }
        Ok(world)
    }
    
    /// Whether `candidate` is `entity` or one of its descendants, judged by
    /// walking up from `candidate`
    fn is_ancestor_or_self(scene: &Scene, entity: Entity, candidate: Entity) -> bool {
        let mut current = Some(candidate);
        let mut steps = 0;
        while let Some(node) = current {
            if node == entity {
                return true;
            }
            steps += 1;
            if steps > scene.entities().len() {
                // pre-existing loop above `candidate`; it cannot contain `entity`
                // without having returned already
                return false;
            }
            current = Self::parent_of(scene, node);
        }
        false
    }
}
