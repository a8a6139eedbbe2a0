//! # Renderable Collector
//!
//! Collects every visible renderable entity with its world matrix into a
//! sorted draw list. The renderer consumes [`RenderableCollector::items`]
//! after `update_all`; the ECS core itself never touches the GPU.

use crate::ecs::components::{RenderableComponent, TransformComponent, MaterialId, MeshId};
use crate::ecs::{EcsResult, Entity, System};
use crate::foundation::math::Mat4;
use crate::scene::{Scene, TransformHierarchy};

/// One draw request for the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    /// Source entity
    pub entity: Entity,
    /// Mesh to draw
    pub mesh: MeshId,
    /// Material to bind
    pub material: MaterialId,
    /// Render layer used for ordering
    pub render_layer: u8,
    /// Local-to-world matrix
    pub world: Mat4,
}

/// System responsible for collecting renderables into a draw list
#[derive(Debug)]
pub struct RenderableCollector {
    items: Vec<RenderItem>,
    enabled: bool,
}

impl RenderableCollector {
    /// Create a new renderable collector
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            enabled: true,
        }
    }
    
    /// Register the collector on `scene` with its required signature
    ///
    /// Entities need a [`RenderableComponent`] and a [`TransformComponent`];
    /// the world matrix cache is created on demand.
    pub fn register(scene: &mut Scene) -> EcsResult<()> {
        let signature = scene.components().signature_of::<RenderableComponent>()?
            | scene.components().signature_of::<TransformComponent>()?;
        scene.register_system(Self::new(), signature)
    }
    
    /// Enable or disable the collector
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
    
    /// Check if the collector is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
    
    /// Draw list from the last update, ordered by layer then entity
    pub fn items(&self) -> &[RenderItem] {
        &self.items
    }
}

impl Default for RenderableCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl System for RenderableCollector {
    fn update(&mut self, scene: &mut Scene, entities: &[Entity], _delta_time: f32) -> EcsResult<()> {
        self.items.clear();
        if !self.enabled {
            return Ok(());
        }
        
        for &entity in entities {
            let Ok(renderable) = scene.get_component::<RenderableComponent>(entity) else {
                continue;
            };
            if !renderable.visible {
                continue;
            }
            let (mesh, material, render_layer) = (renderable.mesh, renderable.material, renderable.render_layer);
            
            // Clean matrices come straight from the cache
            let world = TransformHierarchy::compute_world_matrix(scene, entity)?;
            self.items.push(RenderItem {
                entity,
                mesh,
                material,
                render_layer,
                world,
            });
        }
        
        self.items.sort_by_key(|item| (item.render_layer, item.entity));
        Ok(())
    }
}
