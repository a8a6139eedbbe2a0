//! Transform system
//!
//! Refreshes the cached world matrix of every entity carrying a
//! `TransformComponent`, attaching the `LocalToWorld` cache on first sight.
//! Register it before any system that reads world matrices.

use crate::ecs::components::LocalToWorld;
use crate::ecs::{EcsResult, Entity, System};
use crate::scene::{Scene, TransformHierarchy};

/// System that recomputes dirty world matrices once per frame
#[derive(Debug, Default)]
pub struct TransformSystem {
    recomputed_last_frame: usize,
}

impl TransformSystem {
    /// Create a new transform system
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Number of matrices that were stale or missing during the last update
    pub fn recomputed_last_frame(&self) -> usize {
        self.recomputed_last_frame
    }
}

impl System for TransformSystem {
    fn update(&mut self, scene: &mut Scene, entities: &[Entity], _delta_time: f32) -> EcsResult<()> {
        self.recomputed_last_frame = 0;
        
        for &entity in entities {
            // an earlier entity in this frame may have destroyed this one
            if !scene.entities().is_alive(entity) {
                continue;
            }
            let clean = matches!(scene.get_component::<LocalToWorld>(entity), Ok(cache) if !cache.dirty);
            if !clean {
                TransformHierarchy::compute_world_matrix(scene, entity)?;
                self.recomputed_last_frame += 1;
            }
        }
        Ok(())
    }
}
