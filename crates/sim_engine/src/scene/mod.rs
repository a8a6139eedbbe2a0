//! Scene management
//!
//! A [`Scene`] is the ownership boundary of the ECS core: it owns exactly one
//! [`EntityRegistry`], one [`ComponentCatalog`] and one [`SystemRegistry`], and
//! drops them together. Structural changes go through the scene so that the
//! entity signature and every system working set are updated in the same call.
//!
//! ## Architecture
//!
//! ```text
//! Editor / Game code / Scene loader
//!      ↓
//! Scene (atomic create / destroy / add / remove)
//!      ↓
//! ComponentCatalog → EntityRegistry (signature) → SystemRegistry (membership)
//! ```

mod hierarchy;

pub use hierarchy::TransformHierarchy;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::ecs::components::{register_engine_components, ParentComponent, TransformComponent};
use crate::ecs::{
    Component, ComponentCatalog, ComponentTypeId, EcsResult, Entity, EntityRegistry, Signature,
    SignatureQuery, System, SystemRegistry,
};

/// Default entity pool size
pub const DEFAULT_MAX_ENTITIES: usize = 10_000;

/// Configuration for a scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Scene name used in logs and editor titles
    pub name: String,
    
    /// Maximum number of simultaneously live entities
    pub max_entities: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            name: "Untitled".to_string(),
            max_entities: DEFAULT_MAX_ENTITIES,
        }
    }
}

impl Config for SceneConfig {}

/// Entities, components and systems that live and die together
#[derive(Debug)]
pub struct Scene {
    name: String,
    entities: EntityRegistry,
    components: ComponentCatalog,
    systems: SystemRegistry,
}

impl Scene {
    /// Create an empty scene with no component types registered
    pub fn new(config: SceneConfig) -> Self {
        info!("Scene '{}': created with capacity {}", config.name, config.max_entities);
        Self {
            name: config.name,
            entities: EntityRegistry::new(config.max_entities),
            components: ComponentCatalog::new(),
            systems: SystemRegistry::new(),
        }
    }
    
    /// Create a scene with the engine components already registered
    pub fn with_engine_components(config: SceneConfig) -> EcsResult<Self> {
        let mut scene = Self::new(config);
        register_engine_components(&mut scene.components)?;
        Ok(scene)
    }
    
    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }
    
    /// Read-only access to the entity registry
    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }
    
    /// Read-only access to the component catalog
    pub fn components(&self) -> &ComponentCatalog {
        &self.components
    }
    
    /// Read-only access to the system registry
    pub fn systems(&self) -> &SystemRegistry {
        &self.systems
    }
    
    /// Mutable access to registered system instances
    ///
    /// Membership is still maintained by the scene; this is for tweaking system
    /// state between frames.
    pub fn systems_mut(&mut self) -> &mut SystemRegistry {
        &mut self.systems
    }
    
    // ------------------------------------------------------------------
    // Entities
    // ------------------------------------------------------------------
    
    /// Create an entity with the next free identifier
    pub fn create_entity(&mut self, name: impl Into<String>) -> EcsResult<Entity> {
        let entity = self.entities.create(name)?;
        self.sync_membership(entity)?;
        Ok(entity)
    }
    
    /// Recreate an entity under its persisted identifier
    pub fn create_entity_with_id(&mut self, entity: Entity, name: impl Into<String>) -> EcsResult<Entity> {
        let entity = self.entities.create_with_id(entity, name)?;
        self.sync_membership(entity)?;
        Ok(entity)
    }
    
    /// Destroy an entity: unlink it from the hierarchy, drop its components,
    /// leave every working set, then release the identifier
    ///
    /// Children of `entity` become roots. Use
    /// [`TransformHierarchy::destroy_subtree`] to destroy them as well.
    pub fn destroy_entity(&mut self, entity: Entity) -> EcsResult<()> {
        self.entities.live_index(entity)?;
        TransformHierarchy::unlink(self, entity)?;
        
        let removed = self.components.remove_entity(entity)?;
        self.systems.remove_entity(entity);
        self.entities.destroy(entity)?;
        debug!("Scene '{}': destroyed {} with {} components", self.name, entity, removed);
        Ok(())
    }
    
    /// Change the display name of an entity
    pub fn rename_entity(&mut self, entity: Entity, name: impl Into<String>) -> EcsResult<()> {
        self.entities.rename(entity, name)
    }
    
    /// Live entities whose signature contains `query`, in id order
    pub fn entities_with_signature(&self, query: Signature) -> SignatureQuery<'_> {
        self.entities.entities_with_signature(query)
    }
    
    // ------------------------------------------------------------------
    // Components
    // ------------------------------------------------------------------
    
    /// Register a component type under an editor display name
    pub fn register_component<T: Component + Default>(&mut self, name: impl Into<String>) -> EcsResult<ComponentTypeId> {
        self.components.register_type::<T>(name)
    }
    
    /// Attach `value` to `entity` and update system membership
    pub fn add_component<T: Component>(&mut self, entity: Entity, value: T) -> EcsResult<&mut T> {
        self.components.add(&mut self.entities, entity, value)?;
        self.sync_membership(entity)?;
        let id = self.components.type_id_of::<T>()?;
        self.invalidate_world_matrix(id, entity)?;
        self.components.get_mut::<T>(entity)
    }
    
    /// Attach a default value of the type identified by `id`
    pub fn add_default_by_id(&mut self, id: ComponentTypeId, entity: Entity) -> EcsResult<()> {
        self.components.add_default_by_id(&mut self.entities, id, entity)?;
        self.sync_membership(entity)?;
        self.invalidate_world_matrix(id, entity)
    }
    
    /// Detach `T` from `entity` and update system membership; no-op if absent
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> EcsResult<Option<T>> {
        let removed = self.components.remove::<T>(&mut self.entities, entity)?;
        self.sync_membership(entity)?;
        if removed.is_some() {
            let id = self.components.type_id_of::<T>()?;
            self.invalidate_world_matrix(id, entity)?;
        }
        Ok(removed)
    }
    
    /// Detach the component identified by `id`; no-op if absent
    pub fn remove_component_by_id(&mut self, id: ComponentTypeId, entity: Entity) -> EcsResult<bool> {
        let removed = self.components.remove_by_id(&mut self.entities, id, entity)?;
        self.sync_membership(entity)?;
        if removed {
            self.invalidate_world_matrix(id, entity)?;
        }
        Ok(removed)
    }
    
    /// Borrow a component
    pub fn get_component<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        self.components.get::<T>(entity)
    }
    
    /// Mutably borrow a component
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.components.get_mut::<T>(entity)
    }
    
    /// Whether `entity` holds a `T`
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.components.has::<T>(entity)
    }
    
    // ------------------------------------------------------------------
    // Systems
    // ------------------------------------------------------------------
    
    /// Register a system and the signature it requires
    ///
    /// Entities that already match join the working set immediately.
    pub fn register_system<S: System>(&mut self, system: S, signature: Signature) -> EcsResult<()> {
        self.systems.register(system)?;
        self.systems.set_required_signature::<S>(signature, &self.entities)
    }
    
    /// Change the signature a registered system requires
    pub fn set_system_signature<S: System>(&mut self, signature: Signature) -> EcsResult<()> {
        self.systems.set_required_signature::<S>(signature, &self.entities)
    }
    
    /// Run every system once, in registration order
    ///
    /// Stops at the first system error and returns it.
    pub fn update_all(&mut self, delta_time: f32) -> EcsResult<()> {
        let mut index = 0;
        while index < self.systems.len() {
            if let Some(mut running) = self.systems.begin_update(index) {
                let result = running.run(self, delta_time);
                self.systems.end_update(running);
                result?;
            }
            index += 1;
        }
        Ok(())
    }
    
    fn sync_membership(&mut self, entity: Entity) -> EcsResult<()> {
        let signature = self.entities.signature(entity)?;
        self.systems.notify_signature_changed(entity, signature);
        Ok(())
    }
    
    // A local transform or parent link appearing or vanishing stales the subtree
    fn invalidate_world_matrix(&mut self, id: ComponentTypeId, entity: Entity) -> EcsResult<()> {
        let spatial = [
            self.components.type_id_of::<TransformComponent>(),
            self.components.type_id_of::<ParentComponent>(),
        ];
        if spatial.contains(&Ok(id)) {
            TransformHierarchy::mark_dirty(self, entity)?;
        }
        Ok(())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::TransformComponent;
    use crate::ecs::EcsError;
    
    #[test]
    fn test_scene_config_roundtrip_through_files() {
        let config = SceneConfig {
            name: "Level 1".to_string(),
            max_entities: 256,
        };
        let dir = std::env::temp_dir();
        
        for file in ["sim_engine_scene_test.toml", "sim_engine_scene_test.ron"] {
            let path = dir.join(file);
            config.save_to_file(&path).unwrap();
            let loaded = SceneConfig::load_from_file(&path).unwrap();
            std::fs::remove_file(&path).ok();
            assert_eq!(loaded, config);
        }
    }
    
    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SceneConfig = toml::from_str("name = \"Sandbox\"").unwrap();
        assert_eq!(config.name, "Sandbox");
        assert_eq!(config.max_entities, DEFAULT_MAX_ENTITIES);
    }
    
    #[test]
    fn test_capacity_comes_from_config() {
        let mut scene = Scene::new(SceneConfig {
            max_entities: 1,
            ..SceneConfig::default()
        });
        scene.create_entity("only").unwrap();
        assert_eq!(scene.create_entity("extra"), Err(EcsError::CapacityExceeded { capacity: 1 }));
    }
    
    #[test]
    fn test_add_returns_stored_value() {
        let mut scene = Scene::with_engine_components(SceneConfig::default()).unwrap();
        let entity = scene.create_entity("e").unwrap();
        
        let stored = scene.add_component(entity, TransformComponent::default()).unwrap();
        stored.scale.x = 3.0;
        assert!((scene.get_component::<TransformComponent>(entity).unwrap().scale.x - 3.0).abs() < f32::EPSILON);
    }
    
    #[test]
    fn test_destroy_unknown_entity_fails_loudly() {
        let mut scene = Scene::default();
        let entity = scene.create_entity("e").unwrap();
        scene.destroy_entity(entity).unwrap();
        
        assert_eq!(scene.destroy_entity(entity), Err(EcsError::UnknownEntity(entity)));
        assert_eq!(scene.destroy_entity(Entity::NULL), Err(EcsError::InvalidEntity(Entity::NULL)));
    }
}
