//! Component trait and the component catalog
//!
//! The catalog owns one [`ComponentStore`] per registered type and a
//! catalog-local type registry mapping Rust types to dense
//! [`ComponentTypeId`]s. Registration is explicit and permanent; two catalogs
//! never share an id space.

use std::any::{type_name, TypeId};
use std::collections::HashMap;

use log::{debug, trace};

use super::storage::{ComponentStore, ErasedStore};
use super::{ComponentTypeId, EcsError, EcsResult, Entity, EntityRegistry, Signature, MAX_COMPONENTS};

/// Marker trait for components
pub trait Component: 'static {}

struct ComponentInfo {
    name: String,
    type_name: &'static str,
    store: Box<dyn ErasedStore>,
}

/// Owns every component store of a scene and keeps entity signatures in step
/// with them
#[derive(Default)]
pub struct ComponentCatalog {
    type_ids: HashMap<TypeId, ComponentTypeId>,
    // indexed by ComponentTypeId
    infos: Vec<ComponentInfo>,
}

impl ComponentCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Register `T` under a display name and assign its type id
    ///
    /// Must be called once per type before any other use of `T`.
    pub fn register_type<T: Component + Default>(&mut self, name: impl Into<String>) -> EcsResult<ComponentTypeId> {
        let key = TypeId::of::<T>();
        if self.type_ids.contains_key(&key) {
            return Err(EcsError::ComponentAlreadyRegistered(type_name::<T>()));
        }
        if self.infos.len() >= MAX_COMPONENTS {
            return Err(EcsError::TooManyComponentTypes { max: MAX_COMPONENTS });
        }
        
        let id = ComponentTypeId::from_raw(self.infos.len() as u8);
        let name = name.into();
        debug!("ComponentCatalog: registered {} as '{}' ({})", type_name::<T>(), name, id);
        
        self.infos.push(ComponentInfo {
            name,
            type_name: type_name::<T>(),
            store: Box::new(ComponentStore::<T>::new()),
        });
        self.type_ids.insert(key, id);
        Ok(id)
    }
    
    /// Type id assigned to `T`
    pub fn type_id_of<T: Component>(&self) -> EcsResult<ComponentTypeId> {
        self.type_ids
            .get(&TypeId::of::<T>())
            .copied()
            .ok_or(EcsError::UnregisteredComponent(type_name::<T>()))
    }
    
    /// Single-bit signature for `T`
    pub fn signature_of<T: Component>(&self) -> EcsResult<Signature> {
        Ok(Signature::EMPTY.with(self.type_id_of::<T>()?))
    }
    
    /// Insert `value` for `entity` and set the matching signature bit
    ///
    /// Returns the stored value so callers can read back or tweak defaults.
    pub fn add<T: Component>(&mut self, entities: &mut EntityRegistry, entity: Entity, value: T) -> EcsResult<&mut T> {
        let mut signature = entities.signature(entity)?;
        let id = self.type_id_of::<T>()?;

        let stored = self.store_mut::<T>()?.insert(entity, value)?;
        signature.insert(id);
        entities.set_signature(entity, signature)?;
        trace!("ComponentCatalog: {} += {}", entity, type_name::<T>());
        Ok(stored)
    }
    
    /// Insert a default value of the type identified by `id`
    pub fn add_default_by_id(&mut self, entities: &mut EntityRegistry, id: ComponentTypeId, entity: Entity) -> EcsResult<()> {
        let mut signature = entities.signature(entity)?;
        let info = self
            .infos
            .get_mut(id.index())
            .ok_or(EcsError::UnknownComponentType(id))?;
        
        info.store.insert_default(entity)?;
        signature.insert(id);
        entities.set_signature(entity, signature)?;
        trace!("ComponentCatalog: {} += {} (by id)", entity, info.type_name);
        Ok(())
    }
    
    /// Remove `T` from `entity` and clear the signature bit
    ///
    /// Removing a component the entity does not hold is a no-op.
    pub fn remove<T: Component>(&mut self, entities: &mut EntityRegistry, entity: Entity) -> EcsResult<Option<T>> {
        let mut signature = entities.signature(entity)?;
        let id = self.type_id_of::<T>()?;
        
        let removed = self.store_mut::<T>()?.remove(entity)?;
        signature.remove(id);
        entities.set_signature(entity, signature)?;
        if removed.is_some() {
            trace!("ComponentCatalog: {} -= {}", entity, type_name::<T>());
        }
        Ok(removed)
    }
    
    /// Remove the component identified by `id` from `entity`
    ///
    /// Returns whether a component was removed.
    pub fn remove_by_id(&mut self, entities: &mut EntityRegistry, id: ComponentTypeId, entity: Entity) -> EcsResult<bool> {
        let mut signature = entities.signature(entity)?;
        let info = self
            .infos
            .get_mut(id.index())
            .ok_or(EcsError::UnknownComponentType(id))?;
        
        let removed = info.store.remove_entity(entity)?;
        signature.remove(id);
        entities.set_signature(entity, signature)?;
        Ok(removed)
    }
    
    /// Borrow the `T` component of `entity`
    pub fn get<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        self.store::<T>()?.get(entity)
    }
    
    /// Mutably borrow the `T` component of `entity`
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.store_mut::<T>()?.get_mut(entity)
    }
    
    /// Whether `entity` holds a `T`; false for unregistered types
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.store::<T>().is_ok_and(|store| store.has(entity))
    }
    
    /// Whether `entity` holds the component identified by `id`
    pub fn has_id(&self, id: ComponentTypeId, entity: Entity) -> bool {
        self.infos
            .get(id.index())
            .is_some_and(|info| info.store.has(entity))
    }
    
    /// Type ids of every component `entity` currently holds, ascending
    pub fn entity_components(&self, entity: Entity) -> Vec<ComponentTypeId> {
        self.infos
            .iter()
            .enumerate()
            .filter(|(_, info)| info.store.has(entity))
            .map(|(index, _)| ComponentTypeId::from_raw(index as u8))
            .collect()
    }
    
    /// Drop every component of `entity`
    ///
    /// Component-layer half of entity destruction. The caller clears the
    /// signature. Returns the number of components removed.
    pub fn remove_entity(&mut self, entity: Entity) -> EcsResult<usize> {
        let mut removed = 0;
        for info in &mut self.infos {
            if info.store.remove_entity(entity)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
    
    /// Display name given at registration
    pub fn component_name(&self, id: ComponentTypeId) -> EcsResult<&str> {
        self.infos
            .get(id.index())
            .map(|info| info.name.as_str())
            .ok_or(EcsError::UnknownComponentType(id))
    }
    
    /// Registered types with their display names, in registration order
    pub fn registered_components(&self) -> impl Iterator<Item = (ComponentTypeId, &str)> + '_ {
        self.infos
            .iter()
            .enumerate()
            .map(|(index, info)| (ComponentTypeId::from_raw(index as u8), info.name.as_str()))
    }
    
    /// Number of registered component types
    pub fn type_count(&self) -> usize {
        self.infos.len()
    }
    
    /// Number of entities holding the component identified by `id`
    pub fn count_by_id(&self, id: ComponentTypeId) -> EcsResult<usize> {
        self.infos
            .get(id.index())
            .map(|info| info.store.len())
            .ok_or(EcsError::UnknownComponentType(id))
    }
    
    /// Typed access to the store backing `T`
    pub fn store<T: Component>(&self) -> EcsResult<&ComponentStore<T>> {
        let id = self.type_id_of::<T>()?;
        self.infos[id.index()]
            .store
            .as_any()
            .downcast_ref::<ComponentStore<T>>()
            .ok_or(EcsError::UnregisteredComponent(type_name::<T>()))
    }
    
    /// Mutable typed access to the store backing `T`
    pub fn store_mut<T: Component>(&mut self) -> EcsResult<&mut ComponentStore<T>> {
        let id = self.type_id_of::<T>()?;
        self.infos[id.index()]
            .store
            .as_any_mut()
            .downcast_mut::<ComponentStore<T>>()
            .ok_or(EcsError::UnregisteredComponent(type_name::<T>()))
    }
}

impl std::fmt::Debug for ComponentCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.infos.iter().map(|info| (&info.name, info.store.len())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Position(f32, f32);
    impl Component for Position {}
    
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Velocity(f32, f32);
    impl Component for Velocity {}
    
    #[derive(Debug, Default)]
    struct NeverRegistered;
    impl Component for NeverRegistered {}
    
    fn setup() -> (EntityRegistry, ComponentCatalog, ComponentTypeId, ComponentTypeId) {
        let mut catalog = ComponentCatalog::new();
        let position = catalog.register_type::<Position>("Position").unwrap();
        let velocity = catalog.register_type::<Velocity>("Velocity").unwrap();
        (EntityRegistry::new(32), catalog, position, velocity)
    }
    
    #[test]
    fn test_type_ids_are_dense_and_catalog_local() {
        let (_, catalog, position, velocity) = setup();
        assert_eq!(position.raw(), 0);
        assert_eq!(velocity.raw(), 1);
        
        let mut other = ComponentCatalog::new();
        assert_eq!(other.register_type::<Velocity>("Velocity").unwrap().raw(), 0);
        assert_eq!(catalog.type_id_of::<Velocity>().unwrap(), velocity);
    }
    
    #[test]
    fn test_double_registration_fails() {
        let (_, mut catalog, _, _) = setup();
        assert!(matches!(
            catalog.register_type::<Position>("Again"),
            Err(EcsError::ComponentAlreadyRegistered(_))
        ));
    }
    
    #[test]
    fn test_add_sets_signature_bit() {
        let (mut entities, mut catalog, position, velocity) = setup();
        let entity = entities.create("mover").unwrap();
        
        let stored = catalog.add(&mut entities, entity, Position(1.0, 2.0)).unwrap();
        assert_eq!(stored, &Position(1.0, 2.0));
        
        assert!(catalog.has::<Position>(entity));
        assert!(catalog.has_id(position, entity));
        assert!(!catalog.has_id(velocity, entity));
        assert_eq!(entities.signature(entity).unwrap(), Signature::EMPTY.with(position));
    }
    
    #[test]
    fn test_duplicate_add_keeps_original() {
        let (mut entities, mut catalog, _, _) = setup();
        let entity = entities.create("dup").unwrap();
        catalog.add(&mut entities, entity, Position(1.0, 1.0)).unwrap();
        
        assert!(matches!(
            catalog.add(&mut entities, entity, Position(9.0, 9.0)),
            Err(EcsError::DuplicateComponent { .. })
        ));
        assert_eq!(catalog.get::<Position>(entity).unwrap(), &Position(1.0, 1.0));
    }
    
    #[test]
    fn test_remove_clears_bit_and_is_idempotent() {
        let (mut entities, mut catalog, _, velocity) = setup();
        let entity = entities.create("e").unwrap();
        catalog.add(&mut entities, entity, Position(0.0, 0.0)).unwrap();
        catalog.add(&mut entities, entity, Velocity(1.0, 0.0)).unwrap();
        
        assert_eq!(catalog.remove::<Position>(&mut entities, entity).unwrap(), Some(Position(0.0, 0.0)));
        assert!(!catalog.has::<Position>(entity));
        assert_eq!(catalog.remove::<Position>(&mut entities, entity).unwrap(), None);
        assert_eq!(entities.signature(entity).unwrap(), Signature::EMPTY.with(velocity));
    }
    
    #[test]
    fn test_add_default_by_id() {
        let (mut entities, mut catalog, _, velocity) = setup();
        let entity = entities.create("e").unwrap();
        
        catalog.add_default_by_id(&mut entities, velocity, entity).unwrap();
        assert_eq!(catalog.get::<Velocity>(entity).unwrap(), &Velocity::default());
        assert!(entities.signature(entity).unwrap().contains(velocity));
        
        let unknown = ComponentTypeId::from_raw(40);
        assert_eq!(
            catalog.add_default_by_id(&mut entities, unknown, entity),
            Err(EcsError::UnknownComponentType(unknown))
        );
    }
    
    #[test]
    fn test_unregistered_type_access() {
        let (mut entities, mut catalog, _, _) = setup();
        let entity = entities.create("e").unwrap();
        
        assert!(!catalog.has::<NeverRegistered>(entity));
        assert!(matches!(
            catalog.add(&mut entities, entity, NeverRegistered),
            Err(EcsError::UnregisteredComponent(_))
        ));
        assert!(entities.signature(entity).unwrap().is_empty());
    }
    
    #[test]
    fn test_entity_components_and_names() {
        let (mut entities, mut catalog, position, velocity) = setup();
        let entity = entities.create("e").unwrap();
        catalog.add(&mut entities, entity, Velocity(0.0, 1.0)).unwrap();
        catalog.add(&mut entities, entity, Position(0.0, 0.0)).unwrap();
        
        assert_eq!(catalog.entity_components(entity), vec![position, velocity]);
        assert_eq!(catalog.component_name(velocity).unwrap(), "Velocity");
        assert_eq!(
            catalog.registered_components().collect::<Vec<_>>(),
            vec![(position, "Position"), (velocity, "Velocity")]
        );
    }
    
    #[test]
    fn test_remove_entity_clears_every_store() {
        let (mut entities, mut catalog, position, velocity) = setup();
        let a = entities.create("a").unwrap();
        let b = entities.create("b").unwrap();
        catalog.add(&mut entities, a, Position(0.0, 0.0)).unwrap();
        catalog.add(&mut entities, a, Velocity(0.0, 0.0)).unwrap();
        catalog.add(&mut entities, b, Position(5.0, 5.0)).unwrap();
        
        assert_eq!(catalog.remove_entity(a).unwrap(), 2);
        assert!(catalog.entity_components(a).is_empty());
        assert_eq!(catalog.count_by_id(position).unwrap(), 1);
        assert_eq!(catalog.count_by_id(velocity).unwrap(), 0);
        assert_eq!(catalog.get::<Position>(b).unwrap(), &Position(5.0, 5.0));
    }
}
