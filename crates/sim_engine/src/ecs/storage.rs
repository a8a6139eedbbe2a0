//! Sparse-set component storage
//!
//! Each [`ComponentStore`] keeps its values packed in a dense array with two
//! index maps beside it: entity to slot and slot to entity. The three are
//! always mutated together, so the dense array never has gaps.

use std::any::{type_name, Any};

use super::{Component, EcsError, EcsResult, Entity};

/// Dense storage of one component type for a subset of entities
#[derive(Debug)]
pub struct ComponentStore<T> {
    dense: Vec<T>,
    // slot -> owning entity
    entities: Vec<Entity>,
    // entity id -> slot
    sparse: Vec<Option<usize>>,
}

impl<T: Component> ComponentStore<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            entities: Vec::new(),
            sparse: Vec::new(),
        }
    }
    
    /// Append `value` for `entity`
    ///
    /// A second insert for the same entity is rejected rather than overwriting.
    pub fn insert(&mut self, entity: Entity, value: T) -> EcsResult<&mut T> {
        if entity.is_null() {
            return Err(EcsError::InvalidEntity(entity));
        }
        if self.has(entity) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: type_name::<T>(),
            });
        }
        
        let index = entity.index();
        if index >= self.sparse.len() {
            self.sparse.resize(index + 1, None);
        }
        
        let slot = self.dense.len();
        self.dense.push(value);
        self.entities.push(entity);
        self.sparse[index] = Some(slot);
        
        Ok(&mut self.dense[slot])
    }
    
    /// Borrow the component of `entity`
    pub fn get(&self, entity: Entity) -> EcsResult<&T> {
        self.slot(entity)
            .map(|slot| &self.dense[slot])
            .ok_or_else(|| Self::not_found(entity))
    }
    
    /// Mutably borrow the component of `entity`
    pub fn get_mut(&mut self, entity: Entity) -> EcsResult<&mut T> {
        match self.slot(entity) {
            Some(slot) => Ok(&mut self.dense[slot]),
            None => Err(Self::not_found(entity)),
        }
    }
    
    /// Whether `entity` holds a component in this store
    pub fn has(&self, entity: Entity) -> bool {
        self.slot(entity).is_some()
    }
    
    /// Remove the component of `entity` by swapping the last element into its slot
    ///
    /// Removing an absent component is a no-op returning `None`.
    pub fn remove(&mut self, entity: Entity) -> EcsResult<Option<T>> {
        if entity.is_null() {
            return Err(EcsError::InvalidEntity(entity));
        }
        let Some(slot) = self.slot(entity) else {
            return Ok(None);
        };
        
        let value = self.dense.swap_remove(slot);
        self.entities.swap_remove(slot);
        self.sparse[entity.index()] = None;
        
        // The former last element now lives in `slot`
        if let Some(&moved) = self.entities.get(slot) {
            self.sparse[moved.index()] = Some(slot);
        }
        
        Ok(Some(value))
    }
    
    /// Number of entities holding this component
    pub fn len(&self) -> usize {
        self.dense.len()
    }
    
    /// Whether no entity holds this component
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }
    
    /// Owning entities in dense order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
    
    /// Component values in dense order
    pub fn values(&self) -> &[T] {
        &self.dense
    }
    
    /// Iterate over `(entity, component)` pairs in dense order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.dense.iter())
    }
    
    /// Iterate mutably over `(entity, component)` pairs in dense order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(self.dense.iter_mut())
    }
    
    fn slot(&self, entity: Entity) -> Option<usize> {
        self.sparse.get(entity.index()).copied().flatten()
    }
    
    fn not_found(entity: Entity) -> EcsError {
        EcsError::ComponentNotFound {
            entity,
            component: type_name::<T>(),
        }
    }
}

impl<T: Component + Default> ComponentStore<T> {
    /// Insert a default-constructed value for `entity`
    pub fn insert_default(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.insert(entity, T::default())
    }
}

impl<T: Component> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a store, used by the catalog for dynamic dispatch by
/// component type id
pub(crate) trait ErasedStore {
    fn has(&self, entity: Entity) -> bool;
    
    fn insert_default(&mut self, entity: Entity) -> EcsResult<()>;
    
    /// Returns whether a component was removed
    fn remove_entity(&mut self, entity: Entity) -> EcsResult<bool>;
    
    fn len(&self) -> usize;
    
    fn as_any(&self) -> &dyn Any;
    
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component + Default> ErasedStore for ComponentStore<T> {
    fn has(&self, entity: Entity) -> bool {
        ComponentStore::has(self, entity)
    }
    
    fn insert_default(&mut self, entity: Entity) -> EcsResult<()> {
        ComponentStore::insert_default(self, entity).map(|_| ())
    }
    
    fn remove_entity(&mut self, entity: Entity) -> EcsResult<bool> {
        self.remove(entity).map(|removed| removed.is_some())
    }
    
    fn len(&self) -> usize {
        ComponentStore::len(self)
    }
    
    fn as_any(&self) -> &dyn Any {
        self
    }
    
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeMap;
    
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Health(i32);
    
    impl Component for Health {}
    
    fn e(id: u32) -> Entity {
        Entity::from_raw(id)
    }
    
    #[test]
    fn test_insert_then_get() {
        let mut store = ComponentStore::new();
        store.insert(e(3), Health(30)).unwrap();
        
        assert!(store.has(e(3)));
        assert_eq!(store.get(e(3)).unwrap(), &Health(30));
        assert_eq!(store.len(), 1);
    }
    
    #[test]
    fn test_duplicate_insert_is_rejected() {
        let mut store = ComponentStore::new();
        store.insert(e(1), Health(1)).unwrap();
        
        let err = store.insert(e(1), Health(2)).unwrap_err();
        assert!(matches!(err, EcsError::DuplicateComponent { entity, .. } if entity == e(1)));
        assert_eq!(store.get(e(1)).unwrap(), &Health(1));
    }
    
    #[test]
    fn test_get_missing_component() {
        let store: ComponentStore<Health> = ComponentStore::new();
        assert!(matches!(
            store.get(e(9)),
            Err(EcsError::ComponentNotFound { entity, .. }) if entity == e(9)
        ));
    }
    
    #[test]
    fn test_swap_remove_keeps_indices_consistent() {
        let mut store = ComponentStore::new();
        for id in 1..=4 {
            store.insert(e(id), Health(id as i32 * 10)).unwrap();
        }
        
        assert_eq!(store.remove(e(2)).unwrap(), Some(Health(20)));
        
        // Entity 4 was the last element and moved into entity 2's slot
        assert_eq!(store.entities(), &[e(1), e(4), e(3)]);
        assert_eq!(store.get(e(4)).unwrap(), &Health(40));
        assert_eq!(store.get(e(3)).unwrap(), &Health(30));
        assert!(!store.has(e(2)));
    }
    
    #[test]
    fn test_remove_is_idempotent() {
        let mut store = ComponentStore::new();
        store.insert(e(5), Health(5)).unwrap();
        
        assert_eq!(store.remove(e(5)).unwrap(), Some(Health(5)));
        assert_eq!(store.remove(e(5)).unwrap(), None);
        assert_eq!(store.remove(e(42)).unwrap(), None);
        assert!(store.is_empty());
    }
    
    #[test]
    fn test_null_entity_is_invalid() {
        let mut store: ComponentStore<Health> = ComponentStore::new();
        assert_eq!(store.remove(Entity::NULL), Err(EcsError::InvalidEntity(Entity::NULL)));
        assert!(matches!(store.insert(Entity::NULL, Health(0)), Err(EcsError::InvalidEntity(_))));
    }
    
    #[test]
    fn test_insert_default() {
        let mut store: ComponentStore<Health> = ComponentStore::new();
        store.insert_default(e(2)).unwrap().0 = 7;
        assert_eq!(store.get(e(2)).unwrap(), &Health(7));
    }
    
    #[test]
    fn test_compaction_under_random_interleaving() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut store = ComponentStore::new();
        let mut expected: BTreeMap<Entity, Health> = BTreeMap::new();
        
        for _ in 0..2_000 {
            let entity = e(rng.gen_range(1..=64));
            if rng.gen_bool(0.6) {
                let value = Health(rng.gen_range(0..1_000));
                if !expected.contains_key(&entity) {
                    store.insert(entity, value.clone()).unwrap();
                    expected.insert(entity, value);
                }
            } else {
                assert_eq!(store.remove(entity).unwrap(), expected.remove(&entity));
            }
            
            assert_eq!(store.len(), expected.len());
        }
        
        let mut held: Vec<(Entity, Health)> = store
            .iter()
            .map(|(entity, health)| (entity, health.clone()))
            .collect();
        held.sort_by_key(|(entity, _)| *entity);
        assert_eq!(held, expected.into_iter().collect::<Vec<_>>());
    }
}
