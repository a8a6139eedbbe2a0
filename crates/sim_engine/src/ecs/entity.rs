//! Entity identifiers and the entity registry
//!
//! Identifiers are small positive integers recycled through a FIFO free list.
//! `0` is reserved as the null sentinel ([`Entity::NULL`]).

use std::collections::VecDeque;
use std::fmt;

use log::{debug, warn};

use super::{EcsError, EcsResult, Signature};

/// Entity identifier
///
/// Unique among live entities only; a destroyed identifier is handed out again
/// by a later create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    id: u32,
}

impl Entity {
    /// The "no entity" sentinel
    pub const NULL: Self = Self { id: 0 };
    
    /// Wrap a raw identifier, e.g. one read back from a scene file
    pub const fn from_raw(id: u32) -> Self {
        Self { id }
    }
    
    /// Get the entity ID
    pub const fn id(&self) -> u32 {
        self.id
    }
    
    /// Whether this is the null sentinel
    pub const fn is_null(&self) -> bool {
        self.id == 0
    }
    
    pub(crate) const fn index(self) -> usize {
        self.id as usize
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Entity(null)")
        } else {
            write!(f, "Entity({})", self.id)
        }
    }
}

/// Per-identifier bookkeeping, indexed by entity id
#[derive(Debug, Clone, Default)]
struct Slot {
    alive: bool,
    signature: Signature,
    name: String,
}

/// Allocates and recycles entity identifiers and stores each live entity's
/// signature and display name
#[derive(Debug)]
pub struct EntityRegistry {
    capacity: usize,
    free: VecDeque<Entity>,
    // slot 0 belongs to the null sentinel and is never live
    slots: Vec<Slot>,
    // live entities in creation order
    live: Vec<Entity>,
}

impl EntityRegistry {
    /// Create a registry able to hold `capacity` simultaneously live entities
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.min(u32::MAX as usize);
        let free = (1..=capacity)
            .map(|id| Entity::from_raw(id as u32))
            .collect();
        
        Self {
            capacity,
            free,
            slots: vec![Slot::default(); capacity + 1],
            live: Vec::new(),
        }
    }
    
    /// Create an entity with the next free identifier
    pub fn create(&mut self, name: impl Into<String>) -> EcsResult<Entity> {
        let Some(entity) = self.free.pop_front() else {
            warn!("EntityRegistry: capacity of {} entities exhausted", self.capacity);
            return Err(EcsError::CapacityExceeded { capacity: self.capacity });
        };
        
        self.activate(entity, name.into());
        Ok(entity)
    }
    
    /// Create an entity with a caller-chosen identifier
    ///
    /// Used when a scene is reloaded and entities must keep their on-disk ids.
    pub fn create_with_id(&mut self, entity: Entity, name: impl Into<String>) -> EcsResult<Entity> {
        if entity.is_null() || entity.index() > self.capacity {
            return Err(EcsError::InvalidEntity(entity));
        }
        if self.is_alive(entity) {
            return Err(EcsError::EntityIdInUse(entity));
        }
        
        if let Some(position) = self.free.iter().position(|&free| free == entity) {
            self.free.remove(position);
        }
        self.activate(entity, name.into());
        Ok(entity)
    }
    
    /// Release an entity's identifier
    ///
    /// Only clears registry state. Component data and system membership must be
    /// removed first; [`crate::scene::Scene::destroy_entity`] does all three.
    pub fn destroy(&mut self, entity: Entity) -> EcsResult<()> {
        let index = self.live_index(entity)?;
        
        self.slots[index] = Slot::default();
        self.live.retain(|&live| live != entity);
        self.free.push_back(entity);
        
        debug!("EntityRegistry: destroyed {}", entity);
        Ok(())
    }
    
    /// Current signature of a live entity
    pub fn signature(&self, entity: Entity) -> EcsResult<Signature> {
        let index = self.live_index(entity)?;
        Ok(self.slots[index].signature)
    }
    
    /// Overwrite the signature of a live entity
    pub fn set_signature(&mut self, entity: Entity, signature: Signature) -> EcsResult<()> {
        let index = self.live_index(entity)?;
        self.slots[index].signature = signature;
        Ok(())
    }
    
    /// Display name of a live entity
    pub fn name(&self, entity: Entity) -> EcsResult<&str> {
        let index = self.live_index(entity)?;
        Ok(&self.slots[index].name)
    }
    
    /// Change the display name of a live entity
    pub fn rename(&mut self, entity: Entity, name: impl Into<String>) -> EcsResult<()> {
        let index = self.live_index(entity)?;
        self.slots[index].name = name.into();
        Ok(())
    }
    
    /// Live entities with their names, in creation order
    pub fn all_live(&self) -> impl Iterator<Item = (Entity, &str)> + '_ {
        self.live
            .iter()
            .map(move |&entity| (entity, self.slots[entity.index()].name.as_str()))
    }
    
    /// Whether `entity` is currently live
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.slots
            .get(entity.index())
            .is_some_and(|slot| slot.alive)
    }
    
    /// Number of live entities
    pub fn len(&self) -> usize {
        self.live.len()
    }
    
    /// Whether no entity is live
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
    
    /// Maximum number of simultaneously live entities
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    
    /// Number of identifier slots, including the null slot
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }
    
    /// Signature stored at `index` if that identifier is live
    pub(crate) fn live_signature_at(&self, index: usize) -> Option<Signature> {
        self.slots
            .get(index)
            .filter(|slot| slot.alive)
            .map(|slot| slot.signature)
    }
    
    /// Validate `entity` and return its slot index
    pub(crate) fn live_index(&self, entity: Entity) -> EcsResult<usize> {
        if entity.is_null() {
            return Err(EcsError::InvalidEntity(entity));
        }
        if self.is_alive(entity) {
            Ok(entity.index())
        } else {
            Err(EcsError::UnknownEntity(entity))
        }
    }
    
    fn activate(&mut self, entity: Entity, name: String) {
        self.slots[entity.index()] = Slot {
            alive: true,
            signature: Signature::EMPTY,
            name,
        };
        self.live.push(entity);
        debug!("EntityRegistry: created {} '{}'", entity, self.slots[entity.index()].name);
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new(crate::scene::DEFAULT_MAX_ENTITIES)
    }
}
