//! System trait and the system registry
//!
//! Each registered system has a required [`Signature`] and a working set of
//! entities. The registry keeps every working set equal to
//! `{ e : signature(e) ⊇ required }` by re-testing membership whenever an
//! entity's signature changes.
//!
//! Systems run in registration order. There is no dependency graph: register
//! producers (e.g. the transform system) before their consumers.

use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeSet, HashMap};

use log::{debug, trace};

use super::{EcsError, EcsResult, Entity, EntityRegistry, Signature};
use crate::scene::Scene;

/// System trait for processing entities and components
pub trait System: 'static {
    /// Run one frame over `entities`
    ///
    /// `entities` is a snapshot of the working set taken before the call.
    /// The system may add or remove components and destroy entities through
    /// `scene`; those changes update the live working set, not the snapshot,
    /// so later entries in `entities` may already be destroyed or may no longer
    /// match. Check before touching them.
    fn update(&mut self, scene: &mut Scene, entities: &[Entity], delta_time: f32) -> EcsResult<()>;
}

/// Object-safe wrapper adding downcasting to [`System`]
trait AnySystem {
    fn run(&mut self, scene: &mut Scene, entities: &[Entity], delta_time: f32) -> EcsResult<()>;
    
    fn as_any(&self) -> &dyn Any;
    
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<S: System> AnySystem for S {
    fn run(&mut self, scene: &mut Scene, entities: &[Entity], delta_time: f32) -> EcsResult<()> {
        self.update(scene, entities, delta_time)
    }
    
    fn as_any(&self) -> &dyn Any {
        self
    }
    
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct SystemEntry {
    name: &'static str,
    // `None` while the system is running
    system: Option<Box<dyn AnySystem>>,
    signature: Signature,
    entities: BTreeSet<Entity>,
    // reused snapshot buffer
    scratch: Vec<Entity>,
}

/// A system taken out of the registry for the duration of its update
pub(crate) struct RunningSystem {
    index: usize,
    system: Box<dyn AnySystem>,
    entities: Vec<Entity>,
}

impl RunningSystem {
    pub(crate) fn run(&mut self, scene: &mut Scene, delta_time: f32) -> EcsResult<()> {
        self.system.run(scene, &self.entities, delta_time)
    }
}

/// Owns system instances, their required signatures and their working sets
#[derive(Default)]
pub struct SystemRegistry {
    entries: Vec<SystemEntry>,
    index: HashMap<TypeId, usize>,
}

impl SystemRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Register a system instance; it starts with the empty signature and an
    /// empty working set
    pub fn register<S: System>(&mut self, system: S) -> EcsResult<()> {
        let key = TypeId::of::<S>();
        if self.index.contains_key(&key) {
            return Err(EcsError::SystemAlreadyRegistered(type_name::<S>()));
        }
        
        self.index.insert(key, self.entries.len());
        self.entries.push(SystemEntry {
            name: type_name::<S>(),
            system: Some(Box::new(system)),
            signature: Signature::EMPTY,
            entities: BTreeSet::new(),
            scratch: Vec::new(),
        });
        debug!("SystemRegistry: registered {} at position {}", type_name::<S>(), self.entries.len() - 1);
        Ok(())
    }
    
    /// Set the signature `S` requires and rebuild its working set from the
    /// live entities in `entities`
    pub fn set_required_signature<S: System>(&mut self, signature: Signature, entities: &EntityRegistry) -> EcsResult<()> {
        let entry = self.entry_mut::<S>()?;
        entry.signature = signature;
        entry.entities = entities.entities_with_signature(signature).collect();
        debug!(
            "SystemRegistry: {} requires {:#x}, {} entities match",
            entry.name,
            signature.bits(),
            entry.entities.len()
        );
        Ok(())
    }
    
    /// Re-test `entity` against every system after its signature changed
    ///
    /// Inserting an existing member or erasing a non-member is a no-op.
    pub fn notify_signature_changed(&mut self, entity: Entity, signature: Signature) {
        for entry in &mut self.entries {
            if signature.matches(entry.signature) {
                if entry.entities.insert(entity) {
                    trace!("SystemRegistry: {} joined {}", entity, entry.name);
                }
            } else if entry.entities.remove(&entity) {
                trace!("SystemRegistry: {} left {}", entity, entry.name);
            }
        }
    }
    
    /// Drop `entity` from every working set
    pub fn remove_entity(&mut self, entity: Entity) {
        for entry in &mut self.entries {
            entry.entities.remove(&entity);
        }
    }
    
    /// Working set of `S`
    pub fn entities<S: System>(&self) -> EcsResult<&BTreeSet<Entity>> {
        Ok(&self.entry::<S>()?.entities)
    }
    
    /// Required signature of `S`
    pub fn signature<S: System>(&self) -> EcsResult<Signature> {
        Ok(self.entry::<S>()?.signature)
    }
    
    /// Borrow the registered instance of `S`
    ///
    /// Fails with `UnknownSystem` while `S` itself is running.
    pub fn system<S: System>(&self) -> EcsResult<&S> {
        self.entry::<S>()?
            .system
            .as_ref()
            .and_then(|system| system.as_any().downcast_ref::<S>())
            .ok_or(EcsError::UnknownSystem(type_name::<S>()))
    }
    
    /// Mutably borrow the registered instance of `S`
    pub fn system_mut<S: System>(&mut self) -> EcsResult<&mut S> {
        self.entry_mut::<S>()?
            .system
            .as_mut()
            .and_then(|system| system.as_any_mut().downcast_mut::<S>())
            .ok_or(EcsError::UnknownSystem(type_name::<S>()))
    }
    
    /// Names of registered systems in execution order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }
    
    /// Number of registered systems
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    
    /// Whether no system is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    
    /// Take the system at `index` out together with a snapshot of its working set
    ///
    /// Returns `None` if the slot is already running (re-entrant update).
    pub(crate) fn begin_update(&mut self, index: usize) -> Option<RunningSystem> {
        let entry = self.entries.get_mut(index)?;
        let system = entry.system.take()?;
        
        let mut entities = std::mem::take(&mut entry.scratch);
        entities.clear();
        entities.extend(entry.entities.iter().copied());
        
        Some(RunningSystem { index, system, entities })
    }
    
    /// Put a system taken by [`Self::begin_update`] back into its slot
    pub(crate) fn end_update(&mut self, running: RunningSystem) {
        let entry = &mut self.entries[running.index];
        entry.system = Some(running.system);
        entry.scratch = running.entities;
    }
    
    fn entry<S: System>(&self) -> EcsResult<&SystemEntry> {
        self.index
            .get(&TypeId::of::<S>())
            .map(|&index| &self.entries[index])
            .ok_or(EcsError::UnknownSystem(type_name::<S>()))
    }
    
    fn entry_mut<S: System>(&mut self) -> EcsResult<&mut SystemEntry> {
        match self.index.get(&TypeId::of::<S>()) {
            Some(&index) => Ok(&mut self.entries[index]),
            None => Err(EcsError::UnknownSystem(type_name::<S>())),
        }
    }
}

impl std::fmt::Debug for SystemRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|entry| (entry.name, entry.entities.len())))
            .finish()
    }
}
