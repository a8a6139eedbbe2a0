//! ECS error taxonomy
//!
//! Every variant is a local invariant violation. Callers get them immediately
//! instead of a reference to stale data; idempotent cleanup paths never
//! produce them.

use thiserror::Error;

use super::{ComponentTypeId, Entity};

/// Result alias used across the ECS core
pub type EcsResult<T> = Result<T, EcsError>;

/// Errors raised by the entity registry, component catalog, system registry
/// and transform hierarchy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// Entity pool exhausted
    #[error("Entity capacity exceeded: all {capacity} identifiers are live")]
    CapacityExceeded {
        /// Maximum number of simultaneously live entities
        capacity: usize,
    },
    
    /// Operation on an entity that is not currently live
    #[error("Unknown entity: {0}")]
    UnknownEntity(Entity),
    
    /// Operation on the null sentinel or an identifier outside the pool
    #[error("Invalid entity: {0}")]
    InvalidEntity(Entity),
    
    /// Typed access to a component the entity does not carry
    #[error("Component {component} not found on {entity}")]
    ComponentNotFound {
        /// Entity that was queried
        entity: Entity,
        /// Rust type name of the component
        component: &'static str,
    },
    
    /// Insert of a component the entity already carries
    #[error("Duplicate component {component} on {entity}")]
    DuplicateComponent {
        /// Entity that already holds the component
        entity: Entity,
        /// Rust type name of the component
        component: &'static str,
    },
    
    /// Dynamic access with a type identifier that was never registered
    #[error("Unknown component type: {0}")]
    UnknownComponentType(ComponentTypeId),
    
    /// Typed access to a component type that was never registered
    #[error("Component type not registered: {0}")]
    UnregisteredComponent(&'static str),
    
    /// Second registration of the same component type
    #[error("Component type already registered: {0}")]
    ComponentAlreadyRegistered(&'static str),
    
    /// Signature width exhausted
    #[error("Too many component types: at most {max} are supported")]
    TooManyComponentTypes {
        /// Fixed signature width
        max: usize,
    },
    
    /// Explicit-ID create for an identifier that is already live
    #[error("Entity identifier already in use: {0}")]
    EntityIdInUse(Entity),
    
    /// Second registration of the same system type
    #[error("System already registered: {0}")]
    SystemAlreadyRegistered(&'static str),
    
    /// Access to a system type that was never registered
    #[error("Unknown system: {0}")]
    UnknownSystem(&'static str),
    
    /// Parent assignment that would close a loop in the hierarchy
    #[error("Hierarchy cycle: {parent} cannot become the parent of {child}")]
    HierarchyCycle {
        /// Entity being re-parented
        child: Entity,
        /// Requested parent
        parent: Entity,
    },
}
