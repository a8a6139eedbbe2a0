//! Entity-Component-System implementation
//!
//! - [`EntityRegistry`]: identifier allocation, signatures, names
//! - [`ComponentStore`]: sparse-set storage for one component type
//! - [`ComponentCatalog`]: all stores of a scene plus the type registry
//! - [`SystemRegistry`]: systems and their signature-driven working sets
//! - [`SignatureQuery`]: ad hoc lookups by signature
//!
//! The core is single-threaded. All mutation happens between frames or from
//! inside a system's update, on the thread that owns the [`crate::scene::Scene`].

pub mod entity;
pub mod signature;
pub mod storage;
pub mod component;
pub mod system;
pub mod query;
pub mod error;
pub mod components;
pub mod systems;

#[cfg(test)]
mod tests;

pub use entity::{Entity, EntityRegistry};
pub use signature::{ComponentTypeId, Signature, MAX_COMPONENTS};
pub use storage::ComponentStore;
pub use component::{Component, ComponentCatalog};
pub use system::{System, SystemRegistry};
pub use query::SignatureQuery;
pub use error::{EcsError, EcsResult};
