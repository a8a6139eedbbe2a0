//! # Sim Engine
//!
//! The Entity-Component-System runtime at the centre of the simulation engine.
//! Rendering, the editor and the scene serializer are all clients of this crate:
//! they create entities, attach components and register systems.
//!
//! ## Features
//!
//! - **Entity registry**: recycled identifiers with per-entity signature and name
//! - **Sparse-set storage**: O(1) insert, lookup and swap-remove per component type
//! - **Signature-driven systems**: working sets kept in sync on every mutation
//! - **Transform hierarchy**: parent/child links with cached world matrices
//!
//! ## Quick Start
//!
//! ```rust
//! use sim_engine::prelude::*;
//!
//! fn main() -> Result<(), EcsError> {
//!     let mut scene = Scene::with_engine_components(SceneConfig::default())?;
//!     TransformHierarchy::register_systems(&mut scene)?;
//!
//!     let ship = scene.create_entity("Ship")?;
//!     scene.add_component(ship, TransformComponent::from_position(Vec3::new(0.0, 0.0, 0.0)))?;
//!     let turret = scene.create_entity("Turret")?;
//!     scene.add_component(turret, TransformComponent::from_position(Vec3::new(1.0, 0.0, 0.0)))?;
//!     TransformHierarchy::add_child(&mut scene, ship, turret)?;
//!
//!     scene.update_all(1.0 / 60.0)?;
//!     let world = TransformHierarchy::compute_world_matrix(&mut scene, turret)?;
//!     assert!((world.m14 - 1.0).abs() < 1e-6);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod ecs;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        foundation::math::{Vec3, Mat4, Quat, Transform},
        ecs::{
            Component, ComponentCatalog, ComponentStore, ComponentTypeId, EcsError, EcsResult,
            Entity, EntityRegistry, Signature, SignatureQuery, System, SystemRegistry,
            components::{
                TransformComponent, ParentComponent, ChildrenComponent, LocalToWorld,
                RenderableComponent, MeshId, MaterialId,
            },
            systems::{TransformSystem, RenderableCollector, RenderItem},
        },
        scene::{Scene, SceneConfig, TransformHierarchy},
    };
}
