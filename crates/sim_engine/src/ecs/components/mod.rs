//! ECS Components module
//!
//! Engine-provided components. Applications register their own types next to
//! these with [`crate::scene::Scene::register_component`].

pub mod transform;
pub mod hierarchy;
pub mod renderable;

pub use transform::TransformComponent;
pub use hierarchy::{ParentComponent, ChildrenComponent, LocalToWorld};
pub use renderable::{RenderableComponent, MeshId, MaterialId};

use crate::ecs::{ComponentCatalog, EcsResult};

/// Register every engine component with its editor display name
pub fn register_engine_components(catalog: &mut ComponentCatalog) -> EcsResult<()> {
    catalog.register_type::<TransformComponent>("Transform")?;
    catalog.register_type::<ParentComponent>("Parent")?;
    catalog.register_type::<ChildrenComponent>("Children")?;
    catalog.register_type::<LocalToWorld>("Local To World")?;
    catalog.register_type::<RenderableComponent>("Renderable")?;
    Ok(())
}
