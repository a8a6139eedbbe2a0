//! ECS Systems module

pub mod transform_system;
pub mod renderable_collector;

pub use transform_system::TransformSystem;
pub use renderable_collector::{RenderableCollector, RenderItem};
