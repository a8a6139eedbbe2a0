//! Renderable component for entities that can be rendered
//!
//! The ECS core never talks to the GPU. This component only carries the handles
//! a renderer needs to draw the entity at its world matrix.

use crate::ecs::Component;

/// Handle of a mesh owned by the renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u32);

/// Handle of a material owned by the renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// Component for entities that can be rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderableComponent {
    /// Mesh to draw
    pub mesh: MeshId,
    
    /// Material to use for rendering
    pub material: MaterialId,
    
    /// Whether this object is visible
    pub visible: bool,
    
    /// Rendering layer for sorting (higher values render later)
    pub render_layer: u8,
}

impl Component for RenderableComponent {}

impl Default for RenderableComponent {
    fn default() -> Self {
        Self::new(MeshId::default(), MaterialId::default())
    }
}

impl RenderableComponent {
    /// Create a visible renderable on layer 0
    pub fn new(mesh: MeshId, material: MaterialId) -> Self {
        Self {
            mesh,
            material,
            visible: true,
            render_layer: 0,
        }
    }
    
    /// Builder pattern: Set render layer
    #[must_use]
    pub fn with_render_layer(mut self, layer: u8) -> Self {
        self.render_layer = layer;
        self
    }
    
    /// Set visibility
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}
