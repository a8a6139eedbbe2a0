//! Transform component for the ECS system
//!
//! Pure data: position, rotation and scale relative to the entity's parent,
//! or to the world for roots. World matrices are derived by
//! [`crate::scene::TransformHierarchy`].

use crate::foundation::math::{Transform as MathTransform, Vec3, Mat4, Quat};
use crate::ecs::Component;

/// ECS Transform component (parent-relative)
#[derive(Debug, Clone, PartialEq)]
pub struct TransformComponent {
    /// Position relative to the parent
    pub position: Vec3,
    
    /// Rotation relative to the parent
    pub rotation: Quat,
    
    /// Scale factors relative to the parent
    pub scale: Vec3,
}

impl Component for TransformComponent {}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::repeat(1.0),
        }
    }
}

impl TransformComponent {
    /// Create identity transform
    pub fn identity() -> Self {
        Self::default()
    }
    
    /// Create from position only
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
    
    /// Parent-relative matrix: translate * rotate * scale
    pub fn to_matrix(&self) -> Mat4 {
        MathTransform::from(self).to_matrix()
    }
    
    /// Builder pattern: Set position
    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }
    
    /// Builder pattern: Set rotation from quaternion
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }
    
    /// Builder pattern: Set rotation from axis-angle
    #[must_use]
    pub fn with_rotation_axis_angle(mut self, axis: Vec3, angle: f32) -> Self {
        self.rotation = Quat::from_axis_angle(&nalgebra::Unit::new_normalize(axis), angle);
        self
    }
    
    /// Builder pattern: Set per-axis scale
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }
    
    /// Builder pattern: Set scale (uniform)
    #[must_use]
    pub fn with_uniform_scale(self, scale: f32) -> Self {
        self.with_scale(Vec3::repeat(scale))
    }
}

impl From<&TransformComponent> for MathTransform {
    fn from(local: &TransformComponent) -> Self {
        Self {
            position: local.position,
            rotation: local.rotation,
            scale: local.scale,
        }
    }
}

impl From<MathTransform> for TransformComponent {
    fn from(transform: MathTransform) -> Self {
        Self {
            position: transform.position,
            rotation: transform.rotation,
            scale: transform.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::HALF_PI;
    use approx::assert_relative_eq;
    
    #[test]
    fn test_transform_identity() {
        let transform = TransformComponent::identity();
        
        assert_eq!(transform.position, Vec3::zeros());
        assert_eq!(transform.scale, Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(transform.to_matrix(), Mat4::identity());
    }
    
    #[test]
    fn test_rotation_then_translation() {
        // 90° about Y maps +X to -Z, then translate by (0, 1, 0)
        let transform = TransformComponent::from_position(Vec3::new(0.0, 1.0, 0.0))
            .with_rotation_axis_angle(Vec3::y(), HALF_PI);
        
        let moved = transform.to_matrix().transform_point(&nalgebra::Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(moved, nalgebra::Point3::new(0.0, 1.0, -1.0), epsilon = 1e-5);
    }
    
    #[test]
    fn test_math_transform_conversion_keeps_matrix() {
        let local = TransformComponent::from_position(Vec3::new(3.0, 0.0, 0.0)).with_scale(Vec3::new(1.0, 2.0, 3.0));
        let math = MathTransform::from(&local);
        
        assert_relative_eq!(math.to_matrix(), local.to_matrix());
        assert_eq!(TransformComponent::from(math), local);
    }
}
