//! Lighting types for the shaders.

use crate::math::vec3::Vec3;

/// A directional light that illuminates the scene uniformly from a direction.
///
/// Directional lights are ideal for simulating distant light sources like the sun,
/// where all rays are effectively parallel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    /// The normalized direction the light is pointing (not where it comes from).
    pub direction: Vec3,
    pub ambient_intensity: f32,
}

impl DirectionalLight {
    /// Create a new directional light pointing in the given direction.
    /// The direction will be normalized automatically.
    pub fn new(direction: Vec3) -> Self {
        DirectionalLight {
            direction: direction.normalize(),
            ambient_intensity: 0.1,
        }
    }

    /// Diffuse intensity in [0.0, 1.0] for a surface with the given normal.
    pub fn intensity(&self, normal: Vec3) -> f32 {
        // Negate direction: light pointing at surface = positive dot product
        (-self.direction).dot(normal.normalize()).max(0.0)
    }

    /// Ambient plus diffuse, clamped to 1.
    pub fn illuminate(&self, normal: Vec3) -> f32 {
        (self.ambient_intensity + self.intensity(normal)).min(1.0)
    }
}
