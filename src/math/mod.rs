//! Small vector types for screen-space geometry.

pub mod vec2;
pub mod vec3;
