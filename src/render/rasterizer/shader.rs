//! Shading hooks driven by the scanline filler.
//!
//! The filler knows nothing about lighting. Once per span it tells the
//! shader which four polygon corners bound the span and how much each one
//! contributes at the span's two ends (two corners per bounding edge); then
//! it asks for one color per pixel and steps the shader along with x.
//!
//! ```text
//!   edge_start(s)            edge_start(e)
//!        \                        /
//!   1-ws  \                      /  1-we
//!          s ================== e        <- span, delta_x pixels
//!     ws  /                      \  we
//!        /                        \
//!   edge_end(s)               edge_end(e)
//! ```

use crate::colors::modulate;
use crate::light::DirectionalLight;
use crate::math::vec3::Vec3;
use crate::mesh::{normal_for, Mesh};

/// Per-span interpolation and per-pixel coloring.
pub trait ScanlineShader {
    /// Called before a span is filled. `vertex_indices` are the start and
    /// end vertices of the left intersection's edge followed by those of the
    /// right intersection's edge; `weights` are the matching blend factors
    /// `[1 - w_left, w_left, 1 - w_right, w_right]`. `delta_x` is the span
    /// length in pixels.
    fn prepare_scanline(&mut self, vertex_indices: [usize; 4], weights: [f32; 4], delta_x: i32);

    /// Advance one pixel to the right.
    fn step_on_scanline(&mut self);

    /// Final color for the current pixel. `weight` goes from 0 at the left
    /// end of the span to 1 at the right end.
    fn shade(&mut self, color: u32, weight: f32) -> u32;
}

/// Flat shader - keeps the polygon (or texel) color as is.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatShader;

impl ScanlineShader for FlatShader {
    fn prepare_scanline(&mut self, _vertex_indices: [usize; 4], _weights: [f32; 4], _delta_x: i32) {}

    fn step_on_scanline(&mut self) {}

    #[inline]
    fn shade(&mut self, color: u32, _weight: f32) -> u32 {
        color
    }
}

/// Gouraud shader - interpolates per-vertex light intensities.
///
/// The intensity at each span end is blended from its edge's two vertices,
/// then stepped linearly across the span and multiplied into the color.
#[derive(Clone, Debug, Default)]
pub struct GouraudShader {
    intensities: Vec<f32>,
    current: f32,
    delta: f32,
}

impl GouraudShader {
    /// `intensities[i]` is the light intensity at vertex `i`, in [0.0, 1.0].
    pub fn new(intensities: Vec<f32>) -> Self {
        Self {
            intensities,
            current: 1.0,
            delta: 0.0,
        }
    }

    /// Light every vertex of `mesh` with the average normal of the polygons
    /// that share it.
    pub fn lit(mesh: &Mesh, light: &DirectionalLight) -> Self {
        let vertices = mesh.vertices();
        let mut normals = vec![Vec3::ZERO; vertices.len()];
        for polygon in mesh.polygons() {
            let normal = normal_for(vertices, polygon);
            for &i in polygon {
                normals[i] = normals[i] + normal;
            }
        }
        Self::new(normals.iter().map(|&n| light.illuminate(n)).collect())
    }

    fn blend(&self, indices: [usize; 2], weights: [f32; 2]) -> f32 {
        weights[0] * self.intensity(indices[0]) + weights[1] * self.intensity(indices[1])
    }

    fn intensity(&self, vertex: usize) -> f32 {
        self.intensities.get(vertex).copied().unwrap_or(1.0)
    }

    /// Intensity at the current pixel.
    pub fn current(&self) -> f32 {
        self.current
    }
}

impl ScanlineShader for GouraudShader {
    fn prepare_scanline(&mut self, vertex_indices: [usize; 4], weights: [f32; 4], delta_x: i32) {
        let [s0, s1, e0, e1] = vertex_indices;
        let [ws0, ws1, we0, we1] = weights;
        let start = self.blend([s0, s1], [ws0, ws1]);
        let end = self.blend([e0, e1], [we0, we1]);

        self.current = start;
        self.delta = (end - start) / delta_x.max(1) as f32;
    }

    #[inline]
    fn step_on_scanline(&mut self) {
        self.current += self.delta;
    }

    #[inline]
    fn shade(&mut self, color: u32, _weight: f32) -> u32 {
        modulate(color, self.current)
    }
}
