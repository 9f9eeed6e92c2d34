//! Polygon rasterization.
//!
//! A [`Rasterizer`] turns one screen-space polygon at a time into pixels:
//!
//! 1. [`plane::PlaneEquation`] gives the depth under any pixel of the polygon.
//! 2. [`bresenham`] walks every edge and records one intersection per
//!    scanline crossed in an [`IntersectionTable`]; vertices are added by the
//!    polygon assembly, twice at local y-extrema.
//! 3. [`scanline`] sorts each row, pairs the intersections and fills the
//!    spans between them, depth testing every pixel and driving a
//!    [`ScanlineShader`] for interpolated shading and texturing.
//!
//! All per-polygon state lives in the `Rasterizer` and is reset at the start
//! of every polygon; `&mut self` on every entry point means a pass can never
//! be interleaved with another.

pub mod bresenham;
pub mod intersection;
pub mod plane;
pub mod scanline;
pub mod shader;

pub use bresenham::{BresenhamLine, EdgePoint, LinePixel};
pub use intersection::{Intersection, IntersectionTable, Run};
pub use plane::PlaneEquation;
pub use scanline::InterpolationContext;
pub use shader::{FlatShader, GouraudShader, ScanlineShader};

use thiserror::Error;

use super::framebuffer::RasterTarget;
use crate::colors::Color;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::mesh::Mesh;
use crate::texture::Texture;

/// Why a polygon was not filled. Neither case is fatal: the polygon is
/// skipped and rendering continues with the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterError {
    /// The polygon's plane contains the view direction, so depth cannot be
    /// reconstructed from (x, y).
    #[error("polygon {color} is perpendicular to the screen")]
    EdgeOn { color: Color },
    /// After rounding to pixels every edge is horizontal.
    #[error("polygon {color} collapses to a horizontal line")]
    Degenerate { color: Color },
}

/// What [`Rasterizer::render_mesh`] draws for each polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Outlines only.
    Wireframe,
    /// Filled polygons only.
    #[default]
    Filled,
    /// Filled polygons with outlines drawn on top.
    FilledWireframe,
}

impl RenderMode {
    pub fn fills(self) -> bool {
        matches!(self, RenderMode::Filled | RenderMode::FilledWireframe)
    }

    pub fn strokes(self) -> bool {
        matches!(self, RenderMode::Wireframe | RenderMode::FilledWireframe)
    }
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderMode::Wireframe => write!(f, "Wireframe"),
            RenderMode::Filled => write!(f, "Filled"),
            RenderMode::FilledWireframe => write!(f, "FilledWireframe"),
        }
    }
}

/// Where the filler takes per-pixel depth from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthSource {
    /// Evaluate the polygon's plane equation at every pixel.
    #[default]
    PlaneEquation,
    /// Interpolate linearly between the depths stored on the span's two
    /// intersections.
    Interpolated,
}

/// One polygon of a vertex list, as handed to the rasterizer.
#[derive(Clone, Copy, Debug)]
pub struct PolygonRef<'a> {
    pub vertices: &'a [Vec3],
    pub indices: &'a [usize],
    pub color: Color,
    /// Shared texture coordinates and, per corner, an index into them.
    pub texture_coords: Option<(&'a [Vec2], &'a [usize])>,
    /// Plane normal; computed from the vertices when absent.
    pub normal: Option<Vec3>,
}

impl<'a> PolygonRef<'a> {
    pub fn new(vertices: &'a [Vec3], indices: &'a [usize], color: Color) -> Self {
        Self {
            vertices,
            indices,
            color,
            texture_coords: None,
            normal: None,
        }
    }

    pub fn with_texture_coords(mut self, coords: &'a [Vec2], indices: &'a [usize]) -> Self {
        self.texture_coords = Some((coords, indices));
        self
    }

    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = Some(normal);
        self
    }

    /// Corner `i` snapped to the pixel grid (see [`EdgePoint::snap`]).
    pub fn corner(&self, i: usize) -> EdgePoint {
        let vertex = self.indices[i];
        let uv = self
            .texture_coords
            .map(|(coords, indices)| coords[indices[i]]);
        EdgePoint::snap(self.vertices[vertex]).with_vertex(vertex, uv)
    }
}

/// Totals of one [`Rasterizer::render_mesh`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub pixels_filled: usize,
    pub polygons_filled: usize,
    pub polygons_skipped: usize,
}

/// Scanline polygon rasterizer and its per-polygon working state.
#[derive(Debug, Default)]
pub struct Rasterizer {
    intersections: IntersectionTable,
    plane: Option<PlaneEquation>,
    interpolation: InterpolationContext,
    depth_source: DepthSource,
    corners: Vec<EdgePoint>,
    spans: Vec<Run>,
}

impl Rasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_depth_source(&mut self, depth_source: DepthSource) {
        self.depth_source = depth_source;
    }

    pub fn depth_source(&self) -> DepthSource {
        self.depth_source
    }

    /// Intersections of the last assembled polygon. Rows are emptied as the
    /// fill pass consumes them.
    pub fn intersections(&self) -> &IntersectionTable {
        &self.intersections
    }

    pub fn clear_intersections(&mut self) {
        self.intersections.clear();
    }

    /// Plane of the polygon currently being processed.
    pub fn plane(&self) -> Option<&PlaneEquation> {
        self.plane.as_ref()
    }

    /// Stroke the segment between two points, with x and y floored.
    pub fn draw_line<T: RasterTarget>(&mut self, start: Vec3, end: Vec3, color: Color, target: &mut T) {
        stroke_edge(EdgePoint::snap(start), EdgePoint::snap(end), color.argb, target);
    }

    /// Draw the outline of a polygon. Pixels are written unconditionally
    /// with the polygon color; no shading is applied.
    pub fn stroke_polygon<T: RasterTarget>(&mut self, polygon: &PolygonRef, target: &mut T) {
        let n = polygon.indices.len();
        for i in 0..n {
            stroke_edge(polygon.corner(i), polygon.corner((i + 1) % n), polygon.color.argb, target);
        }
    }

    /// Draw every polygon of `mesh`. Polygons that cannot be filled are
    /// logged and skipped; their outline is still drawn in wireframe modes.
    pub fn render_mesh<S, T>(
        &mut self,
        mesh: &Mesh,
        mode: RenderMode,
        shader: &mut S,
        texture: Option<&Texture>,
        target: &mut T,
    ) -> RenderStats
    where
        S: ScanlineShader,
        T: RasterTarget,
    {
        let mut stats = RenderStats::default();

        for (index, indices) in mesh.polygons().iter().enumerate() {
            let mut polygon = PolygonRef::new(mesh.vertices(), indices, mesh.color(index));
            if let (Some(_), Some(uv_indices)) = (texture, mesh.polygon_texture_coords(index)) {
                polygon = polygon.with_texture_coords(mesh.texture_coords(), uv_indices);
            }

            if mode.fills() {
                match self.fill_polygon(&polygon, shader, texture, target) {
                    Ok(pixels) => {
                        stats.pixels_filled += pixels;
                        stats.polygons_filled += 1;
                    }
                    Err(err) => {
                        log::warn!("{}: skipping polygon {}: {}", mesh.name(), index, err);
                        stats.polygons_skipped += 1;
                    }
                }
            }
            if mode.strokes() {
                self.stroke_polygon(&polygon, target);
            }
        }

        stats
    }
}

fn stroke_edge<T: RasterTarget>(start: EdgePoint, end: EdgePoint, color: u32, target: &mut T) {
    for pixel in bresenham::line_pixels(start, end) {
        target.set(pixel.x, pixel.y, pixel.z, color);
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingTarget;
    use super::*;

    fn square() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 10.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
        ]
    }

    #[test]
    fn stroke_polygon_draws_closed_outline() {
        let vertices = square();
        let mut target = RecordingTarget::new(20, 20);
        let mut rasterizer = Rasterizer::new();
        rasterizer.stroke_polygon(
            &PolygonRef::new(&vertices, &[0, 1, 2, 3], Color::new(0xFFFFFFFF)),
            &mut target,
        );

        assert_eq!(target.color.len(), 40);
        assert!(target.color.values().all(|&c| c == 0xFFFFFFFF));
        assert!(target.color.contains_key(&(0, 0)));
        assert!(target.color.contains_key(&(10, 10)));
        assert!(!target.color.contains_key(&(5, 5)));
        assert!(rasterizer.intersections().is_empty());
    }

    #[test]
    fn draw_line_floors_and_interpolates_depth() {
        let mut target = RecordingTarget::new(20, 20);
        Rasterizer::new().draw_line(
            Vec3::new(1.7, 2.2, 0.0),
            Vec3::new(5.9, 2.9, 4.0),
            Color::new(1),
            &mut target,
        );
        let row: Vec<i32> = (1..=5).collect();
        for x in row {
            assert!(target.color.contains_key(&(x, 2)));
        }
        assert_eq!(target.depth[&(3, 2)], 2.0);
    }

    #[test]
    fn draw_line_across_huge_coordinates() {
        let mut target = RecordingTarget::new(64, 64);
        Rasterizer::new().draw_line(
            Vec3::new(-1.2e9, 5.0, 0.0),
            Vec3::new(1.2e9, 5.0, 0.0),
            Color::new(1),
            &mut target,
        );
        assert_eq!(target.row_span(5), Some((0, 63)));
        assert_eq!(target.row_count(5), 64);
    }

    #[test]
    fn render_mesh_skips_unfillable_polygons_and_continues() {
        let vertices = vec![
            // Edge-on: all corners share x and y pairs along a line.
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(5.0, 10.0, 0.0),
            Vec3::new(5.0, 10.0, 10.0),
            // A regular triangle.
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(8.0, 0.0, 1.0),
            Vec3::new(0.0, 8.0, 1.0),
        ];
        let mesh = Mesh::new(
            "mixed",
            vertices,
            vec![vec![0, 1, 2], vec![3, 4, 5]],
            Vec::new(),
        );
        let mut target = RecordingTarget::new(20, 20);
        let stats = Rasterizer::new().render_mesh(
            &mesh,
            RenderMode::Filled,
            &mut FlatShader,
            None,
            &mut target,
        );

        assert_eq!(stats.polygons_skipped, 1);
        assert_eq!(stats.polygons_filled, 1);
        assert_eq!(stats.pixels_filled, target.color.len());
        assert!(stats.pixels_filled > 0);
    }

    #[test]
    fn wireframe_mode_does_not_fill() {
        let mesh = Mesh::new("square", square(), vec![vec![0, 1, 2, 3]], Vec::new());
        let mut target = RecordingTarget::new(20, 20);
        let mut rasterizer = Rasterizer::new();
        let stats =
            rasterizer.render_mesh(&mesh, RenderMode::Wireframe, &mut FlatShader, None, &mut target);
        assert_eq!(stats, RenderStats::default());
        assert_eq!(target.color.len(), 40);
    }

    #[test]
    fn empty_mesh_leaves_table_empty() {
        let mut rasterizer = Rasterizer::new();
        rasterizer.clear_intersections();
        let mut target = RecordingTarget::new(20, 20);
        let stats = rasterizer.render_mesh(
            &Mesh::default(),
            RenderMode::FilledWireframe,
            &mut FlatShader,
            None,
            &mut target,
        );
        assert_eq!(stats, RenderStats::default());
        assert!(rasterizer.intersections().is_empty());
        assert!(target.color.is_empty());
    }
}
