//! Screen-space polygon meshes.
//!
//! A [`Mesh`] is the input side of the rasterizer: a shared vertex list,
//! polygons as ordered index lists into it, one color per polygon and
//! optional texture coordinates. Vertex `i` of a polygon connects to vertex
//! `i + 1`; the last one wraps around to the first.

use std::path::Path;

use thiserror::Error;

use crate::colors::Color;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;

/// Errors produced while loading meshes or textures from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to parse OBJ file: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("{path} contains no polygons")]
    Empty { path: String },
}

/// A polygon mesh whose vertices already live in screen space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    name: String,
    vertices: Vec<Vec3>,
    polygons: Vec<Vec<usize>>,
    colors: Vec<Color>,
    texture_coords: Vec<Vec2>,
    polygon_texture_coords: Vec<Vec<usize>>,
}

impl Mesh {
    /// Create an untextured mesh. Polygons without a matching entry in
    /// `colors` are drawn with palette colors.
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<Vec3>,
        polygons: Vec<Vec<usize>>,
        colors: Vec<Color>,
    ) -> Self {
        Self {
            name: name.into(),
            vertices,
            polygons,
            colors,
            texture_coords: Vec::new(),
            polygon_texture_coords: Vec::new(),
        }
    }

    /// Attach texture coordinates. `polygon_texture_coords[p][i]` indexes
    /// `texture_coords` for the `i`-th corner of polygon `p`.
    pub fn with_texture_coords(
        mut self,
        texture_coords: Vec<Vec2>,
        polygon_texture_coords: Vec<Vec<usize>>,
    ) -> Self {
        self.texture_coords = texture_coords;
        self.polygon_texture_coords = polygon_texture_coords;
        self
    }

    /// The two-box model: a pair of 0.4 high boxes side by side,
    /// colored alternately red and gray, scaled by `scale`.
    pub fn two_boxes(scale: f32) -> Self {
        let vertices = [
            [-0.2, -0.2, 0.2],
            [0.01, -0.2, 0.2],
            [0.01, -0.2, -0.2],
            [-0.2, -0.2, -0.2],
            [-0.2, 0.2, 0.2],
            [0.01, 0.2, 0.2],
            [0.01, 0.2, -0.2],
            [-0.2, 0.2, -0.2],
            [0.2, -0.2, 0.2],
            [0.45, -0.2, 0.2],
            [0.45, -0.2, -0.2],
            [0.2, -0.2, -0.2],
            [0.2, 0.2, 0.2],
            [0.45, 0.2, 0.2],
            [0.45, 0.2, -0.2],
            [0.2, 0.2, -0.2],
        ]
        .iter()
        .map(|&[x, y, z]| Vec3::new(x, y, z) * scale)
        .collect();

        let box_faces = |o: usize| {
            vec![
                vec![o + 3, o + 2, o + 1, o],
                vec![o + 4, o + 5, o + 6, o + 7],
                vec![o + 4, o, o + 1, o + 5],
                vec![o + 1, o + 2, o + 6, o + 5],
                vec![o + 6, o + 2, o + 3, o + 7],
                vec![o + 3, o, o + 4, o + 7],
            ]
        };
        let polygons: Vec<Vec<usize>> = box_faces(0).into_iter().chain(box_faces(8)).collect();
        let colors = (0..polygons.len())
            .map(|i| Color::from_palette(if i % 2 == 0 { 2 } else { 8 }))
            .collect();

        let corners = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        let box_uvs = |o: usize| {
            vec![
                vec![o + 1, o + 2, o + 3, o],
                vec![o + 1, o + 2, o + 3, o],
                vec![o + 1, o, o + 3, o + 2],
                vec![o + 3, o, o + 1, o + 2],
                vec![o + 3, o, o + 1, o + 2],
                vec![o + 3, o, o + 1, o + 2],
            ]
        };
        let texture_coords = corners.iter().chain(corners.iter()).copied().collect();
        let polygon_texture_coords = box_uvs(0).into_iter().chain(box_uvs(4)).collect();

        Self::new("two_boxes", vertices, polygons, colors)
            .with_texture_coords(texture_coords, polygon_texture_coords)
    }

    /// Load every object of an OBJ file as its own mesh. Faces are kept as
    /// polygons (no triangulation).
    pub fn load_all_from_obj<P: AsRef<Path>>(path: P) -> Result<Vec<Self>, LoadError> {
        let path = path.as_ref();
        let options = tobj::LoadOptions {
            single_index: true,
            triangulate: false,
            ..Default::default()
        };
        let (models, _materials) = tobj::load_obj(path, &options)?;

        let meshes: Vec<Self> = models
            .into_iter()
            .map(|model| Self::from_tobj(model.name, &model.mesh))
            .filter(|mesh| !mesh.polygons.is_empty())
            .collect();

        if meshes.is_empty() {
            return Err(LoadError::Empty {
                path: path.display().to_string(),
            });
        }
        Ok(meshes)
    }

    fn from_tobj(name: String, mesh: &tobj::Mesh) -> Self {
        let vertices = mesh
            .positions
            .chunks_exact(3)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
            .collect();

        // An empty arity list means every face is a triangle.
        let arities: Vec<usize> = if mesh.face_arities.is_empty() {
            vec![3; mesh.indices.len() / 3]
        } else {
            mesh.face_arities.iter().map(|&n| n as usize).collect()
        };

        let mut polygons = Vec::with_capacity(arities.len());
        let mut cursor = 0;
        for arity in arities {
            let face = &mesh.indices[cursor..cursor + arity];
            polygons.push(face.iter().map(|&i| i as usize).collect::<Vec<_>>());
            cursor += arity;
        }

        let colors = (0..polygons.len()).map(Color::from_palette).collect();
        let mut result = Self::new(name, vertices, polygons, colors);

        if !mesh.texcoords.is_empty() {
            // single_index: texture coordinates share the position indices.
            let texture_coords = mesh
                .texcoords
                .chunks_exact(2)
                .map(|t| Vec2::new(t[0], 1.0 - t[1]))
                .collect();
            let polygon_texture_coords = result.polygons.clone();
            result = result.with_texture_coords(texture_coords, polygon_texture_coords);
        }
        result
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [Vec3] {
        &mut self.vertices
    }

    pub fn polygons(&self) -> &[Vec<usize>] {
        &self.polygons
    }

    pub fn texture_coords(&self) -> &[Vec2] {
        &self.texture_coords
    }

    /// Color of polygon `index`, falling back to the palette.
    pub fn color(&self, index: usize) -> Color {
        self.colors
            .get(index)
            .copied()
            .unwrap_or_else(|| Color::from_palette(index))
    }

    /// Texture coordinate indices of polygon `index`, if the mesh is textured.
    pub fn polygon_texture_coords(&self, index: usize) -> Option<&[usize]> {
        if self.texture_coords.is_empty() {
            return None;
        }
        self.polygon_texture_coords.get(index).map(Vec::as_slice)
    }
}

/// Unit normal of a polygon using Newell's method, which also copes with
/// slightly non-planar and concave polygons. Degenerate polygons (collinear
/// or coincident vertices) yield [`Vec3::ZERO`].
pub fn normal_for(vertices: &[Vec3], polygon: &[usize]) -> Vec3 {
    let mut normal = Vec3::ZERO;
    for (i, &index) in polygon.iter().enumerate() {
        let current = vertices[index];
        let next = vertices[polygon[(i + 1) % polygon.len()]];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal.normalize()
}
