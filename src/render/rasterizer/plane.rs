//! Plane equation of the polygon being rasterized.
//!
//! Every point on the polygon's plane satisfies `A·x + B·y + C·z + D = 0`,
//! so the depth under any pixel is `z = -(A·x + B·y + D) / C`. Polygons whose
//! plane contains the view direction (|C| close to zero) have no usable depth
//! function and are not filled.

use super::RasterError;
use crate::colors::Color;
use crate::math::vec3::Vec3;
use crate::mesh::normal_for;

/// |C| below this marks a polygon as edge-on.
pub const EDGE_ON_EPSILON: f32 = 0.001;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneEquation {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    inverse_c: f32,
}

impl PlaneEquation {
    /// Derive the plane of `polygon`. Without an explicit `normal` one is
    /// computed from the (already projected) vertices, which is what callers
    /// want after a perspective transform since normals are not projected.
    pub fn from_polygon(
        vertices: &[Vec3],
        polygon: &[usize],
        normal: Option<Vec3>,
        color: Color,
    ) -> Result<Self, RasterError> {
        let normal = normal.unwrap_or_else(|| normal_for(vertices, polygon));
        let (a, b, c) = (normal.x, normal.y, normal.z);

        if c.abs() < EDGE_ON_EPSILON || polygon.is_empty() {
            return Err(RasterError::EdgeOn { color });
        }

        // Project one vertex onto the normal.
        let p = vertices[polygon[0]];
        let d = -(a * p.x + b * p.y + c * p.z);

        Ok(Self {
            a,
            b,
            c,
            d,
            inverse_c: 1.0 / c,
        })
    }

    /// Depth of the plane under (x, y).
    #[inline]
    pub fn depth_at(&self, x: f32, y: f32) -> f32 {
        -(self.a * x + self.b * y + self.d) * self.inverse_c
    }

    /// `(A, B, C, D)`.
    pub fn coefficients(&self) -> (f32, f32, f32, f32) {
        (self.a, self.b, self.c, self.d)
    }

    /// Largest depth change caused by moving less than one pixel in x and y.
    pub fn depth_slack(&self) -> f32 {
        (self.a.abs() + self.b.abs()) * self.inverse_c.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn slanted() -> (Vec<Vec3>, Vec<usize>) {
        (
            vec![
                Vec3::new(10.3, 4.7, 1.0),
                Vec3::new(60.9, 12.2, 3.5),
                Vec3::new(40.5, 55.1, -2.0),
                Vec3::new(12.8, 41.6, -1.25),
            ],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn flat_square_has_constant_depth() {
        let vertices = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 10.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
        ];
        let plane = PlaneEquation::from_polygon(
            &vertices,
            &[0, 1, 2, 3],
            Some(Vec3::new(0.0, 0.0, 1.0)),
            Color::new(0),
        )
        .unwrap();
        assert_eq!(plane.coefficients(), (0.0, 0.0, 1.0, 0.0));
        assert_relative_eq!(plane.depth_at(3.0, 7.0), 0.0);
    }

    #[test]
    fn depth_at_vertices_round_trips() {
        let (vertices, polygon) = slanted();
        let plane = PlaneEquation::from_polygon(&vertices, &polygon, None, Color::new(0)).unwrap();
        for &i in &polygon {
            let v = vertices[i];
            assert_relative_eq!(plane.depth_at(v.x, v.y), v.z, epsilon = 1e-3);
        }
    }

    #[test]
    fn depth_at_floored_vertices_is_within_pixel_slack() {
        let (vertices, polygon) = slanted();
        let plane = PlaneEquation::from_polygon(&vertices, &polygon, None, Color::new(0)).unwrap();
        for &i in &polygon {
            let v = vertices[i];
            let z = plane.depth_at(v.x.floor(), v.y.floor());
            assert!((z - v.z).abs() <= plane.depth_slack() + 1e-3);
        }
    }

    #[test]
    fn edge_on_polygon_is_rejected() {
        let vertices = [
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(5.0, 10.0, 0.0),
            Vec3::new(5.0, 10.0, 10.0),
        ];
        let result = PlaneEquation::from_polygon(
            &vertices,
            &[0, 1, 2],
            Some(Vec3::new(1.0, 0.0, 0.0)),
            Color::named(0, "red"),
        );
        assert_eq!(
            result,
            Err(RasterError::EdgeOn {
                color: Color::named(0, "red")
            })
        );
        // Same polygon with a computed normal.
        assert!(PlaneEquation::from_polygon(&vertices, &[0, 1, 2], None, Color::new(0)).is_err());
    }

    #[test]
    fn collinear_polygon_is_rejected() {
        let vertices = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(2.0, 2.0, 0.0),
        ];
        assert!(PlaneEquation::from_polygon(&vertices, &[0, 1, 2], None, Color::new(0)).is_err());
    }
}
