//! Per-scanline edge intersections of the polygon being filled.

use crate::math::vec2::Vec2;

/// Where one polygon edge crosses one scanline.
///
/// `weight` runs from 0 at `edge_start` to 1 at `edge_end` and is what the
/// shader uses to blend the two vertices' attributes at this point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    pub x: i32,
    pub z: f32,
    pub weight: f32,
    pub edge_start: usize,
    pub edge_end: usize,
    /// Texture coordinates of `edge_start` and `edge_end`.
    pub edge_uv: Option<[Vec2; 2]>,
}

impl Intersection {
    /// Texture coordinate at this point of the edge.
    #[inline]
    pub fn uv(&self) -> Option<Vec2> {
        self.edge_uv.map(|[start, end]| start.lerp(end, self.weight))
    }
}

/// Both ends of a horizontal edge, left end first.
pub type Run = [Intersection; 2];

/// Intersections bucketed by scanline, for rows `0..height`.
///
/// Rows are unordered while edges are walked and sorted by x right before
/// they are filled. Horizontal edges are kept apart as runs: they do not
/// cross their row, but their pixels belong to the polygon. The row vectors
/// keep their capacity across `clear`.
#[derive(Clone, Debug, Default)]
pub struct IntersectionTable {
    rows: Vec<Vec<Intersection>>,
    runs: Vec<Vec<Run>>,
}

impl IntersectionTable {
    pub fn new(height: u32) -> Self {
        Self {
            rows: vec![Vec::new(); height as usize],
            runs: vec![Vec::new(); height as usize],
        }
    }

    pub fn height(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn resize(&mut self, height: u32) {
        self.clear();
        self.rows.resize_with(height as usize, Vec::new);
        self.runs.resize_with(height as usize, Vec::new);
    }

    pub fn clear(&mut self) {
        self.rows.iter_mut().for_each(Vec::clear);
        self.runs.iter_mut().for_each(Vec::clear);
    }

    /// Record an intersection on row `y`. Rows outside the table are
    /// clipped away; returns whether the record was kept.
    pub fn add(&mut self, y: i32, intersection: Intersection) -> bool {
        match usize::try_from(y).ok().and_then(|y| self.rows.get_mut(y)) {
            Some(row) => {
                row.push(intersection);
                true
            }
            None => false,
        }
    }

    /// Record a horizontal edge on row `y`, clipped like [`Self::add`].
    pub fn add_run(&mut self, y: i32, run: Run) -> bool {
        match usize::try_from(y).ok().and_then(|y| self.runs.get_mut(y)) {
            Some(runs) => {
                runs.push(run);
                true
            }
            None => false,
        }
    }

    pub fn row(&self, y: u32) -> &[Intersection] {
        self.rows.get(y as usize).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn runs(&self, y: u32) -> &[Run] {
        self.runs.get(y as usize).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn row_mut(&mut self, y: u32) -> (&mut Vec<Intersection>, &mut Vec<Run>) {
        (&mut self.rows[y as usize], &mut self.runs[y as usize])
    }

    /// Non-empty rows as `(y, intersections)`.
    pub fn occupied_rows(&self) -> impl Iterator<Item = (u32, &[Intersection])> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| !row.is_empty())
            .map(|(y, row)| (y as u32, row.as_slice()))
    }

    /// Number of crossings; runs are not counted.
    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Vec::is_empty) && self.runs.iter().all(Vec::is_empty)
    }
}
