//! Uniform acceleration grid.
//!
//! Space around the bounded primitives is split into `dim.x × dim.y × dim.z`
//! equal cells. Each cell lists the handles of every primitive whose bounds
//! overlap the cell's bounds, so a primitive may be listed in many cells.
//! Planes have no bounds and are never stored here.

use std::time::Instant;

use cellray_core::{Primitive, PrimitiveId, RayHit, Scene};
use cellray_math::{Aabb, Ray, UVec3, Vec3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Grid axes narrower than this are widened so cells keep a non-zero size.
const MIN_EXTENT: f32 = 1e-3;

/// Upper bound on cells per axis.
pub const MAX_AXIS_CELLS: u32 = 1024;

/// Upper bound on the total number of cells (128³). Larger requests are
/// scaled down keeping their proportions.
pub const MAX_CELLS: usize = 1 << 21;

/// How a ray walks the grid when looking for its nearest hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Traversal {
    /// Test every occupied cell whose bounds the ray crosses.
    Exhaustive,
    /// Step cell by cell along the ray and stop at the first cell that
    /// contains the nearest hit.
    #[default]
    Dda,
}

/// One grid cell.
#[derive(Debug, Clone)]
pub struct Cell {
    pub bounds: Aabb,
    pub primitives: Vec<PrimitiveId>,
}

/// Uniform grid over the bounded primitives of a scene.
///
/// The grid only holds handles; every query takes the scene it was built
/// from.
#[derive(Debug, Clone)]
pub struct Grid {
    bounds: Aabb,
    dim: UVec3,
    cell_size: Vec3,
    /// Dense cell storage, x varies fastest
    cells: Vec<Cell>,
    /// Indices of cells with at least one primitive
    occupied: Vec<usize>,
    traversal: Traversal,
}

impl Grid {
    /// Build a grid over `scene`. Dimensions are clamped with
    /// [`clamp_dim`].
    ///
    /// Cells are filled in parallel; the result does not depend on the
    /// number of rayon workers.
    pub fn build(scene: &Scene, dim: [u32; 3]) -> Self {
        let start = Instant::now();
        let dim = clamp_dim(dim);

        let bounded: Vec<(PrimitiveId, Aabb)> = scene.bounded().collect();
        let bounds = scene.world_bounds();

        if bounded.is_empty() || bounds.is_empty() {
            log::debug!("Grid: no bounded primitives, nothing to build");
            return Self {
                bounds: Aabb::EMPTY,
                dim,
                cell_size: Vec3::ZERO,
                cells: Vec::new(),
                occupied: Vec::new(),
                traversal: Traversal::default(),
            };
        }

        let bounds = bounds.padded(MIN_EXTENT);
        let cell_size = bounds.size() / dim.as_vec3();

        let mut grid = Self {
            bounds,
            dim,
            cell_size,
            cells: Vec::new(),
            occupied: Vec::new(),
            traversal: Traversal::default(),
        };

        let cell_count = cell_count(dim);
        let cells: Vec<Cell> = (0..cell_count)
            .into_par_iter()
            .map(|index| {
                let bounds = grid.cell_bounds(grid.coords_of(index));
                let primitives = bounded
                    .iter()
                    .filter(|(_, b)| b.overlaps(&bounds))
                    .map(|(id, _)| *id)
                    .collect();
                Cell { bounds, primitives }
            })
            .collect();

        grid.occupied = cells
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.primitives.is_empty())
            .map(|(i, _)| i)
            .collect();
        grid.cells = cells;

        let references: usize = grid.cells.iter().map(|c| c.primitives.len()).sum();
        log::debug!(
            "Grid {}x{}x{}: {} primitives, {}/{} cells occupied, {} references, built in {:.2?}",
            dim.x,
            dim.y,
            dim.z,
            bounded.len(),
            grid.occupied.len(),
            cell_count,
            references,
            start.elapsed()
        );

        grid
    }

    /// Select the traversal strategy used by [`Grid::nearest_hit`].
    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    pub fn traversal(&self) -> Traversal {
        self.traversal
    }

    /// World bounds covered by the cells. `EMPTY` when nothing was inserted.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Cells per axis, each at least 1.
    pub fn dim(&self) -> UVec3 {
        self.dim
    }

    pub fn cell_size(&self) -> Vec3 {
        self.cell_size
    }

    /// All stored cells, x varying fastest. Empty when nothing was inserted.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells with at least one primitive.
    pub fn occupied_cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.occupied.iter().map(|&i| &self.cells[i])
    }

    /// The cell at integer coordinates, if inside the grid.
    pub fn cell(&self, coords: UVec3) -> Option<&Cell> {
        if coords.cmpge(self.dim).any() {
            return None;
        }
        self.cells.get(self.index_of(coords))
    }

    /// Integer coordinates of the cell containing `point`, or `None` if the
    /// point lies outside the grid. Points on a shared face belong to the
    /// cell with the higher index, except on the grid's max faces.
    pub fn cell_coords(&self, point: Vec3) -> Option<UVec3> {
        if self.cells.is_empty() || !self.bounds.contains(point) {
            return None;
        }
        Some(self.clamped_coords(point))
    }

    fn clamped_coords(&self, point: Vec3) -> UVec3 {
        let rel = (point - self.bounds.min()) / self.cell_size;
        let max = (self.dim - UVec3::ONE).as_vec3();
        rel.floor().clamp(Vec3::ZERO, max).as_uvec3()
    }

    #[inline]
    fn index_of(&self, c: UVec3) -> usize {
        let [dx, dy, _] = self.dim.to_array().map(|d| d as usize);
        c.x as usize + dx * (c.y as usize + dy * c.z as usize)
    }

    #[inline]
    fn coords_of(&self, index: usize) -> UVec3 {
        let [dx, dy, _] = self.dim.to_array().map(|d| d as usize);
        UVec3::new(
            (index % dx) as u32,
            ((index / dx) % dy) as u32,
            (index / (dx * dy)) as u32,
        )
    }

    /// Position of the `i`-th cell boundary on `axis`. The last boundary is
    /// the grid max exactly, so neighbouring cells share faces with no gaps.
    #[inline]
    fn boundary(&self, axis: usize, i: u32) -> f32 {
        let slab = self.bounds.axis_interval(axis);
        if i >= self.dim[axis] {
            slab.max
        } else {
            slab.min + self.cell_size[axis] * i as f32
        }
    }

    fn cell_bounds(&self, c: UVec3) -> Aabb {
        let min = Vec3::new(self.boundary(0, c.x), self.boundary(1, c.y), self.boundary(2, c.z));
        let max = Vec3::new(
            self.boundary(0, c.x + 1),
            self.boundary(1, c.y + 1),
            self.boundary(2, c.z + 1),
        );
        Aabb::from_points(min, max)
    }

    /// Every positive-distance hit against the bounded primitives.
    ///
    /// Visits each occupied cell the ray crosses. A primitive listed in
    /// several cells is tested once; hits come back ordered by handle.
    pub fn traverse<'s>(&self, scene: &'s Scene, ray: &Ray) -> Vec<RayHit<'s>> {
        let mut candidates: Vec<PrimitiveId> = self
            .occupied_cells()
            .filter(|cell| cell.bounds.slab_range(ray).is_some())
            .flat_map(|cell| cell.primitives.iter().copied())
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        candidates
            .into_iter()
            .filter_map(|id| scene.primitive(id))
            .filter_map(|p| p.intersect(ray))
            .filter(|hit| hit.is_valid())
            .collect()
    }

    /// Nearest positive-distance hit against the bounded primitives.
    pub fn nearest_hit<'s>(&self, scene: &'s Scene, ray: &Ray) -> Option<RayHit<'s>> {
        match self.traversal {
            Traversal::Exhaustive => self
                .traverse(scene, ray)
                .into_iter()
                .fold(None, |best: Option<RayHit<'s>>, hit| match best {
                    Some(b) if b.t <= hit.t => Some(b),
                    _ => Some(hit),
                }),
            Traversal::Dda => self.walk(scene, ray),
        }
    }

    /// 3D digital differential analyser (Amanatides & Woo).
    fn walk<'s>(&self, scene: &'s Scene, ray: &Ray) -> Option<RayHit<'s>> {
        if self.cells.is_empty() {
            return None;
        }
        let (t_enter, t_exit) = self.bounds.slab_range(ray)?;
        let t_start = t_enter.max(0.0);

        let mut cell = self.clamped_coords(ray.at(t_start));
        let mut step = [0i32; 3];
        let mut t_next = [f32::INFINITY; 3];
        for axis in 0..3 {
            let d = ray.direction[axis];
            if d > 0.0 {
                step[axis] = 1;
                t_next[axis] = (self.boundary(axis, cell[axis] + 1) - ray.origin[axis]) / d;
            } else if d < 0.0 {
                step[axis] = -1;
                t_next[axis] = (self.boundary(axis, cell[axis]) - ray.origin[axis]) / d;
            }
        }

        let mut best: Option<RayHit<'s>> = None;
        let mut nearest = f32::INFINITY;

        loop {
            let cell_exit = t_next[0].min(t_next[1]).min(t_next[2]).min(t_exit);

            for &id in &self.cells[self.index_of(cell)].primitives {
                if let Some(hit) = scene.primitive(id).and_then(|p: &Primitive| p.intersect(ray)) {
                    if hit.is_nearer_than(nearest) {
                        nearest = hit.t;
                        best = Some(hit);
                    }
                }
            }

            // Anything in later cells is at least `cell_exit` away.
            if nearest <= cell_exit {
                break;
            }

            let axis = if t_next[0] <= t_next[1] && t_next[0] <= t_next[2] {
                0
            } else if t_next[1] <= t_next[2] {
                1
            } else {
                2
            };
            if t_next[axis] > t_exit {
                break;
            }

            let next = cell[axis] as i32 + step[axis];
            if next < 0 || next >= self.dim[axis] as i32 {
                break;
            }
            cell[axis] = next as u32;

            let boundary = if step[axis] > 0 { cell[axis] + 1 } else { cell[axis] };
            t_next[axis] =
                (self.boundary(axis, boundary) - ray.origin[axis]) / ray.direction[axis];
        }

        best
    }
}

fn cell_count(dim: UVec3) -> usize {
    dim.to_array().iter().map(|&d| d as usize).product()
}

/// Clamp requested grid dimensions to `1..=MAX_AXIS_CELLS` per axis, then
/// shrink them proportionally until the total is at most [`MAX_CELLS`].
pub fn clamp_dim(requested: [u32; 3]) -> UVec3 {
    let mut dim = UVec3::from_array(requested).clamp(UVec3::ONE, UVec3::splat(MAX_AXIS_CELLS));

    let total = cell_count(dim);
    if total > MAX_CELLS {
        let scale = (MAX_CELLS as f64 / total as f64).cbrt();
        dim = UVec3::from_array(dim.to_array().map(|d| ((d as f64 * scale) as u32).max(1)));
        // Rounding can still leave a few cells too many.
        while cell_count(dim) > MAX_CELLS {
            let axis = (0..3).fold(0, |best, a| if dim[a] > dim[best] { a } else { best });
            dim[axis] -= 1;
        }
    }

    if dim != UVec3::from_array(requested).max(UVec3::ONE) {
        log::warn!(
            "Grid dimensions {:?} exceed the cell limit ({} per axis, {} total), using {:?}",
            requested,
            MAX_AXIS_CELLS,
            MAX_CELLS,
            dim.to_array()
        );
    }
    dim
}
