//! Nearest-hit query against a whole scene.

use cellray_core::{RayHit, Scene};
use cellray_math::Ray;

use crate::Grid;

/// Nearest positive-distance hit along `ray`.
///
/// Bounded primitives are found through the grid; planes have no bounds and
/// are tested one by one afterwards. A candidate replaces the current best
/// only when `0 < t < nearest`.
pub fn trace_ray<'s>(scene: &'s Scene, grid: &Grid, ray: &Ray) -> Option<RayHit<'s>> {
    let mut nearest = f32::INFINITY;
    let mut best = None;

    if let Some(hit) = grid.nearest_hit(scene, ray) {
        if hit.is_nearer_than(nearest) {
            nearest = hit.t;
            best = Some(hit);
        }
    }

    for &id in scene.unbounded() {
        let Some(primitive) = scene.primitive(id) else {
            continue;
        };
        if let Some(hit) = primitive.intersect(ray) {
            if hit.is_nearer_than(nearest) {
                nearest = hit.t;
                best = Some(hit);
            }
        }
    }

    best
}
