//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use cellray_math::{Aabb, Mat4, Ray, Vec3, EPSILON};

use crate::{Material, Placement, RayHit};

/// A single-sided triangle. The front face is the side that
/// `(v1 - v0) × (v2 - v0)` points to.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed object-space face normal (unit length)
    normal: Vec3,
    pub(crate) placement: Placement,
    pub(crate) material: Option<Material>,
    /// World-space bounding box
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three object-space vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        let mut tri = Self {
            v0,
            v1,
            v2,
            normal,
            placement: Placement::default(),
            material: None,
            bbox: Aabb::EMPTY,
        };
        tri.update_bounds();
        tri
    }

    /// Attach a material.
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    /// Set the object-to-world matrix.
    pub fn with_transform(mut self, world: Mat4) -> Self {
        self.placement = Placement::new(world);
        self.update_bounds();
        self
    }

    /// Object-space vertices.
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// World-space bounding box.
    pub fn bounds(&self) -> Aabb {
        self.bbox
    }

    fn update_bounds(&mut self) {
        // Exact bounds of the transformed vertices; may be flat on an axis.
        self.bbox = Aabb::enclosing(self.vertices().map(|v| self.placement.point_to_world(v)));
    }

    /// Möller-Trumbore ray-triangle intersection algorithm.
    ///
    /// Back-facing and near-parallel rays are treated as misses.
    pub fn intersect(&self, ray: &Ray) -> Option<RayHit<'_>> {
        let local = self.placement.to_object(ray)?;

        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = local.direction.cross(edge2);
        let det = edge1.dot(h);

        // Negative: ray sees the back face. Near zero: parallel.
        if det < EPSILON {
            return None;
        }

        let f = 1.0 / det;
        let s = local.origin - self.v0;
        let u = f * s.dot(h);

        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * local.direction.dot(q);

        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if t < 0.0 {
            return None;
        }

        Some(RayHit {
            t,
            point: self.placement.point_to_world(local.at(t)),
            normal: self.placement.normal_to_world(self.normal),
            material: self.material.as_ref(),
        })
    }
}
