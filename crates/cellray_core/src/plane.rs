//! Infinite plane primitive.

use cellray_math::{Mat4, Ray, Vec3, EPSILON};

use crate::{Material, Placement, RayHit};

/// A single-sided infinite plane through `point` facing along `normal`.
///
/// Planes have no finite bounds and are never stored in a cell structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    normal: Vec3,
    point: Vec3,
    pub(crate) placement: Placement,
    pub(crate) material: Option<Material>,
}

impl Plane {
    /// Create a plane from a normal (normalized here) and a point on it.
    pub fn new(normal: Vec3, point: Vec3) -> Self {
        Self {
            normal: normal.normalize_or_zero(),
            point,
            placement: Placement::default(),
            material: None,
        }
    }

    /// Attach a material.
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    /// Set the object-to-world matrix.
    pub fn with_transform(mut self, world: Mat4) -> Self {
        self.placement = Placement::new(world);
        self
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn point(&self) -> Vec3 {
        self.point
    }

    /// Signed-distance intersection. Rays parallel to the plane or leaving
    /// its front face miss.
    pub fn intersect(&self, ray: &Ray) -> Option<RayHit<'_>> {
        let local = self.placement.to_object(ray)?;

        let denom = local.direction.dot(self.normal);
        if denom > -EPSILON {
            return None;
        }

        let t = (self.point - local.origin).dot(self.normal) / denom;
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
