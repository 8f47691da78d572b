//! Sphere primitive for ray tracing.

use cellray_math::{Aabb, Mat4, Ray, Vec3};

use crate::{Material, Placement, RayHit};

/// A sphere primitive, defined in object space.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    pub(crate) placement: Placement,
    pub(crate) material: Option<Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere with an identity world transform and no material.
    pub fn new(center: Vec3, radius: f32) -> Self {
        let mut sphere = Self {
            center,
            radius: radius.max(0.0),
            placement: Placement::default(),
            material: None,
            bbox: Aabb::EMPTY,
        };
        sphere.update_bounds();
        sphere
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

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// World-space bounding box.
    pub fn bounds(&self) -> Aabb {
        self.bbox
    }

    fn update_bounds(&mut self) {
        let rvec = Vec3::splat(self.radius);
        let local = Aabb::from_points(self.center - rvec, self.center + rvec);
        self.bbox = self.placement.bounds_to_world(&local);
    }

    /// Solve `a t² + b t + c = 0` in object space and keep the smaller
    /// positive root.
    pub fn intersect(&self, ray: &Ray) -> Option<RayHit<'_>> {
        let local = self.placement.to_object(ray)?;

        let to_center = self.center - local.origin;
        let a = local.direction.dot(local.direction);
        let b = -2.0 * local.direction.dot(to_center);
        let c = to_center.dot(to_center) - self.radius * self.radius;

        if a == 0.0 {
            return None;
        }

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let near = (-b - sqrtd) / (2.0 * a);
        let far = (-b + sqrtd) / (2.0 * a);

        let t = if near > 0.0 {
            near
        } else if far > 0.0 {
            far
        } else {
            return None;
        };

        let local_point = local.at(t);
        Some(RayHit {
            t,
            point: self.placement.point_to_world(local_point),
            normal: self.placement.normal_to_world((local_point - self.center).normalize()),
            material: self.material.as_ref(),
        })
    }
}
