//! Closed set of renderable primitives and their shared world placement.
//!
//! Every primitive is defined in object space and carries its own world
//! matrix. Intersection transforms the incoming ray into object space with
//! the pre-computed inverse, solves there, and maps the hit point and normal
//! back to world space (normals through the inverse-transpose).

use cellray_math::{Aabb, Mat4, Mat4Ext, Ray, Vec3};

use crate::{Material, Plane, RayHit, Sphere, Triangle};

/// World transform of a primitive with its cached inverse.
///
/// A singular world matrix has no inverse; such a primitive is never hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    world: Mat4,
    inverse: Option<Mat4>,
    normal_matrix: Mat4,
}

impl Default for Placement {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY)
    }
}

impl Placement {
    /// Create a placement from a world matrix.
    pub fn new(world: Mat4) -> Self {
        let inverse = world.checked_inverse();
        let normal_matrix = inverse.map(|inv| inv.transpose()).unwrap_or(Mat4::ZERO);
        Self {
            world,
            inverse,
            normal_matrix,
        }
    }

    /// The object-to-world matrix.
    pub fn world(&self) -> Mat4 {
        self.world
    }

    /// True if the world matrix could be inverted.
    pub fn is_invertible(&self) -> bool {
        self.inverse.is_some()
    }

    /// Map a world-space ray into object space. `None` for a singular world
    /// matrix. The ray parameter is preserved by the mapping.
    #[inline]
    pub fn to_object(&self, ray: &Ray) -> Option<Ray> {
        self.inverse.map(|inv| inv.transform_ray(ray))
    }

    /// Map an object-space point to world space.
    #[inline]
    pub fn point_to_world(&self, p: Vec3) -> Vec3 {
        self.world.transform_point3(p)
    }

    /// Map an object-space normal to a unit world-space normal.
    #[inline]
    pub fn normal_to_world(&self, n: Vec3) -> Vec3 {
        self.normal_matrix.transform_vector3(n).normalize()
    }

    /// World-space bounds of an object-space box.
    pub fn bounds_to_world(&self, bounds: &Aabb) -> Aabb {
        self.world.transform_aabb(bounds)
    }
}

/// Stable handle to a primitive stored in a [`crate::Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrimitiveId(pub(crate) u32);

impl PrimitiveId {
    /// Position of the primitive in the scene arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A renderable primitive.
///
/// Dispatch is a `match` over the closed variant list, so the per-ray loop
/// never goes through a vtable.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Sphere(Sphere),
    Triangle(Triangle),
    Plane(Plane),
}

impl Primitive {
    /// Intersect a world-space ray with this primitive.
    #[inline]
    pub fn intersect(&self, ray: &Ray) -> Option<RayHit<'_>> {
        match self {
            Primitive::Sphere(s) => s.intersect(ray),
            Primitive::Triangle(t) => t.intersect(ray),
            Primitive::Plane(p) => p.intersect(ray),
        }
    }

    /// World-space bounds, or `None` for unbounded primitives (planes).
    #[inline]
    pub fn bounds(&self) -> Option<Aabb> {
        match self {
            Primitive::Sphere(s) => Some(s.bounds()),
            Primitive::Triangle(t) => Some(t.bounds()),
            Primitive::Plane(_) => None,
        }
    }

    /// True for primitives that can be inserted into a cell structure.
    #[inline]
    pub fn is_bounded(&self) -> bool {
        !matches!(self, Primitive::Plane(_))
    }

    /// The material attached to this primitive, if any.
    pub fn material(&self) -> Option<&Material> {
        match self {
            Primitive::Sphere(s) => s.material.as_ref(),
            Primitive::Triangle(t) => t.material.as_ref(),
            Primitive::Plane(p) => p.material.as_ref(),
        }
    }

    /// The primitive's object-to-world matrix.
    pub fn world_transform(&self) -> Mat4 {
        self.placement().world()
    }

    fn placement(&self) -> &Placement {
        match self {
            Primitive::Sphere(s) => &s.placement,
            Primitive::Triangle(t) => &t.placement,
            Primitive::Plane(p) => &p.placement,
        }
    }
}

impl From<Sphere> for Primitive {
    fn from(s: Sphere) -> Self {
        Primitive::Sphere(s)
    }
}

impl From<Triangle> for Primitive {
    fn from(t: Triangle) -> Self {
        Primitive::Triangle(t)
    }
}

impl From<Plane> for Primitive {
    fn from(p: Plane) -> Self {
        Primitive::Plane(p)
    }
}
