//! Ray/primitive intersection record.

use cellray_math::Vec3;

use crate::Material;

/// Result of intersecting a ray with a primitive.
///
/// `t` starts at +infinity ("no hit"). A hit is only valid when `t` is finite
/// and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit<'a> {
    /// Ray parameter of the intersection
    pub t: f32,
    /// World-space hit point
    pub point: Vec3,
    /// World-space shading normal (unit length)
    pub normal: Vec3,
    /// Material of the primitive that was hit
    pub material: Option<&'a Material>,
}

impl Default for RayHit<'_> {
    fn default() -> Self {
        Self {
            t: f32::INFINITY,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            material: None,
        }
    }
}

impl<'a> RayHit<'a> {
    /// True if this record describes a real intersection in front of the origin.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.t.is_finite() && self.t > 0.0
    }

    /// True if `self` is valid and strictly nearer than `nearest`.
    #[inline]
    pub fn is_nearer_than(&self, nearest: f32) -> bool {
        self.is_valid() && self.t < nearest
    }
}
