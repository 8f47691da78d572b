// Transform utilities for Mat4
//
// Extends glam::Mat4 with the helpers the object-space intersection code
// needs. glam already provides transform_point3() and transform_vector3().

use glam::{Mat4, Vec3};
use crate::{Aabb, Ray};

/// Determinant magnitude below which a matrix is treated as singular.
const SINGULAR_DETERMINANT: f32 = 1e-12;

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Inverse of the matrix, or `None` when it is singular (degenerate scale).
    fn checked_inverse(&self) -> Option<Mat4>;

    /// Transform a ray: origin as a point (w=1), direction as a vector (w=0).
    /// The direction is not renormalized, so ray parameters are preserved.
    fn transform_ray(&self, ray: &Ray) -> Ray;

    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn checked_inverse(&self) -> Option<Mat4> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_DETERMINANT {
            return None;
        }
        Some(self.inverse())
    }

    fn transform_ray(&self, ray: &Ray) -> Ray {
        Ray::new(
            self.transform_point3(ray.origin),
            self.transform_vector3(ray.direction),
        )
    }

    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        if aabb.is_empty() {
            return Aabb::EMPTY;
        }

        let min_point = aabb.min();
        let max_point = aabb.max();

        let corners = [
            Vec3::new(min_point.x, min_point.y, min_point.z),
            Vec3::new(max_point.x, min_point.y, min_point.z),
            Vec3::new(min_point.x, max_point.y, min_point.z),
            Vec3::new(max_point.x, max_point.y, min_point.z),
            Vec3::new(min_point.x, min_point.y, max_point.z),
            Vec3::new(max_point.x, min_point.y, max_point.z),
            Vec3::new(min_point.x, max_point.y, max_point.z),
            Vec3::new(max_point.x, max_point.y, max_point.z),
        ];

        Aabb::enclosing(corners.iter().map(|&corner| self.transform_point3(corner)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_inverse_identity_and_translation() {
        assert_eq!(Mat4::IDENTITY.checked_inverse(), Some(Mat4::IDENTITY));

        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        let inv = mat.checked_inverse().expect("translation is invertible");
        let point = Vec3::new(1.0, 2.0, 3.0);
        let back = inv.transform_point3(mat.transform_point3(point));
        assert!((back - point).length() < 0.001);
    }

    #[test]
    fn test_checked_inverse_rejects_zero_scale() {
        let flat = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        assert!(flat.checked_inverse().is_none());
    }

    #[test]
    fn test_transform_ray_preserves_parameter() {
        let mat = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            glam::Quat::from_rotation_y(0.3),
            Vec3::new(1.0, -2.0, 0.5),
        );
        let ray = Ray::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(0.0, 1.0, 1.0));
        let moved = mat.transform_ray(&ray);

        // A point at parameter t maps to the transformed ray at the same t.
        let expected = mat.transform_point3(ray.at(2.5));
        assert!((moved.at(2.5) - expected).length() < 1e-4);
    }

    #[test]
    fn test_transform_ray_ignores_translation_for_direction() {
        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let moved = mat.transform_ray(&ray);

        assert_eq!(moved.origin, Vec3::new(10.0, 20.0, 30.0));
        assert_eq!(moved.direction, Vec3::X);
    }

    #[test]
    fn test_transform_aabb_translation() {
        let mat = Mat4::from_translation(Vec3::new(5.0, 5.0, 5.0));
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let transformed = mat.transform_aabb(&aabb);

        assert!((transformed.min() - Vec3::splat(5.0)).length() < 0.001);
        assert!((transformed.max() - Vec3::splat(6.0)).length() < 0.001);
    }

    #[test]
    fn test_transform_aabb_rotation_grows_box() {
        let mat = Mat4::from_rotation_z(std::f32::consts::FRAC_PI_4);
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let transformed = mat.transform_aabb(&aabb);

        let half_diagonal = 2.0_f32.sqrt();
        assert!((transformed.x.max - half_diagonal).abs() < 1e-4);
        assert!((transformed.z.max - 1.0).abs() < 1e-4);
    }
}
