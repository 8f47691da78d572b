//! Pinhole camera for primary ray generation.

use cellray_math::{Ray, Vec3};

/// Pixel dimensions of the image the camera projects onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height. Zero-height viewports report 1.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Camera described by eye position, target, up vector and vertical field of
/// view in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    look_from: Vec3,
    look_at: Vec3,
    up: Vec3,
    fovy: f32,

    // Orthonormal basis, `w` points backwards (from target to eye)
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Default for Camera {
    /// Camera at the origin looking down -Z with a 90° field of view.
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, 90.0)
    }
}

impl Camera {
    /// Create a camera and compute its basis.
    pub fn new(look_from: Vec3, look_at: Vec3, up: Vec3, fovy: f32) -> Self {
        let w = (look_from - look_at).normalize_or_zero();
        let u = up.cross(w).normalize_or_zero();
        let v = w.cross(u);

        Self {
            look_from,
            look_at,
            up,
            fovy,
            u,
            v,
            w,
        }
    }

    pub fn look_from(&self) -> Vec3 {
        self.look_from
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Vertical field of view in degrees.
    pub fn fovy(&self) -> f32 {
        self.fovy
    }

    /// Ray through the centre of pixel `(x, y)`. Row 0 is the top of the
    /// image. The returned direction is unit length.
    pub fn gen_ray(&self, viewport: Viewport, x: u32, y: u32) -> Ray {
        let half_w = viewport.width.max(1) as f32 * 0.5;
        let half_h = viewport.height.max(1) as f32 * 0.5;

        let tan_y = (self.fovy.to_radians() * 0.5).tan();
        let tan_x = tan_y * viewport.aspect_ratio();

        let alpha = tan_x * ((x as f32 + 0.5) - half_w) / half_w;
        let beta = tan_y * (half_h - (y as f32 + 0.5)) / half_h;

        let direction = (alpha * self.u + beta * self.v - self.w).normalize_or_zero();
        Ray::new(self.look_from, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centre_ray_points_at_target() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO, Vec3::Y, 45.0);
        let ray = camera.gen_ray(Viewport::new(101, 101), 50, 50);

        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, -5.0));
        assert!((ray.direction - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_ray_directions_are_unit_length() {
        let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y, 60.0);
        let viewport = Viewport::new(40, 30);
        for (x, y) in [(0, 0), (39, 0), (0, 29), (39, 29), (17, 11)] {
            let ray = camera.gen_ray(viewport, x, y);
            assert!((ray.direction.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_corners_span_field_of_view() {
        // 90° vertical fov: the top edge is 45° above the view axis.
        let camera = Camera::default();
        let viewport = Viewport::new(2, 2);

        let top_left = camera.gen_ray(viewport, 0, 0).direction;
        let bottom_right = camera.gen_ray(viewport, 1, 1).direction;

        assert!(top_left.y > 0.0 && top_left.x < 0.0);
        assert!(bottom_right.y < 0.0 && bottom_right.x > 0.0);
        // Pixel centres sit half way to the edge: tan = 0.5.
        let expected = Vec3::new(-0.5, 0.5, -1.0).normalize();
        assert!((top_left - expected).length() < 1e-5);
    }

    #[test]
    fn test_viewport_aspect() {
        assert_eq!(Viewport::new(200, 100).aspect_ratio(), 2.0);
        assert_eq!(Viewport::new(200, 0).aspect_ratio(), 1.0);
    }
}
