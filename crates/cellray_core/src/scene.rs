//! Scene storage.
//!
//! The scene owns every primitive in a single arena and hands out
//! [`PrimitiveId`] handles. Acceleration structures store handles rather than
//! references, so they never outlive or alias the storage they index.

use cellray_math::{Aabb, Ray};

use crate::{DirectionalLight, Plane, PointLight, Primitive, PrimitiveId, RayHit, Sphere, Triangle};

/// Geometry and lights of a static scene.
///
/// Built once (usually by the scene loader) and read-only while rendering.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Primitive arena, indexed by `PrimitiveId`
    primitives: Vec<Primitive>,

    /// Handles of primitives without finite bounds (planes)
    unbounded: Vec<PrimitiveId>,

    pub directional_lights: Vec<DirectionalLight>,
    pub point_lights: Vec<PointLight>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a primitive and return its handle.
    pub fn add(&mut self, primitive: impl Into<Primitive>) -> PrimitiveId {
        let primitive = primitive.into();
        let id = PrimitiveId(self.primitives.len() as u32);
        if !primitive.is_bounded() {
            self.unbounded.push(id);
        }
        self.primitives.push(primitive);
        id
    }

    pub fn add_directional_light(&mut self, light: DirectionalLight) {
        self.directional_lights.push(light);
    }

    pub fn add_point_light(&mut self, light: PointLight) {
        self.point_lights.push(light);
    }

    /// Look up a primitive by handle.
    #[inline]
    pub fn primitive(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(id.index())
    }

    /// All primitives with their handles.
    pub fn primitives(&self) -> impl Iterator<Item = (PrimitiveId, &Primitive)> + '_ {
        self.primitives
            .iter()
            .enumerate()
            .map(|(i, p)| (PrimitiveId(i as u32), p))
    }

    /// Primitives with finite bounds, paired with their world-space bounds.
    pub fn bounded(&self) -> impl Iterator<Item = (PrimitiveId, Aabb)> + '_ {
        self.primitives()
            .filter_map(|(id, p)| p.bounds().map(|b| (id, b)))
    }

    /// Handles of primitives without finite bounds.
    pub fn unbounded(&self) -> &[PrimitiveId] {
        &self.unbounded
    }

    pub fn spheres(&self) -> impl Iterator<Item = &Sphere> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Sphere(s) => Some(s),
            _ => None,
        })
    }

    pub fn triangles(&self) -> impl Iterator<Item = &Triangle> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Triangle(t) => Some(t),
            _ => None,
        })
    }

    pub fn planes(&self) -> impl Iterator<Item = &Plane> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Plane(p) => Some(p),
            _ => None,
        })
    }

    /// Total primitive count.
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    /// True if the scene holds no primitives.
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Total light count.
    pub fn light_count(&self) -> usize {
        self.directional_lights.len() + self.point_lights.len()
    }

    /// Union of the world bounds of every bounded primitive, or `EMPTY`.
    pub fn world_bounds(&self) -> Aabb {
        self.bounded()
            .fold(Aabb::EMPTY, |acc, (_, b)| Aabb::surrounding(&acc, &b))
    }

    /// Nearest hit found by testing every primitive. Used as the reference
    /// result for accelerated traversal.
    pub fn intersect_brute_force(&self, ray: &Ray) -> Option<RayHit<'_>> {
        let mut best: Option<RayHit<'_>> = None;
        let mut nearest = f32::INFINITY;

        for primitive in &self.primitives {
            if let Some(hit) = primitive.intersect(ray) {
                if hit.is_nearer_than(nearest) {
                    nearest = hit.t;
                    best = Some(hit);
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellray_math::Vec3;

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add(Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0));
        scene.add(Plane::new(Vec3::Y, Vec3::new(0.0, -1.0, 0.0)));
        scene.add(Triangle::new(
            Vec3::new(-1.0, -1.0, 2.0),
            Vec3::new(0.0, 1.0, 2.0),
            Vec3::new(1.0, -1.0, 2.0),
        ));
        scene
    }

    #[test]
    fn test_scene_handles_are_stable() {
        let scene = sample_scene();

        assert_eq!(scene.primitive_count(), 3);
        assert_eq!(scene.unbounded().len(), 1);
        assert_eq!(scene.bounded().count(), 2);
        assert!(matches!(
            scene.primitive(scene.unbounded()[0]),
            Some(Primitive::Plane(_))
        ));
        assert_eq!(scene.spheres().count(), 1);
        assert_eq!(scene.triangles().count(), 1);
        assert_eq!(scene.planes().count(), 1);
    }

    #[test]
    fn test_world_bounds_ignore_planes() {
        let bounds = sample_scene().world_bounds();

        assert_eq!(bounds.min(), Vec3::new(-1.0, -1.0, 2.0));
        assert_eq!(bounds.max(), Vec3::new(1.0, 1.0, 6.0));
        assert!(Scene::new().world_bounds().is_empty());
    }

    #[test]
    fn test_brute_force_picks_nearest() {
        let scene = sample_scene();

        // Triangle at z = 2 in front of the sphere at z = 4..6.
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let hit = scene.intersect_brute_force(&ray).expect("should hit");
        assert!((hit.t - 2.0).abs() < 1e-5);

        // Straight down only the plane is hit.
        let ray = Ray::new(Vec3::ZERO, -Vec3::Y);
        let hit = scene.intersect_brute_force(&ray).expect("should hit");
        assert!((hit.t - 1.0).abs() < 1e-5);

        assert!(Scene::new().intersect_brute_force(&ray).is_none());
    }
}
