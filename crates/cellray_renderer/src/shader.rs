//! Recursive Whitted-style shading.
//!
//! Each hit gets its material's ambient and emission, plus a Blinn-Phong
//! diffuse and specular term for every light that the surface faces and
//! that a shadow ray can reach. Mirror reflections are traced recursively
//! and weighted by the material's specular colour.

use cellray_core::{Colour, Material, RayHit, Scene};
use cellray_math::{Ray, Vec3};
use serde::{Deserialize, Serialize};

use crate::{trace_ray, Grid};

/// Flat colour for hits on primitives that carry no material.
const FALLBACK_AMBIENT: Colour = Colour::new(0.1, 0.1, 0.1, 1.0);

/// Debug colour for occluded lights in [`ShadingMode::Shadows`].
const SHADOW_DEBUG: Colour = Colour::new(1.0, 0.0, 0.0, 1.0);

/// What the shader outputs for a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadingMode {
    /// Full shading
    #[default]
    Standard,
    /// World normal mapped to `(n + 1) / 2`
    Normals,
    /// Standard shading, but any light that is blocked paints the hit red
    Shadows,
}

/// Recursive shading parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shader {
    /// Deepest reflection level that is still shaded
    pub max_depth: u32,
    pub mode: ShadingMode,
    /// Offset along the normal for shadow ray origins
    pub shadow_bias: f32,
    /// Offset along the normal for reflection ray origins
    pub reflection_bias: f32,
}

impl Default for Shader {
    fn default() -> Self {
        Self {
            max_depth: 5,
            mode: ShadingMode::Standard,
            shadow_bias: 1e-4,
            reflection_bias: 1e-4,
        }
    }
}

/// A light as seen from one surface point.
struct LightSample {
    /// Unit direction from the surface towards the light
    direction: Vec3,
    /// Distance to the light, infinite for directional lights
    distance: f32,
    /// Colour already scaled by intensity and falloff
    radiance: Colour,
}

impl Shader {
    pub fn new(max_depth: u32, mode: ShadingMode) -> Self {
        Self {
            max_depth,
            mode,
            ..Default::default()
        }
    }

    /// Colour seen along `ray` at recursion level `depth`.
    ///
    /// Levels above `max_depth` return transparent black; no reflection is
    /// traced from `max_depth` itself. Every channel of the result is
    /// clamped to `[0, 1]`.
    pub fn shade(&self, scene: &Scene, grid: &Grid, ray: &Ray, depth: u32) -> Colour {
        if depth > self.max_depth {
            return Colour::ZERO;
        }

        let Some(hit) = trace_ray(scene, grid, ray) else {
            return Colour::ZERO;
        };

        let colour = match (self.mode, hit.material) {
            (ShadingMode::Normals, _) => ((hit.normal + Vec3::ONE) * 0.5).extend(1.0),
            (_, None) => FALLBACK_AMBIENT,
            (_, Some(material)) => self.shade_hit(scene, grid, ray, &hit, material, depth),
        };

        colour.clamp(Colour::ZERO, Colour::ONE)
    }

    fn shade_hit(
        &self,
        scene: &Scene,
        grid: &Grid,
        ray: &Ray,
        hit: &RayHit<'_>,
        material: &Material,
        depth: u32,
    ) -> Colour {
        let mut colour = material.ambient + material.emission;

        let to_eye = (ray.origin - hit.point).normalize_or_zero();
        let reflection = Ray::new(
            hit.point + hit.normal * self.reflection_bias,
            ray.direction - 2.0 * hit.normal * ray.direction.dot(hit.normal),
        );
        let recurse = depth < self.max_depth && material.is_reflective();

        for light in self.light_samples(scene, hit.point) {
            let visible = self.is_visible(scene, grid, hit, &light);

            if self.mode == ShadingMode::Shadows && !visible {
                colour = SHADOW_DEBUG;
                continue;
            }

            let n_dot_l = hit.normal.dot(light.direction);
            if n_dot_l <= 0.0 {
                continue;
            }

            if visible {
                let h = (light.direction + to_eye).normalize_or_zero();
                let n_dot_h = hit.normal.dot(h).max(0.0);
                let specular = material.specular * n_dot_h.powf(material.shininess);
                colour += light.radiance * (material.diffuse * n_dot_l + specular);
            }

            // Reflections do not depend on the shadow test.
            if recurse {
                colour += self.shade(scene, grid, &reflection, depth + 1) * material.specular;
            }
        }

        colour
    }

    /// Directional lights first, then point lights.
    fn light_samples<'a>(
        &'a self,
        scene: &'a Scene,
        point: Vec3,
    ) -> impl Iterator<Item = LightSample> + 'a {
        let directional = scene.directional_lights.iter().map(|light| LightSample {
            direction: light.to_light(),
            distance: f32::INFINITY,
            radiance: light.colour * light.colour.w,
        });

        let points = scene.point_lights.iter().map(move |light| {
            let offset = light.position - point;
            let distance = offset.length();
            LightSample {
                direction: offset.normalize_or_zero(),
                distance,
                radiance: light.colour * light.colour.w / light.attenuation.factor(distance),
            }
        });

        directional.chain(points)
    }

    /// True if nothing blocks the path from the biased hit point to the light.
    fn is_visible(
        &self,
        scene: &Scene,
        grid: &Grid,
        hit: &RayHit<'_>,
        light: &LightSample,
    ) -> bool {
        let shadow_ray = Ray::new(hit.point + hit.normal * self.shadow_bias, light.direction);
        match trace_ray(scene, grid, &shadow_ray) {
            None => true,
            Some(blocker) => blocker.t > light.distance + self.shadow_bias,
        }
    }
}
