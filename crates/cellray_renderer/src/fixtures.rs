//! Shared scenes and rays for unit tests.

use cellray_core::{
    rgb, Attenuation, DirectionalLight, Material, Plane, PointLight, Scene, Sphere, Triangle,
};
use cellray_math::{Mat4, Quat, Ray, Vec3};

/// A loose cluster of shaded spheres and triangles spanning several cells,
/// a mirror-ish ground plane and two lights.
pub(crate) fn cluster_scene() -> Scene {
    let mut scene = Scene::new();
    for i in 0..4 {
        for j in 0..3 {
            let c = Vec3::new(i as f32 * 2.3 - 3.0, j as f32 * 1.7 - 1.5, (i + j) as f32 * 0.9);
            let material = Material::diffuse(rgb(0.2 * i as f32, 0.3 * j as f32, 0.5))
                .with_specular(rgb(0.2, 0.2, 0.2), 16.0);
            scene.add(Sphere::new(c, 0.4 + 0.1 * j as f32).with_material(material));
        }
    }
    scene.add(
        Sphere::new(Vec3::ZERO, 1.0)
            .with_transform(Mat4::from_scale_rotation_translation(
                Vec3::new(2.0, 0.5, 1.0),
                Quat::from_rotation_z(0.3),
                Vec3::new(0.5, 3.0, 2.0),
            ))
            .with_material(Material::diffuse(rgb(0.9, 0.6, 0.1))),
    );
    scene.add(
        Triangle::new(
            Vec3::new(-4.0, -3.0, 6.0),
            Vec3::new(4.0, -3.0, 6.0),
            Vec3::new(0.0, 4.0, 6.0),
        )
        .with_material(Material::diffuse(rgb(0.7, 0.7, 0.7))),
    );
    scene.add(
        Triangle::new(
            Vec3::new(-2.0, -2.0, -1.0),
            Vec3::new(-1.0, -2.0, -1.0),
            Vec3::new(-1.5, -1.0, -1.0),
        )
        .with_material(Material::default().with_emission(rgb(0.4, 0.0, 0.4))),
    );
    scene.add(
        Plane::new(Vec3::Y, Vec3::new(0.0, -5.0, 0.0)).with_material(
            Material::diffuse(rgb(0.3, 0.3, 0.3)).with_specular(rgb(0.5, 0.5, 0.5), 4.0),
        ),
    );

    scene.add_directional_light(DirectionalLight::new(
        Vec3::new(-1.0, 2.0, -1.5),
        rgb(0.8, 0.8, 0.7),
    ));
    scene.add_point_light(PointLight::new(
        Vec3::new(2.0, 6.0, -3.0),
        Attenuation::new(1.0, 0.05, 0.01),
        rgb(1.0, 0.9, 0.8),
    ));
    scene
}

/// Deterministic spread of rays from a few origins around the cluster.
pub(crate) fn ray_fan() -> Vec<Ray> {
    let origins = [
        Vec3::new(0.0, 0.0, -10.0),
        Vec3::new(7.0, 5.0, -6.0),
        Vec3::new(-8.0, 1.0, 3.0),
        Vec3::new(0.3, 0.2, 2.0),
    ];

    let mut rays = Vec::new();
    for origin in origins {
        for i in 0..24 {
            for j in 0..12 {
                let theta = std::f32::consts::TAU * i as f32 / 24.0 + 0.01;
                let phi = std::f32::consts::PI * (j as f32 + 0.5) / 12.0;
                let dir = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
                rays.push(Ray::new(origin, dir));
            }
        }
        rays.push(Ray::new(origin, (Vec3::new(0.0, 0.0, 2.0) - origin).normalize()));
        rays.push(Ray::new(origin, Vec3::Z));
        rays.push(Ray::new(origin, Vec3::X));
    }
    rays
}
