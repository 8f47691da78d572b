//! Simple ray tracer example.
//!
//! Renders a built-in scene with spheres, a triangle and a ground plane and
//! saves it as PNG.

use cellray_core::{
    rgb, Attenuation, Camera, DirectionalLight, ImageBuffer, Material, Plane, PointLight,
    RenderData, Scene, Sphere, Triangle,
};
use cellray_math::{Mat4, Vec3};
use cellray_renderer::{RayTracer, RenderSettings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    println!("cellray - Simple Example");
    println!("=======================");

    let start = std::time::Instant::now();
    let data = RenderData {
        width: 800,
        height: 450,
        max_depth: 4,
        output_name: Some("render_spheres.png".to_string()),
        camera: Camera::new(
            Vec3::new(0.0, 2.5, -9.0), // look_from
            Vec3::new(0.0, 0.5, 0.0),  // look_at
            Vec3::Y,                   // up
            40.0,
        ),
        scene: build_scene(),
    };
    println!("Scene built in {:?}", start.elapsed());

    let tracer = RayTracer::new(RenderSettings::default());
    let mut image = ImageBuffer::new(data.width, data.height);
    let stats = tracer.render(&data, &mut image)?;

    println!(
        "Rendered {} tiles in {:?} (grid {:?})",
        stats.tiles, stats.render, stats.grid_build
    );

    let filename = data.output_name.as_deref().unwrap_or("output.png");
    image.save_png(filename, 2.2)?;
    println!("Saved to {}", filename);
    Ok(())
}

fn build_scene() -> Scene {
    let mut scene = Scene::new();

    // Ground
    scene.add(
        Plane::new(Vec3::Y, Vec3::new(0.0, -1.0, 0.0)).with_material(
            Material::diffuse(rgb(0.4, 0.4, 0.45)).with_specular(rgb(0.2, 0.2, 0.2), 8.0),
        ),
    );

    // Three main spheres
    scene.add(
        Sphere::new(Vec3::new(0.0, 0.5, 0.0), 1.5).with_material(
            Material::diffuse(rgb(0.1, 0.1, 0.1)).with_specular(rgb(0.8, 0.8, 0.8), 64.0),
        ),
    );
    scene.add(
        Sphere::new(Vec3::new(-3.2, 0.0, 0.5), 1.0).with_material(
            Material::diffuse(rgb(0.8, 0.3, 0.2)).with_specular(rgb(0.3, 0.3, 0.3), 20.0),
        ),
    );
    scene.add(
        Sphere::new(Vec3::ZERO, 1.0)
            .with_transform(
                Mat4::from_translation(Vec3::new(3.2, 0.0, 0.5))
                    * Mat4::from_scale(Vec3::new(1.0, 0.6, 1.0)),
            )
            .with_material(Material::diffuse(rgb(0.2, 0.5, 0.8))),
    );

    // A row of small emissive spheres
    for i in 0..7 {
        let x = i as f32 * 1.2 - 3.6;
        let glow = rgb(0.1 * i as f32, 0.3, 0.6 - 0.08 * i as f32);
        scene.add(
            Sphere::new(Vec3::new(x, -0.7, -2.5), 0.3)
                .with_material(Material::default().with_emission(glow)),
        );
    }

    // Backdrop triangle
    scene.add(
        Triangle::new(
            Vec3::new(-6.0, -1.0, 6.0),
            Vec3::new(0.0, 6.0, 6.0),
            Vec3::new(6.0, -1.0, 6.0),
        )
        .with_material(Material::diffuse(rgb(0.6, 0.6, 0.5))),
    );

    scene.add_directional_light(DirectionalLight::new(
        Vec3::new(-1.0, 1.5, -1.0),
        rgb(0.7, 0.7, 0.7),
    ));
    scene.add_point_light(PointLight::new(
        Vec3::new(2.0, 4.0, -3.0),
        Attenuation::new(1.0, 0.1, 0.0),
        rgb(1.0, 0.95, 0.8),
    ));

    scene
}
