//! Multi-threaded tile renderer.
//!
//! The image is split into buckets that are pushed onto a shared
//! [`WorkStack`]. `num_threads - 1` scoped worker threads plus the calling
//! thread pop buckets until the stack is empty. Every pixel belongs to
//! exactly one bucket, so the finished image does not depend on which thread
//! rendered what.

use std::time::{Duration, Instant};

use cellray_core::{Camera, Colour, ImageBuffer, RenderData, Scene, Viewport};
use thiserror::Error;

use crate::{
    generate_buckets, render_bucket, Bucket, BucketResult, Grid, RenderSettings, Shader, WorkStack,
};

/// Errors that can stop a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to spawn render worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Render worker {0} panicked")]
    WorkerPanicked(usize),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Timings and work distribution of a finished render.
#[derive(Debug, Clone, Default)]
pub struct RenderStats {
    pub grid_build: Duration,
    pub render: Duration,
    /// Total number of buckets
    pub tiles: usize,
    /// Buckets rendered by each worker; index 0 is the calling thread
    pub tiles_per_worker: Vec<usize>,
}

/// Everything needed to shade one pixel. Shared read-only by all workers.
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    pub scene: &'a Scene,
    pub grid: &'a Grid,
    pub camera: &'a Camera,
    pub viewport: Viewport,
    pub shader: &'a Shader,
}

impl Frame<'_> {
    /// Colour of pixel `(x, y)`: opaque black plus the shaded primary ray,
    /// clamped, with alpha forced to 1.
    pub fn render_pixel(&self, x: u32, y: u32) -> Colour {
        let ray = self.camera.gen_ray(self.viewport, x, y);
        let shaded = self.shader.shade(self.scene, self.grid, &ray, 0);
        let colour = Colour::new(0.0, 0.0, 0.0, 1.0) + shaded;
        colour.clamp(Colour::ZERO, Colour::ONE).truncate().extend(1.0)
    }
}

/// Tile-parallel Whitted ray tracer.
#[derive(Debug, Clone)]
pub struct RayTracer {
    settings: RenderSettings,
}

impl RayTracer {
    /// Create a renderer. Zero thread, grid or block counts are raised to 1.
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings: settings.sanitized(),
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Build the acceleration grid for `scene` with the configured
    /// dimensions and traversal.
    pub fn build_grid(&self, scene: &Scene) -> Grid {
        Grid::build(scene, self.settings.grid_dim).with_traversal(self.settings.traversal)
    }

    /// Shader for a scene with the given maximum reflection depth.
    pub fn shader(&self, max_depth: u32) -> Shader {
        Shader {
            max_depth,
            mode: self.settings.shading_mode,
            shadow_bias: self.settings.shadow_bias,
            reflection_bias: self.settings.reflection_bias,
        }
    }

    /// Render `data` into `image`. The image's size is the viewport.
    pub fn render(&self, data: &RenderData, image: &mut ImageBuffer) -> RenderResult<RenderStats> {
        let mut stats = RenderStats::default();

        let start = Instant::now();
        let grid = self.build_grid(&data.scene);
        stats.grid_build = start.elapsed();
        log::info!("Built acceleration grid in {:.2?}", stats.grid_build);

        let shader = self.shader(data.max_depth);
        let frame = Frame {
            scene: &data.scene,
            grid: &grid,
            camera: &data.camera,
            viewport: Viewport::new(image.width, image.height),
            shader: &shader,
        };

        let [block_w, block_h] = self.settings.block_dim;
        let buckets = generate_buckets(image.width, image.height, block_w, block_h);
        stats.tiles = buckets.len();

        // Reversed so the centre bucket is on top.
        let stack: WorkStack<Bucket> = buckets.into_iter().rev().collect();

        let threads = self.settings.num_threads;
        log::info!(
            "Rendering {}x{} on {} threads ({} tiles of {}x{})",
            image.width,
            image.height,
            threads,
            stats.tiles,
            block_w,
            block_h
        );

        let start = Instant::now();
        let per_worker = run_workers(threads, &frame, &stack)?;
        stats.render = start.elapsed();

        for (worker, results) in per_worker.iter().enumerate() {
            log::debug!("Worker {} rendered {} tiles", worker, results.len());
        }
        stats.tiles_per_worker = per_worker.iter().map(Vec::len).collect();

        for result in per_worker.into_iter().flatten() {
            let b = result.bucket;
            image.blit(b.x, b.y, b.width, &result.pixels);
        }

        log::info!("Finished render in {:.2?}", stats.render);
        Ok(stats)
    }
}

/// Pop buckets until the stack is empty.
fn worker_loop(frame: &Frame<'_>, stack: &WorkStack<Bucket>) -> Vec<BucketResult> {
    let mut done = Vec::new();
    while let Some(bucket) = stack.pop() {
        done.push(render_bucket(&bucket, |x, y| frame.render_pixel(x, y)));
    }
    done
}

/// Run `threads - 1` scoped workers plus the calling thread and gather what
/// each rendered. Every spawned worker is joined before returning.
fn run_workers(
    threads: usize,
    frame: &Frame<'_>,
    stack: &WorkStack<Bucket>,
) -> RenderResult<Vec<Vec<BucketResult>>> {
    std::thread::scope(|s| {
        let mut handles = Vec::with_capacity(threads.saturating_sub(1));
        let mut spawn_error = None;
        for i in 1..threads {
            let spawned = std::thread::Builder::new()
                .name(format!("cellray-worker-{}", i))
                .spawn_scoped(s, || worker_loop(frame, stack));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    spawn_error = Some(e);
                    break;
                }
            }
        }

        // The calling thread drains the stack too, so a spawn failure still
        // leaves no bucket behind for the workers that did start.
        let mut per_worker = vec![worker_loop(frame, stack)];

        let joined: Vec<_> = handles.into_iter().map(|h| h.join()).collect();
        if let Some(e) = spawn_error {
            return Err(RenderError::Spawn(e));
        }
        for (i, result) in joined.into_iter().enumerate() {
            per_worker.push(result.map_err(|_| RenderError::WorkerPanicked(i + 1))?);
        }
        Ok(per_worker)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::cluster_scene;
    use crate::{trace_ray, ShadingMode, Traversal};
    use cellray_core::Sphere;
    use cellray_math::Vec3;

    fn settings(threads: usize, grid: [u32; 3], block: [u32; 2]) -> RenderSettings {
        RenderSettings {
            num_threads: threads,
            grid_dim: grid,
            block_dim: block,
            ..Default::default()
        }
    }

    fn cluster_data() -> RenderData {
        RenderData {
            width: 37,
            height: 23,
            max_depth: 3,
            output_name: None,
            camera: Camera::new(
                Vec3::new(0.0, 2.0, -12.0),
                Vec3::new(0.0, 0.0, 2.0),
                Vec3::Y,
                50.0,
            ),
            scene: cluster_scene(),
        }
    }

    fn render(data: &RenderData, settings: RenderSettings) -> (ImageBuffer, RenderStats) {
        let mut image = ImageBuffer::new(data.width, data.height);
        let stats = RayTracer::new(settings)
            .render(data, &mut image)
            .expect("render should succeed");
        (image, stats)
    }

    #[test]
    fn test_single_and_multi_thread_images_match() {
        let data = cluster_data();
        let (one, _) = render(&data, settings(1, [5, 5, 5], [8, 5]));
        let (eight, _) = render(&data, settings(8, [5, 5, 5], [8, 5]));

        assert_eq!(one.pixels, eight.pixels);
    }

    #[test]
    fn test_every_pixel_is_written() {
        let data = cluster_data();
        let (image, stats) = render(&data, settings(4, [3, 3, 3], [10, 7]));

        // Untouched pixels would still have alpha 0.
        assert!(image.pixels.iter().all(|c| c.w == 1.0));
        assert_eq!(stats.tiles, 4 * 4);
        assert_eq!(stats.tiles_per_worker.len(), 4);
        assert_eq!(stats.tiles_per_worker.iter().sum::<usize>(), stats.tiles);
    }

    #[test]
    fn test_grid_resolution_does_not_change_image() {
        let data = cluster_data();
        let (coarse, _) = render(&data, settings(2, [1, 1, 1], [16, 16]));
        let (fine, _) = render(&data, settings(2, [8, 8, 8], [16, 16]));

        assert_eq!(coarse.pixels, fine.pixels);
    }

    #[test]
    fn test_traversal_strategy_does_not_change_image() {
        let data = cluster_data();
        let mut dda = settings(2, [6, 4, 5], [16, 16]);
        dda.traversal = Traversal::Dda;
        let mut exhaustive = dda.clone();
        exhaustive.traversal = Traversal::Exhaustive;

        assert_eq!(render(&data, dda).0.pixels, render(&data, exhaustive).0.pixels);
    }

    #[test]
    fn test_empty_scene_is_opaque_black() {
        let data = RenderData {
            width: 9,
            height: 7,
            ..Default::default()
        };
        let (image, _) = render(&data, settings(3, [5, 5, 5], [4, 4]));

        assert!(image.pixels.iter().all(|&c| c == Colour::new(0.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_centre_pixel_hits_unit_sphere() {
        let mut data = RenderData {
            width: 101,
            height: 101,
            camera: Camera::new(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO, Vec3::Y, 45.0),
            ..Default::default()
        };
        data.scene.add(Sphere::new(Vec3::ZERO, 1.0));

        let tracer = RayTracer::new(settings(1, [5, 5, 5], [64, 64]));
        let grid = tracer.build_grid(&data.scene);
        let ray = data.camera.gen_ray(Viewport::new(data.width, data.height), 50, 50);
        let hit = trace_ray(&data.scene, &grid, &ray).expect("centre ray should hit");

        assert!((hit.t - 4.0).abs() < 1e-4);
        assert!((hit.normal - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-4);
    }

    #[test]
    fn test_zero_threads_and_blocks_are_clamped() {
        let data = cluster_data();
        let (image, stats) = render(&data, settings(0, [0, 0, 0], [0, 0]));

        assert_eq!(stats.tiles_per_worker.len(), 1);
        assert_eq!(stats.tiles, (data.width * data.height) as usize);
        assert!(image.pixels.iter().all(|c| c.w == 1.0));
    }

    #[test]
    fn test_normals_mode_renders_unit_range() {
        let data = cluster_data();
        let mut s = settings(2, [4, 4, 4], [16, 16]);
        s.shading_mode = ShadingMode::Normals;
        let (image, _) = render(&data, s);

        assert!(image
            .pixels
            .iter()
            .all(|c| c.cmpge(Colour::ZERO).all() && c.cmple(Colour::ONE).all()));
    }
}
