//! cellray renderer - grid-accelerated Whitted ray tracing on the CPU.
//!
//! A uniform [`Grid`] finds nearest hits against the bounded primitives,
//! [`trace_ray`] adds the unbounded planes, and the recursive [`Shader`]
//! turns hits into colours. [`RayTracer`] spreads the image over threads in
//! buckets taken from a shared [`WorkStack`].

mod bucket;
mod grid;
mod intersector;
mod renderer;
mod settings;
mod shader;
mod work_stack;

#[cfg(test)]
mod fixtures;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use grid::{clamp_dim, Cell, Grid, Traversal, MAX_AXIS_CELLS, MAX_CELLS};
pub use intersector::trace_ray;
pub use renderer::{Frame, RayTracer, RenderError, RenderResult, RenderStats};
pub use settings::{RenderSettings, SettingsError, SettingsResult};
pub use shader::{Shader, ShadingMode};
pub use work_stack::WorkStack;
