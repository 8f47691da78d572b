// Re-export glam for convenience
pub use glam::*;

// cellray math types
mod aabb;
mod interval;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Mat4Ext;

/// Tolerance used by the intersection routines for near-parallel rejection.
pub const EPSILON: f32 = 1e-6;
