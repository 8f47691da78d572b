//! cellray core - scene model for the cellray ray tracer.
//!
//! This crate provides:
//!
//! - **Primitives**: `Sphere`, `Triangle`, `Plane` as a closed `Primitive` enum
//! - **Scene storage**: `Scene` arena with `PrimitiveId` handles, lights
//! - **Camera** and **ImageBuffer** (PNG/HDR export)
//! - **Scene files**: line-oriented loader producing `RenderData`
//!
//! # Example
//!
//! ```ignore
//! use cellray_core::load_scene;
//!
//! let data = load_scene("scene.test")?;
//! println!("Loaded {} primitives", data.scene.primitive_count());
//! ```

pub mod camera;
pub mod framebuffer;
pub mod hit;
pub mod light;
pub mod loader;
pub mod material;
pub mod plane;
pub mod primitive;
pub mod scene;
pub mod sphere;
pub mod triangle;

// Re-export commonly used types
pub use camera::{Camera, Viewport};
pub use framebuffer::{ExportError, ExportResult, ImageBuffer};
pub use hit::RayHit;
pub use light::{Attenuation, DirectionalLight, PointLight};
pub use loader::{load_scene, load_scene_from_str, LoadError, LoadResult, RenderData};
pub use material::{rgb, Colour, Material};
pub use plane::Plane;
pub use primitive::{Placement, Primitive, PrimitiveId};
pub use scene::Scene;
pub use sphere::Sphere;
pub use triangle::Triangle;
